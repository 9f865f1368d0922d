//! Property-based coverage across random seeds, sizes, and policies.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gossip::{run_rounds, run_sequential, Family, Outcome, Policy, RunBudget, Topology};

fn policies() -> impl Strategy<Value = Policy> {
    prop::sample::select(Policy::ALL.to_vec())
}

fn families() -> impl Strategy<Value = Family> {
    prop::sample::select(vec![Family::Complete, Family::Incomplete, Family::Dynamic])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Any run terminates under the cap with internally consistent state:
    /// secrets grow from {self}, successes are genuine all-expert states,
    /// arcs never vanish, and the history matches the reported length.
    #[test]
    fn run_invariants_hold(
        n in 2usize..10,
        seed in any::<u64>(),
        policy in policies(),
        family in families(),
        rounds in any::<bool>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut top = Topology::generate(family, n, &mut rng).unwrap();
        let arcs_before = top.arc_count();

        let budget = RunBudget::step_capped(20_000);
        let report = if rounds {
            run_rounds(&mut top, policy, &budget, &mut rng)
        } else {
            run_sequential(&mut top, policy, &budget, &mut rng)
        };

        prop_assert!(report.length <= 20_000);
        prop_assert!(top.arc_count() >= arcs_before);

        for id in 0..n {
            let agent = top.agent(id);
            prop_assert!(agent.secrets.contains(&id));
            prop_assert!(agent.secrets.iter().all(|&s| s < n));
            prop_assert!(agent.secrets.len() <= n);
        }

        match report.outcome {
            Outcome::Success => prop_assert!(top.all_experts()),
            // Failure is only reported after the experts check came up
            // short; a timeout fires at the cap even if the final call
            // happened to finish the spread.
            Outcome::Failure => prop_assert!(!top.all_experts()),
            Outcome::Timeout => prop_assert_eq!(report.length, 20_000),
        }

        if let Some(last) = report.history.last() {
            prop_assert_eq!(last.step, report.length);
        } else {
            prop_assert_eq!(report.length, 0);
        }
    }

    /// Every executed call travels along an arc of the (possibly grown)
    /// topology, and no agent ever calls itself.
    #[test]
    fn calls_respect_topology(
        n in 2usize..8,
        seed in any::<u64>(),
        policy in policies(),
        family in families(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut top = Topology::generate(family, n, &mut rng).unwrap();
        let report = run_sequential(&mut top, policy, &RunBudget::step_capped(20_000), &mut rng);

        for record in &report.history {
            prop_assert_ne!(record.call.caller, record.call.callee);
            // Arcs are only added, never removed, so every executed call's
            // arc is still present afterwards.
            prop_assert!(top.arc_exists(record.call.caller, record.call.callee));
        }
    }
}
