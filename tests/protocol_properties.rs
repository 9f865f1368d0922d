//! End-to-end protocol property tests.
//!
//! These exercise the documented guarantees of the engines across policies
//! and topology families, using seeded RNGs and step-capped budgets so
//! every run is deterministic and bounded.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gossip::{
    run_rounds, run_sequential, Call, Family, Outcome, Policy, RunBudget, RunReport, Topology,
};

const FAMILIES: [Family; 3] = [Family::Complete, Family::Incomplete, Family::Dynamic];

fn capped() -> RunBudget {
    RunBudget::step_capped(50_000)
}

/// Every policy/family/discipline combination terminates under a hard step
/// ceiling and reports a consistent call history.
#[test]
fn test_every_combination_terminates() {
    let mut rng = ChaCha8Rng::seed_from_u64(100);
    for family in FAMILIES {
        for policy in Policy::ALL {
            for rounds in [false, true] {
                let mut top = Topology::generate(family, 6, &mut rng).unwrap();
                let report = if rounds {
                    run_rounds(&mut top, policy, &capped(), &mut rng)
                } else {
                    run_sequential(&mut top, policy, &capped(), &mut rng)
                };

                assert!(
                    report.length <= 50_000,
                    "{policy} on {family} exceeded the ceiling"
                );
                if !rounds {
                    assert_eq!(report.history.len() as u64, report.length);
                }
                if report.outcome == Outcome::Success {
                    assert!(top.all_experts(), "{policy} on {family} false success");
                }
            }
        }
    }
}

/// On success every agent's secret set has cardinality n.
#[test]
fn test_expert_invariant_on_success() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut top = Topology::complete(8).unwrap();
    let report = run_sequential(&mut top, Policy::Any, &capped(), &mut rng);

    assert_eq!(report.outcome, Outcome::Success);
    for agent in top.agents() {
        assert_eq!(agent.secrets.len(), 8);
    }
}

/// Replaying the history's union-merge semantics reproduces the engine's
/// final secret sets, and knowledge only ever grows along the way.
#[test]
fn test_knowledge_is_monotonic_union_merge() {
    let n = 7;
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut top = Topology::complete(n).unwrap();
    let report = run_sequential(&mut top, Policy::Lns, &capped(), &mut rng);
    assert_eq!(report.outcome, Outcome::Success);

    let mut shadow: Vec<BTreeSet<usize>> = (0..n).map(|id| BTreeSet::from([id])).collect();
    for record in &report.history {
        let Call { caller, callee } = record.call;
        let before_caller = shadow[caller].len();
        let before_callee = shadow[callee].len();

        let merged: BTreeSet<usize> = shadow[caller].union(&shadow[callee]).copied().collect();
        assert!(merged.len() >= before_caller);
        assert!(merged.len() >= before_callee);
        shadow[caller] = merged.clone();
        shadow[callee] = merged;
    }

    for (id, expected) in shadow.iter().enumerate() {
        assert_eq!(&top.agent(id).secrets, expected, "agent {id} diverged");
    }
}

/// CO never executes the same unordered pair twice.
#[test]
fn test_co_pair_exclusivity() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut top = Topology::complete(4).unwrap();
    let report = run_sequential(&mut top, Policy::Co, &capped(), &mut rng);

    // CO is successful on complete topologies: any maximal execution ends
    // in the all-expert state.
    assert_eq!(report.outcome, Outcome::Success);

    let mut seen = HashSet::new();
    for record in &report.history {
        let Call { caller, callee } = record.call;
        let pair = (caller.min(callee), caller.max(callee));
        assert!(seen.insert(pair), "pair {pair:?} executed twice");
    }
    // At most one call per unordered pair on K4.
    assert!(report.length <= 6);
}

/// TOK relocates tokens: replaying caller-loses/callee-gains over the
/// history reproduces the final token distribution, which never empties.
#[test]
fn test_tok_token_relocation() {
    let n = 5;
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let mut top = Topology::complete(n).unwrap();
    let report = run_sequential(&mut top, Policy::Tok, &capped(), &mut rng);
    assert_eq!(report.outcome, Outcome::Success);
    assert!(report.length >= 1);

    let mut tokens = vec![true; n];
    for record in &report.history {
        tokens[record.call.caller] = false;
        tokens[record.call.callee] = true;
    }
    for id in 0..n {
        assert_eq!(top.agent(id).token, tokens[id], "agent {id} token diverged");
    }

    let held = (0..n).filter(|&id| top.agent(id).token).count();
    assert!(held >= 1, "tokens died out under TOK");
    assert!(held <= n - 1, "no caller ever gave up its token");
}

/// SPI destroys the callee's token: the survivor count is exactly the
/// number of agents never called, and never increases.
#[test]
fn test_spi_token_destruction() {
    let n = 6;
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut top = Topology::complete(n).unwrap();
    let report = run_sequential(&mut top, Policy::Spi, &capped(), &mut rng);
    assert!(report.length >= 1);

    let callees: HashSet<usize> = report.history.iter().map(|r| r.call.callee).collect();
    let held = (0..n).filter(|&id| top.agent(id).token).count();
    assert_eq!(held, n - callees.len());
    assert!(held <= n - 1);
}

/// No agent participates in two calls of the same round, on any family.
#[test]
fn test_round_disjointness_across_families() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    for family in FAMILIES {
        for policy in Policy::ALL {
            let mut top = Topology::generate(family, 8, &mut rng).unwrap();
            let report = run_rounds(&mut top, policy, &capped(), &mut rng);

            let mut by_round: BTreeMap<u64, Vec<Call>> = BTreeMap::new();
            for record in &report.history {
                by_round.entry(record.step).or_default().push(record.call);
            }
            for (round, calls) in by_round {
                let mut participants = HashSet::new();
                for call in &calls {
                    participants.insert(call.caller);
                    participants.insert(call.callee);
                }
                assert_eq!(
                    participants.len(),
                    2 * calls.len(),
                    "{policy} on {family}: agent reused in round {round}"
                );
            }
        }
    }
}

/// ANY on a complete 4-agent topology always succeeds; the spread takes at
/// least the information-theoretic minimum and, for reasonable seeds, only
/// a handful of calls.
#[test]
fn test_any_on_k4_concrete_scenario() {
    let mut quick_seed_found = false;
    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut top = Topology::complete(4).unwrap();
        let report = run_sequential(&mut top, Policy::Any, &capped(), &mut rng);

        // ANY never shrinks its candidate set below the full edge set, so
        // failure is impossible on a complete topology.
        assert_eq!(report.outcome, Outcome::Success, "seed {seed}");
        assert!(report.length >= 3, "seed {seed}: impossible spread");
        if (3..=12).contains(&report.length) {
            quick_seed_found = true;
        }
    }
    assert!(quick_seed_found, "no seed finished within 12 calls");
}

/// The arc set of a dynamic topology never shrinks, for any policy and
/// either discipline.
#[test]
fn test_dynamic_arc_monotonicity() {
    let mut rng = ChaCha8Rng::seed_from_u64(30);
    let base = Topology::dynamic(8, &mut rng).unwrap();
    let before = base.arc_count();

    for policy in Policy::ALL {
        for rounds in [false, true] {
            let mut trial = base.clone();
            let _report: RunReport = if rounds {
                run_rounds(&mut trial, policy, &capped(), &mut rng)
            } else {
                run_sequential(&mut trial, policy, &capped(), &mut rng)
            };
            assert!(
                trial.arc_count() >= before,
                "{policy} shrank the arc set (rounds={rounds})"
            );
        }
    }
}

/// Identical seeds reproduce identical runs.
#[test]
fn test_seeded_runs_are_reproducible() {
    let run = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut top = Topology::incomplete(9, &mut rng).unwrap();
        run_sequential(&mut top, Policy::Lns, &capped(), &mut rng)
    };

    let a = run(99);
    let b = run(99);
    assert_eq!(a.outcome, b.outcome);
    assert_eq!(a.length, b.length);
    assert_eq!(a.history, b.history);

    let c = run(100);
    // Different seed, different run (lengths may coincide, histories do
    // not in practice for n=9).
    assert!(a.history != c.history || a.length != c.length);
}
