//! Sequential execution: one call per step.

use std::time::Instant;

use rand::Rng;
use tracing::debug;

use super::discovery::discover_arcs;
use super::{execute_call, CallRecord, Outcome, RunBudget, RunReport};
use crate::policy::{CandidateSet, Policy};
use crate::topology::Topology;

/// Drive `topology` under `policy`, one call at a time, to a terminal
/// outcome.
///
/// Each step checks the all-experts oracle, recomputes the candidate set
/// via the policy (with no previous call on the first step), draws one
/// permitted call uniformly at random and executes it. On the dynamic
/// family, arc discovery may append freshly permitted calls directly into
/// the candidate set used by the next step. The engine owns the topology
/// exclusively for the duration of the run and mutates it in place.
pub fn run_sequential<R: Rng + ?Sized>(
    topology: &mut Topology,
    policy: Policy,
    budget: &RunBudget,
    rng: &mut R,
) -> RunReport {
    let started = Instant::now();
    let limit = budget.time_limit(topology.agent_count());

    let mut calls = CandidateSet::new();
    let mut last = None;
    let mut count: u64 = 0;
    let mut history = Vec::new();

    let outcome = loop {
        if topology.all_experts() {
            break Outcome::Success;
        }

        policy.next_candidates(topology, last, &mut calls);

        let Some(call) = calls.choose(rng) else {
            break Outcome::Failure;
        };

        debug!(step = count + 1, %call, available = calls.len(), "step");
        execute_call(topology, policy, call);
        if topology.is_dynamic() {
            discover_arcs(topology, policy, call, &mut calls);
        }

        count += 1;
        history.push(CallRecord {
            step: count,
            call,
        });
        last = Some(call);

        if budget.exhausted(count, started, limit) {
            break Outcome::Timeout;
        }
    };

    RunReport {
        length: count,
        elapsed_secs: started.elapsed().as_secs_f64(),
        outcome,
        history,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_two_agents_need_one_call() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut top = Topology::complete(2).unwrap();
        let report = run_sequential(&mut top, Policy::Any, &RunBudget::step_capped(100), &mut rng);

        assert_eq!(report.outcome, Outcome::Success);
        assert_eq!(report.length, 1);
        assert_eq!(report.history.len(), 1);
        assert!(top.all_experts());
    }

    #[test]
    fn test_step_cap_produces_timeout() {
        // LNS cannot finish n=5 in two calls; the cap must fire.
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut top = Topology::complete(5).unwrap();
        let report = run_sequential(&mut top, Policy::Lns, &RunBudget::step_capped(2), &mut rng);

        assert_eq!(report.outcome, Outcome::Timeout);
        assert_eq!(report.length, 2);
    }

    #[test]
    fn test_lns_succeeds_on_complete_topology() {
        // LNS on a complete graph always reaches the all-expert state:
        // a call toward an unknown secret exists until everyone is expert.
        for seed in 0..5 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut top = Topology::complete(6).unwrap();
            let report =
                run_sequential(&mut top, Policy::Lns, &RunBudget::step_capped(10_000), &mut rng);
            assert_eq!(report.outcome, Outcome::Success, "seed {seed}");
            assert!(top.all_experts());
        }
    }

    #[test]
    fn test_failure_when_candidates_run_dry() {
        // CO on a star graph with 3 leaves can never succeed: only 3
        // distinct pairs exist, but spreading 4 secrets to 4 agents needs
        // at least 4 calls. The run must end in Failure, not hang.
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut top = loop {
            let candidate = Topology::incomplete(4, &mut rng).unwrap();
            let is_star = candidate.arc_count() == 6
                && (0..4).any(|id| candidate.out_neighbors(id).count() == 3);
            if is_star {
                break candidate;
            }
        };

        let report = run_sequential(&mut top, Policy::Co, &RunBudget::step_capped(1_000), &mut rng);
        assert_eq!(report.outcome, Outcome::Failure);
        assert_eq!(report.length, 3);
        assert!(!top.all_experts());
    }

    #[test]
    fn test_history_matches_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut top = Topology::complete(4).unwrap();
        let report = run_sequential(&mut top, Policy::Co, &RunBudget::step_capped(100), &mut rng);

        assert_eq!(report.history.len() as u64, report.length);
        for (idx, record) in report.history.iter().enumerate() {
            assert_eq!(record.step as usize, idx + 1);
        }
    }
}
