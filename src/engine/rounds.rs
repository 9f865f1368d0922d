//! Round-based execution: maximal batches of participant-disjoint calls.

use std::collections::HashSet;
use std::time::Instant;

use rand::Rng;
use tracing::debug;

use super::discovery::discover_arcs;
use super::{execute_call, CallRecord, Outcome, RunBudget, RunReport};
use crate::policy::{CandidateSet, Policy};
use crate::topology::{AgentId, Topology};

/// Drive `topology` under `policy` in synchronized rounds to a terminal
/// outcome.
///
/// Each round draws from a working copy of the authoritative candidate
/// set. A drawn call whose caller or callee already participated this round
/// is discarded from the working copy only; an executed call applies the
/// usual effects and immediately recomputes the authoritative set (plus arc
/// discovery on the dynamic family). The round ends when the working copy
/// is empty or `agent_count - 1` distinct participants leave no disjoint
/// pair to add. No agent participates twice within a round.
pub fn run_rounds<R: Rng + ?Sized>(
    topology: &mut Topology,
    policy: Policy,
    budget: &RunBudget,
    rng: &mut R,
) -> RunReport {
    let started = Instant::now();
    let limit = budget.time_limit(topology.agent_count());

    let mut calls = CandidateSet::new();
    policy.next_candidates(topology, None, &mut calls);

    let mut rounds: u64 = 0;
    let mut history = Vec::new();

    let outcome = loop {
        if topology.all_experts() {
            break Outcome::Success;
        }
        if calls.is_empty() {
            break Outcome::Failure;
        }

        let mut working = calls.clone();
        let mut participants: HashSet<AgentId> = HashSet::new();

        while participants.len() < topology.agent_count() - 1 {
            let Some(call) = working.choose(rng) else {
                break;
            };
            if participants.contains(&call.caller) || participants.contains(&call.callee) {
                // Conflicted this round; drop it from the working copy only.
                working.remove(call);
                continue;
            }

            participants.insert(call.caller);
            participants.insert(call.callee);
            debug!(round = rounds + 1, %call, "round call");
            history.push(CallRecord {
                step: rounds + 1,
                call,
            });

            execute_call(topology, policy, call);
            policy.next_candidates(topology, Some(call), &mut calls);
            if topology.is_dynamic() {
                discover_arcs(topology, policy, call, &mut calls);
            }
        }

        rounds += 1;
        if budget.exhausted(rounds, started, limit) {
            break Outcome::Timeout;
        }
    };

    RunReport {
        length: rounds,
        elapsed_secs: started.elapsed().as_secs_f64(),
        outcome,
        history,
    }
}
