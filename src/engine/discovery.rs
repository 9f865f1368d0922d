//! Dynamic arc discovery.
//!
//! On the dynamic family, two agents that complete a call also exchange
//! their lists of dialable numbers. Each then gains arcs toward every
//! number it can now reach but could not before, and any of those arcs the
//! policy permits becomes a candidate immediately rather than waiting for
//! the next recompute. Arcs are only ever added.

use tracing::debug;

use crate::policy::{CandidateSet, Policy};
use crate::topology::{merged_numbers, Call, Topology};

/// Grow the arc set after executing `call` on a dynamic topology.
pub(crate) fn discover_arcs(
    topology: &mut Topology,
    policy: Policy,
    call: Call,
    calls: &mut CandidateSet,
) {
    let Call { caller, callee } = call;

    let numbers = merged_numbers(topology.agent(caller), topology.agent(callee));
    topology.agent_mut(caller).numbers = numbers.clone();
    topology.agent_mut(callee).numbers = numbers.clone();

    for endpoint in [caller, callee] {
        for &number in &numbers {
            if number != endpoint && topology.add_arc(endpoint, number) {
                debug!(from = endpoint, to = number, "arc discovered");
                if policy.permits(topology, endpoint, number) {
                    calls.insert(Call::new(endpoint, number));
                }
            }
        }
    }
}
