//! Call permission policies.
//!
//! A policy decides which calls are permitted at each point of a run. All
//! five variants seed identically on an initial topology (every ordered
//! pair joined by an arc) and then apply their own incremental update after
//! each executed call:
//!
//! | Policy | Update after call (i, j)                                        |
//! |--------|-----------------------------------------------------------------|
//! | ANY    | None; every structurally possible call stays permitted          |
//! | CO     | Remove (i, j) and (j, i)                                        |
//! | LNS    | Remove (i, s) for secrets s of i; remove (j, s) for secrets of j|
//! | TOK    | Remove (i, k) for neighbors k of i; add (j, k) for neighbors of j|
//! | SPI    | Remove (j, k) for neighbors k of j                              |
//!
//! The variants form a closed enumeration dispatched through
//! [`Policy::next_candidates`]; exhaustiveness is compiler-checked.

mod candidates;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GossipError;
use crate::topology::{AgentId, Call, Topology};

pub use candidates::CandidateSet;

/// The five call-admissibility policies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Policy {
    /// Unconstrained telephone gossip: any structurally possible call.
    Any,
    /// "Call once": a pair that has been in contact never calls again.
    Co,
    /// "Learn new secrets": never call an agent whose secret you know.
    Lns,
    /// Token passing: calling rights move from caller to callee.
    Tok,
    /// "Spider": a callee loses its future outgoing calls.
    Spi,
}

impl Policy {
    /// All five policies in canonical order.
    pub const ALL: [Policy; 5] = [Policy::Any, Policy::Co, Policy::Lns, Policy::Tok, Policy::Spi];

    /// Canonical uppercase name.
    pub fn name(self) -> &'static str {
        match self {
            Policy::Any => "ANY",
            Policy::Co => "CO",
            Policy::Lns => "LNS",
            Policy::Tok => "TOK",
            Policy::Spi => "SPI",
        }
    }

    /// Point predicate: is `caller -> callee` permitted right now?
    ///
    /// Used by dynamic arc discovery to decide whether a freshly added arc
    /// becomes a candidate immediately.
    pub fn permits(self, topology: &Topology, caller: AgentId, callee: AgentId) -> bool {
        match self {
            Policy::Any => true,
            Policy::Co => !topology.agent(callee).contacts.contains(&caller),
            Policy::Lns => !topology.agent(caller).secrets.contains(&callee),
            Policy::Tok | Policy::Spi => topology.agent(caller).token,
        }
    }

    /// Recompute the candidate set after `last_call`.
    ///
    /// On the first invocation of a run (`topology.is_initial()`, or no
    /// previous call) every policy seeds the same way: all ordered pairs
    /// joined by an arc. Afterwards each variant applies its incremental
    /// update; for ANY the recompute is a no-op.
    pub fn next_candidates(
        self,
        topology: &Topology,
        last_call: Option<Call>,
        calls: &mut CandidateSet,
    ) {
        let call = match last_call {
            Some(call) if !topology.is_initial() => call,
            _ => {
                seed(topology, calls);
                return;
            }
        };

        match self {
            Policy::Any => {}
            Policy::Co => {
                calls.remove(call);
                calls.remove(call.reversed());
            }
            Policy::Lns => {
                // Post-merge secret sets: neither endpoint needs to call an
                // agent whose secret it now holds.
                for &secret in &topology.agent(call.caller).secrets {
                    calls.remove(Call::new(call.caller, secret));
                }
                for &secret in &topology.agent(call.callee).secrets {
                    calls.remove(Call::new(call.callee, secret));
                }
            }
            Policy::Tok => {
                // The token moved: the caller loses its outgoing calls, the
                // callee's neighbors become callable.
                for neighbor in topology.out_neighbors(call.caller) {
                    calls.remove(Call::new(call.caller, neighbor));
                }
                for neighbor in topology.out_neighbors(call.callee) {
                    calls.insert(Call::new(call.callee, neighbor));
                }
            }
            Policy::Spi => {
                for neighbor in topology.out_neighbors(call.callee) {
                    calls.remove(Call::new(call.callee, neighbor));
                }
            }
        }
    }
}

/// Seed step shared by every policy: all ordered pairs with an arc.
///
/// Undirected families store both orientations of each edge, so this yields
/// both directions of every edge.
fn seed(topology: &Topology, calls: &mut CandidateSet) {
    calls.clear();
    for call in topology.arcs() {
        calls.insert(call);
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = GossipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ANY" => Ok(Policy::Any),
            "CO" => Ok(Policy::Co),
            "LNS" => Ok(Policy::Lns),
            "TOK" => Ok(Policy::Tok),
            "SPI" => Ok(Policy::Spi),
            other => Err(GossipError::InvalidPolicy(format!(
                "unknown policy '{other}' (expected ANY, CO, LNS, TOK or SPI)"
            ))),
        }
    }
}
