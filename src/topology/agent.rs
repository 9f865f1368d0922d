//! Agents and calls.
//!
//! An agent starts out knowing only its own secret and grows its knowledge
//! monotonically through calls. All four per-agent collections only ever
//! gain elements over the lifetime of a run.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Agent identifier: a node index in `0..n`.
pub type AgentId = usize;

/// An ordered pair (caller, callee).
///
/// Calls are compared by value; candidate-set membership never depends on
/// where a call was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Call {
    /// Agent placing the call.
    pub caller: AgentId,
    /// Agent receiving the call.
    pub callee: AgentId,
}

impl Call {
    /// Create a call from caller to callee.
    pub fn new(caller: AgentId, callee: AgentId) -> Self {
        Self { caller, callee }
    }

    /// The opposite orientation of this call.
    pub fn reversed(self) -> Self {
        Self {
            caller: self.callee,
            callee: self.caller,
        }
    }

    /// True if `agent` is the caller or the callee.
    pub fn involves(self, agent: AgentId) -> bool {
        self.caller == agent || self.callee == agent
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.caller, self.callee)
    }
}

/// One participant in the gossip network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agent {
    /// Secrets this agent currently knows. Starts as `{self}`.
    pub secrets: BTreeSet<AgentId>,
    /// Agents this one has directly called or been called by.
    pub contacts: BTreeSet<AgentId>,
    /// Permission token used by the TOK and SPI policies.
    pub token: bool,
    /// Agents this one knows how to dial. Only meaningful on the dynamic
    /// family, where it grows through arc discovery.
    pub numbers: BTreeSet<AgentId>,
}

impl Agent {
    /// Initial state for agent `id` with the given dialable neighbors.
    ///
    /// The agent knows its own secret, has no past contacts, holds a token,
    /// and can dial its out-neighbors plus itself.
    pub fn fresh(id: AgentId, out_neighbors: impl IntoIterator<Item = AgentId>) -> Self {
        let mut numbers: BTreeSet<AgentId> = out_neighbors.into_iter().collect();
        numbers.insert(id);
        Self {
            secrets: BTreeSet::from([id]),
            contacts: BTreeSet::new(),
            token: true,
            numbers,
        }
    }

    /// True if this agent knows all `n` secrets.
    pub fn is_expert(&self, n: usize) -> bool {
        self.secrets.len() == n
    }
}

/// Union of two agents' secret sets.
///
/// The result is assigned to both parties as separately owned containers
/// holding equal content; mutating one afterwards never affects the other.
pub fn merged_secrets(a: &Agent, b: &Agent) -> BTreeSet<AgentId> {
    a.secrets.union(&b.secrets).copied().collect()
}

/// Union of two agents' number sets, same ownership discipline as
/// [`merged_secrets`].
pub fn merged_numbers(a: &Agent, b: &Agent) -> BTreeSet<AgentId> {
    a.numbers.union(&b.numbers).copied().collect()
}
