//! Gossip network topologies.
//!
//! A [`Topology`] is a set of agents plus the arcs along which calls may be
//! placed. The two undirected families (complete, incomplete) store every
//! edge as a pair of opposite arcs, so "all ordered pairs with an arc"
//! naturally yields both orientations of each edge; the dynamic family is
//! genuinely directed and grows new arcs during a run.
//!
//! A topology is created once by a generator, then exclusively owned by one
//! engine invocation for the duration of a run. `Topology` is `Clone` so a
//! harness can deep-copy one generated network before each policy trial;
//! the core never copies implicitly.

mod agent;
mod generate;

use std::fmt;
use std::str::FromStr;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::error::GossipError;

pub use agent::{merged_numbers, merged_secrets, Agent, AgentId, Call};

/// Topology families supported by the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Every pair of distinct agents connected (undirected).
    Complete,
    /// Random connected undirected graph (spanning tree plus extra edges).
    Incomplete,
    /// Random directed graph whose arc set grows during a run.
    Dynamic,
}

impl Family {
    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Family::Complete => "complete",
            Family::Incomplete => "incomplete",
            Family::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = GossipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "complete" => Ok(Family::Complete),
            "incomplete" => Ok(Family::Incomplete),
            "dynamic" => Ok(Family::Dynamic),
            other => Err(GossipError::InvalidTopology(format!(
                "unknown topology family '{other}' (expected complete, incomplete or dynamic)"
            ))),
        }
    }
}

/// A gossip network: agents, arcs, and the initial-state flag.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Agents as node weights; arcs as directed edges.
    graph: DiGraph<Agent, ()>,
    /// Family this topology was generated as.
    family: Family,
    /// True until the first call is executed, then false forever.
    initial: bool,
}

impl Topology {
    /// Internal constructor: `n` default agents, no arcs yet.
    fn empty(n: usize, family: Family) -> Self {
        let mut graph = DiGraph::with_capacity(n, 0);
        for _ in 0..n {
            graph.add_node(Agent::default());
        }
        Self {
            graph,
            family,
            initial: true,
        }
    }

    /// Reset every agent to its fresh state once the arc set is in place.
    fn init_agents(&mut self) {
        for id in 0..self.agent_count() {
            let neighbors: Vec<AgentId> = self.out_neighbors(id).collect();
            *self.agent_mut(id) = Agent::fresh(id, neighbors);
        }
        self.initial = true;
    }

    /// Number of agents.
    pub fn agent_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of arcs. Undirected families count each edge twice.
    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Family this topology was generated as.
    pub fn family(&self) -> Family {
        self.family
    }

    /// True for the dynamic (directed) family, which runs arc discovery.
    pub fn is_dynamic(&self) -> bool {
        self.family == Family::Dynamic
    }

    /// True until the first call of a run has been executed.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Record that a call has been executed. Irreversible.
    pub fn mark_called(&mut self) {
        self.initial = false;
    }

    /// Read access to one agent. Panics if `id` is out of range.
    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.graph[NodeIndex::new(id)]
    }

    /// Write access to one agent. Panics if `id` is out of range.
    pub fn agent_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.graph[NodeIndex::new(id)]
    }

    /// Iterate over all agents in index order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.graph.node_weights()
    }

    /// True if the arc `from -> to` exists.
    pub fn arc_exists(&self, from: AgentId, to: AgentId) -> bool {
        self.graph
            .find_edge(NodeIndex::new(from), NodeIndex::new(to))
            .is_some()
    }

    /// Add the arc `from -> to` if absent. Returns true if it was added.
    pub fn add_arc(&mut self, from: AgentId, to: AgentId) -> bool {
        if self.arc_exists(from, to) {
            return false;
        }
        self.graph
            .add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
        true
    }

    /// Add both orientations of an undirected edge.
    fn add_edge_undirected(&mut self, a: AgentId, b: AgentId) {
        self.add_arc(a, b);
        self.add_arc(b, a);
    }

    /// Agents reachable from `id` along a single arc.
    pub fn out_neighbors(&self, id: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.graph
            .neighbors(NodeIndex::new(id))
            .map(NodeIndex::index)
    }

    /// All arcs as ordered (caller, callee) pairs.
    pub fn arcs(&self) -> impl Iterator<Item = Call> + '_ {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| Call::new(a.index(), b.index()))
    }

    /// Termination oracle: true iff every agent knows all secrets.
    pub fn all_experts(&self) -> bool {
        let n = self.agent_count();
        self.agents().all(|agent| agent.is_expert(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_parse() {
        assert_eq!("complete".parse::<Family>().unwrap(), Family::Complete);
        assert_eq!("Incomplete".parse::<Family>().unwrap(), Family::Incomplete);
        assert_eq!("DYNAMIC".parse::<Family>().unwrap(), Family::Dynamic);
        assert!("ring".parse::<Family>().is_err());
    }

    #[test]
    fn test_arc_insertion_is_idempotent() {
        let mut top = Topology::empty(3, Family::Dynamic);
        assert!(top.add_arc(0, 1));
        assert!(!top.add_arc(0, 1));
        assert!(top.arc_exists(0, 1));
        assert!(!top.arc_exists(1, 0));
        assert_eq!(top.arc_count(), 1);
    }

    #[test]
    fn test_all_experts() {
        let mut top = Topology::empty(2, Family::Complete);
        top.add_edge_undirected(0, 1);
        top.init_agents();
        assert!(!top.all_experts());

        top.agent_mut(0).secrets.insert(1);
        top.agent_mut(1).secrets.insert(0);
        assert!(top.all_experts());
    }

    #[test]
    fn test_initial_flag_is_one_way() {
        let mut top = Topology::empty(2, Family::Complete);
        top.init_agents();
        assert!(top.is_initial());
        top.mark_called();
        assert!(!top.is_initial());
    }
}
