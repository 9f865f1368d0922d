//! Topology generators.
//!
//! Three constructors parameterized by agent count: complete, random
//! incomplete (connected), and random dynamic (directed). The randomized
//! families draw from an injected RNG so a seed reproduces the same network.
//!
//! Both random families start from a uniformly random labeled spanning tree
//! (random Prüfer sequence), which guarantees every agent is reachable
//! before any extra edges are sampled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rand::Rng;

use super::{AgentId, Family, Topology};
use crate::error::{GossipError, Result};

impl Topology {
    /// Generate a topology of the given family on `n` agents.
    ///
    /// Fails with [`GossipError::InvalidTopology`] if `n < 2`.
    pub fn generate<R: Rng + ?Sized>(family: Family, n: usize, rng: &mut R) -> Result<Self> {
        match family {
            Family::Complete => Self::complete(n),
            Family::Incomplete => Self::incomplete(n, rng),
            Family::Dynamic => Self::dynamic(n, rng),
        }
    }

    /// Complete gossip graph: every pair of distinct agents connected.
    ///
    /// The structure is deterministic; only the per-agent state is
    /// initialized.
    pub fn complete(n: usize) -> Result<Self> {
        validate_agent_count(n)?;
        let mut top = Self::empty(n, Family::Complete);
        for i in 0..n {
            for j in (i + 1)..n {
                top.add_edge_undirected(i, j);
            }
        }
        top.init_agents();
        Ok(top)
    }

    /// Random incomplete gossip graph: a spanning tree plus `r` extra edges,
    /// `r` drawn uniformly from `[0, C(n,2) - (n-1)]`.
    ///
    /// Always connected; density is randomized.
    pub fn incomplete<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self> {
        validate_agent_count(n)?;
        let mut top = Self::empty(n, Family::Incomplete);
        for (a, b) in random_tree_edges(n, rng) {
            top.add_edge_undirected(a, b);
        }

        let epsilon = choose2(n) - (n - 1);
        let extra = rng.gen_range(0..=epsilon);
        let mut edges = n - 1;
        // Rejection sampling: draw ordered pairs until enough distinct
        // edges have been accepted.
        while edges < (n - 1) + extra {
            let i = rng.gen_range(0..n);
            let j = rng.gen_range(0..n);
            if i != j && !top.arc_exists(i, j) {
                top.add_edge_undirected(i, j);
                edges += 1;
            }
        }

        top.init_agents();
        Ok(top)
    }

    /// Random dynamic gossip digraph: a randomly oriented spanning tree plus
    /// `r` extra arcs, `r` drawn uniformly from
    /// `[0, (2*C(n,2) - (n-1)) / 10]`.
    ///
    /// The `/10` scaling keeps the seed network sparse; arc discovery
    /// densifies it while a run executes.
    pub fn dynamic<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self> {
        validate_agent_count(n)?;
        let mut top = Self::empty(n, Family::Dynamic);
        // One coin flip per tree edge picks which of the two opposite arcs
        // survives.
        for (a, b) in random_tree_edges(n, rng) {
            if rng.gen_range(0..2) == 0 {
                top.add_arc(a, b);
            } else {
                top.add_arc(b, a);
            }
        }

        let epsilon = (2 * choose2(n) - (n - 1)) / 10;
        let extra = rng.gen_range(0..=epsilon);
        while top.arc_count() < (n - 1) + extra {
            let i = rng.gen_range(0..n);
            let j = rng.gen_range(0..n);
            if i != j && !top.arc_exists(i, j) {
                top.add_arc(i, j);
            }
        }

        top.init_agents();
        Ok(top)
    }
}

fn validate_agent_count(n: usize) -> Result<()> {
    if n < 2 {
        return Err(GossipError::InvalidTopology(format!(
            "at least 2 agents required, got {n}"
        )));
    }
    Ok(())
}

/// Binomial coefficient C(n, 2).
fn choose2(n: usize) -> usize {
    n * (n - 1) / 2
}

/// Uniformly random labeled tree on `n` nodes, as `n - 1` edges.
///
/// Decodes a random Prüfer sequence: every labeled tree corresponds to
/// exactly one sequence, so sampling the sequence uniformly samples trees
/// uniformly.
fn random_tree_edges<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<(AgentId, AgentId)> {
    debug_assert!(n >= 2);
    if n == 2 {
        return vec![(0, 1)];
    }

    let prufer: Vec<AgentId> = (0..n - 2).map(|_| rng.gen_range(0..n)).collect();

    let mut degree = vec![1usize; n];
    for &v in &prufer {
        degree[v] += 1;
    }

    // Min-heap of current leaves; always join the smallest leaf to the next
    // sequence element.
    let mut leaves: BinaryHeap<Reverse<AgentId>> = degree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 1)
        .map(|(v, _)| Reverse(v))
        .collect();

    let mut edges = Vec::with_capacity(n - 1);
    for &v in &prufer {
        let Reverse(leaf) = leaves.pop().expect("prufer decode always has a leaf");
        edges.push((leaf, v));
        degree[v] -= 1;
        if degree[v] == 1 {
            leaves.push(Reverse(v));
        }
    }

    // Exactly two leaves remain; they form the final edge.
    let Reverse(a) = leaves.pop().expect("two leaves remain");
    let Reverse(b) = leaves.pop().expect("two leaves remain");
    edges.push((a, b));
    edges
}
