//! # Gossip Core - Epidemic Information Spreading Simulator
//!
//! Simulation engine for gossip protocols: distributed epidemic schemes in
//! which pairs of agents ("calls") exchange every secret they currently
//! know, until every agent knows every secret (the all-expert state) or the
//! process stalls.
//!
//! ## Features
//!
//! - **Five call-admissibility policies**: ANY, CO, LNS, TOK, SPI
//! - **Three topology families**: complete, random incomplete, random
//!   directed/dynamic
//! - **Two scheduling disciplines**: sequential calls and synchronized
//!   rounds of participant-disjoint calls
//! - **Dynamic arc discovery**: directed topologies grow as agents learn
//!   each other's contacts
//! - **Reproducible runs**: every source of randomness is an injected,
//!   seedable RNG
//!
//! ## Policies
//!
//! A policy keeps a candidate set of currently permitted calls, seeded from
//! the topology's arcs and updated incrementally after each executed call:
//!
//! | Policy | Rule                                                           |
//! |--------|----------------------------------------------------------------|
//! | ANY    | Any structurally possible call, forever                        |
//! | CO     | A pair that has been in contact never calls again              |
//! | LNS    | Never call an agent whose secret you already know              |
//! | TOK    | One relocating token per call grants calling rights            |
//! | SPI    | Callees permanently lose their outgoing calls                  |
//!
//! ## Run Lifecycle
//!
//! ```text
//!   generate --> run (sequential | rounds) --> Success | Failure | Timeout
//!      |                  |
//!      |                  +-- policy recompute + all-experts check per step
//!      |                  +-- arc discovery (dynamic family only)
//!      +-- complete / incomplete / dynamic
//! ```
//!
//! The three terminal outcomes are ordinary values; errors are reserved for
//! invalid configurations (fewer than two agents, unknown policy names).
//!
//! ## Quick Start
//!
//! ### Single Run
//!
//! ```rust,ignore
//! use gossip::{run_sequential, Policy, RunBudget, Topology};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut topology = Topology::complete(10)?;
//! let report = run_sequential(&mut topology, Policy::Lns, &RunBudget::default(), &mut rng);
//!
//! println!("{} after {} calls", report.outcome, report.length);
//! ```
//!
//! ### Policy Comparison
//!
//! ```rust,ignore
//! use gossip::experiment::{compare_policies, ExperimentConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let results = compare_policies(20, &ExperimentConfig::default(), &mut rng)?;
//! for (policy, stats) in &results {
//!     println!("{policy}: {:.0}% success", stats.success_rate() * 100.0);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`topology`]: agents, networks, and the three generators
//! - [`policy`]: the five permission policies and the candidate set
//! - [`engine`]: sequential and round execution, budgets, arc discovery
//! - [`experiment`]: policy comparisons, sweeps, on-disk reports
//! - [`config`]: configuration management
//! - [`error`]: error types and result aliases

pub mod config;
pub mod engine;
pub mod error;
pub mod experiment;
pub mod policy;
pub mod topology;

// Re-exports for convenience
pub use config::Config;
pub use engine::{
    run_rounds, run_sequential, CallRecord, Outcome, RunBudget, RunReport, WallClock,
};
pub use error::{GossipError, Result};
pub use experiment::{compare_policies, sweep, Discipline, ExperimentConfig, SweepReport};
pub use policy::{CandidateSet, Policy};
pub use topology::{Agent, AgentId, Call, Family, Topology};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
