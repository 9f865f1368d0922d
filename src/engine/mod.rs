//! Execution engines.
//!
//! Two scheduling disciplines drive a topology/policy pair to a terminal
//! outcome: [`run_sequential`] executes one call at a time,
//! [`run_rounds`] batches participant-disjoint calls into synchronized
//! rounds. Both consult the policy and the all-experts oracle on every step
//! and run arc discovery on the dynamic family.
//!
//! ```text
//!               all experts
//!   [Running] ──────────────> [Success]
//!       │
//!       │ empty candidate set
//!       ├──────────────> [Failure]
//!       │
//!       │ budget exhausted
//!       └──────────────> [Timeout]
//! ```
//!
//! The three terminal outcomes are ordinary values, never errors.

mod discovery;
mod rounds;
mod sequential;

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::policy::Policy;
use crate::topology::{merged_secrets, Call, Topology};

pub use rounds::run_rounds;
pub use sequential::run_sequential;

/// Terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every agent became an expert.
    Success,
    /// The candidate set ran empty before all agents were experts.
    Failure,
    /// The step or wall-clock budget was exhausted.
    Timeout,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

/// One executed call and the step it happened in.
///
/// For sequential runs `step` is the call ordinal (1-based); for round runs
/// it is the round number, so several records may share a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Call ordinal or round number, 1-based.
    pub step: u64,
    /// The executed call.
    pub call: Call,
}

/// Result of one engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Calls executed (sequential) or rounds performed (rounds).
    pub length: u64,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_secs: f64,
    /// Terminal outcome.
    pub outcome: Outcome,
    /// Every executed call in order, the stage-by-stage breakdown of the run.
    pub history: Vec<CallRecord>,
}

impl RunReport {
    /// True if the run reached the all-expert state.
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Wall-clock limit for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallClock {
    /// `agent_count / 10` seconds, the classic bound.
    PerAgent,
    /// A fixed duration.
    Fixed(Duration),
    /// No wall-clock limit.
    Disabled,
}

/// Cancellation bounds for one run.
///
/// The step cap is the primary, deterministic bound; the wall clock is a
/// secondary guard whose default preserves the classic `n / 10` seconds.
/// Exhausting either yields [`Outcome::Timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunBudget {
    /// Maximum calls (sequential) or rounds (rounds), if any.
    pub max_steps: Option<u64>,
    /// Wall-clock limit.
    pub wall_clock: WallClock,
}

impl Default for RunBudget {
    fn default() -> Self {
        Self {
            max_steps: None,
            wall_clock: WallClock::PerAgent,
        }
    }
}

impl RunBudget {
    /// Deterministic budget: a step cap with the wall clock disabled.
    pub fn step_capped(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
            wall_clock: WallClock::Disabled,
        }
    }

    /// Resolve the wall-clock limit for a topology of `n` agents.
    pub(crate) fn time_limit(&self, n: usize) -> Option<Duration> {
        match self.wall_clock {
            WallClock::PerAgent => Some(Duration::from_secs_f64(n as f64 / 10.0)),
            WallClock::Fixed(limit) => Some(limit),
            WallClock::Disabled => None,
        }
    }

    /// True once either bound is spent.
    pub(crate) fn exhausted(&self, steps: u64, started: Instant, limit: Option<Duration>) -> bool {
        if self.max_steps.is_some_and(|cap| steps >= cap) {
            return true;
        }
        limit.is_some_and(|limit| started.elapsed() > limit)
    }
}

/// Apply the effects of one executed call.
///
/// Merges the secret sets into their union (assigned to both parties as
/// independently owned copies), records the contact both ways, applies the
/// TOK/SPI token effects, and clears the topology's initial flag. Arc
/// discovery for the dynamic family is the caller's responsibility since
/// the two engines interleave it differently with the policy recompute.
pub(crate) fn execute_call(topology: &mut Topology, policy: Policy, call: Call) {
    let Call { caller, callee } = call;

    let secrets = merged_secrets(topology.agent(caller), topology.agent(callee));
    topology.agent_mut(caller).secrets = secrets.clone();
    topology.agent_mut(callee).secrets = secrets;

    topology.agent_mut(caller).contacts.insert(callee);
    topology.agent_mut(callee).contacts.insert(caller);

    match policy {
        Policy::Tok => {
            topology.agent_mut(caller).token = false;
            topology.agent_mut(callee).token = true;
        }
        Policy::Spi => {
            topology.agent_mut(callee).token = false;
        }
        Policy::Any | Policy::Co | Policy::Lns => {}
    }

    topology.mark_called();

    debug!(
        caller,
        callee,
        known = topology.agent(caller).secrets.len(),
        "call executed"
    );
}
