//! Experiment harness: policy comparisons and agent-count sweeps.
//!
//! For each trial one topology is generated, and every policy runs on its
//! own independent clone so no policy ever observes another's mutations.
//! A sweep repeats the comparison across a range of agent counts and
//! collects the aggregates into a serializable [`report::SweepReport`].

pub mod report;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{run_rounds, run_sequential, Outcome, RunBudget, RunReport};
use crate::error::{GossipError, Result};
use crate::policy::Policy;
use crate::topology::{Family, Topology};

pub use report::{PolicySummary, SweepReport, SweepRow};

/// Scheduling discipline for a batch of runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    /// Unconstrained sequential calls.
    Sequential,
    /// Synchronized rounds of participant-disjoint calls.
    Rounds,
}

impl Discipline {
    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Discipline::Sequential => "sequential",
            Discipline::Rounds => "rounds",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Discipline {
    type Err = GossipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Discipline::Sequential),
            "rounds" => Ok(Discipline::Rounds),
            other => Err(GossipError::Config(format!(
                "unknown discipline '{other}' (expected sequential or rounds)"
            ))),
        }
    }
}

/// Parameters for [`compare_policies`] and [`sweep`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Topology family to generate.
    pub family: Family,
    /// Scheduling discipline.
    pub discipline: Discipline,
    /// Trials per agent count.
    pub trials: u32,
    /// Smallest agent count of a sweep.
    pub min_agents: usize,
    /// Largest agent count of a sweep.
    pub max_agents: usize,
    /// Sweep stride.
    pub step: usize,
    /// Per-run cancellation bounds.
    pub budget: RunBudget,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            family: Family::Complete,
            discipline: Discipline::Sequential,
            trials: 10,
            min_agents: 5,
            max_agents: 100,
            step: 5,
            budget: RunBudget::default(),
        }
    }
}

impl ExperimentConfig {
    fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(GossipError::InvalidExperiment("trials must be > 0".into()));
        }
        if self.min_agents < 2 {
            return Err(GossipError::InvalidExperiment(
                "min_agents must be at least 2".into(),
            ));
        }
        if self.min_agents > self.max_agents {
            return Err(GossipError::InvalidExperiment(format!(
                "min_agents {} exceeds max_agents {}",
                self.min_agents, self.max_agents
            )));
        }
        if self.step == 0 {
            return Err(GossipError::InvalidExperiment("step must be > 0".into()));
        }
        Ok(())
    }
}

/// Aggregated results of one policy over a batch of trials.
///
/// Lengths and times are recorded for successful runs only; failed and
/// timed-out trials contribute to their counters alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyStats {
    /// Execution lengths (calls or rounds) of successful runs.
    pub lengths: Vec<u64>,
    /// Elapsed seconds of successful runs.
    pub times: Vec<f64>,
    /// Number of successful trials.
    pub successes: u32,
    /// Number of failed trials.
    pub failures: u32,
    /// Number of timed-out trials.
    pub timeouts: u32,
    /// Total trials recorded.
    pub trials: u32,
}

impl PolicyStats {
    /// Fold one run report into the aggregate.
    pub fn record(&mut self, report: &RunReport) {
        self.trials += 1;
        match report.outcome {
            Outcome::Success => {
                self.successes += 1;
                self.lengths.push(report.length);
                self.times.push(report.elapsed_secs);
            }
            Outcome::Failure => self.failures += 1,
            Outcome::Timeout => self.timeouts += 1,
        }
    }

    /// Mean execution length over successful runs, if any succeeded.
    pub fn mean_length(&self) -> Option<f64> {
        if self.lengths.is_empty() {
            return None;
        }
        Some(self.lengths.iter().sum::<u64>() as f64 / self.lengths.len() as f64)
    }

    /// Mean elapsed seconds over successful runs, if any succeeded.
    pub fn mean_time(&self) -> Option<f64> {
        if self.times.is_empty() {
            return None;
        }
        Some(self.times.iter().sum::<f64>() / self.times.len() as f64)
    }

    /// Fraction of trials that succeeded.
    pub fn success_rate(&self) -> f64 {
        self.rate(self.successes)
    }

    /// Fraction of trials that failed.
    pub fn failure_rate(&self) -> f64 {
        self.rate(self.failures)
    }

    /// Fraction of trials that timed out.
    pub fn timeout_rate(&self) -> f64 {
        self.rate(self.timeouts)
    }

    fn rate(&self, count: u32) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            f64::from(count) / f64::from(self.trials)
        }
    }
}

/// Run every policy against `trials` freshly generated topologies of `n`
/// agents.
///
/// Each trial generates one topology and hands every policy an independent
/// clone, so all five see the same network.
pub fn compare_policies<R: Rng + ?Sized>(
    n: usize,
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<BTreeMap<Policy, PolicyStats>> {
    config.validate()?;

    let mut results: BTreeMap<Policy, PolicyStats> = Policy::ALL
        .iter()
        .map(|&policy| (policy, PolicyStats::default()))
        .collect();

    for _ in 0..config.trials {
        let topology = Topology::generate(config.family, n, rng)?;
        for policy in Policy::ALL {
            let mut trial = topology.clone();
            let report = match config.discipline {
                Discipline::Sequential => {
                    run_sequential(&mut trial, policy, &config.budget, rng)
                }
                Discipline::Rounds => run_rounds(&mut trial, policy, &config.budget, rng),
            };
            results
                .get_mut(&policy)
                .expect("all policies pre-seeded")
                .record(&report);
        }
    }

    Ok(results)
}

/// Sweep agent counts from `min_agents` to `max_agents` in `step` strides,
/// comparing all policies at each point.
pub fn sweep<R: Rng + ?Sized>(config: &ExperimentConfig, rng: &mut R) -> Result<SweepReport> {
    config.validate()?;

    let mut rows = Vec::new();
    let mut n = config.min_agents;
    while n <= config.max_agents {
        let results = compare_policies(n, config, rng)?;
        info!(agents = n, "sweep point complete");
        rows.push(SweepRow::from_stats(n, &results));
        n += config.step;
    }

    Ok(SweepReport::new(config, rows))
}
