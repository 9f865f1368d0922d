//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables (`GOSSIP_*`)
//! - CLI arguments (applied on top by the binary)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{RunBudget, WallClock};
use crate::error::{GossipError, Result};
use crate::experiment::{Discipline, ExperimentConfig};
use crate::topology::Family;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Experiment configuration
    #[serde(default)]
    pub experiment: ExperimentSection,

    /// Engine budget configuration
    #[serde(default)]
    pub engine: EngineSection,

    /// Output configuration
    #[serde(default)]
    pub output: OutputSection,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| GossipError::Config(format!("Failed to read config file: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| GossipError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(family) = std::env::var("GOSSIP_TOPOLOGY") {
            if let Ok(family) = family.parse() {
                config.experiment.family = family;
            }
        }
        if let Ok(discipline) = std::env::var("GOSSIP_DISCIPLINE") {
            if let Ok(discipline) = discipline.parse() {
                config.experiment.discipline = discipline;
            }
        }
        if let Ok(trials) = std::env::var("GOSSIP_TRIALS") {
            if let Ok(trials) = trials.parse() {
                config.experiment.trials = trials;
            }
        }
        if let Ok(max_agents) = std::env::var("GOSSIP_MAX_AGENTS") {
            if let Ok(max_agents) = max_agents.parse() {
                config.experiment.max_agents = max_agents;
            }
        }
        if let Ok(max_steps) = std::env::var("GOSSIP_MAX_STEPS") {
            if let Ok(max_steps) = max_steps.parse() {
                config.engine.max_steps = Some(max_steps);
            }
        }

        config
    }

    /// Resolve the experiment parameters these settings describe.
    pub fn experiment_config(&self) -> ExperimentConfig {
        ExperimentConfig {
            family: self.experiment.family,
            discipline: self.experiment.discipline,
            trials: self.experiment.trials,
            min_agents: self.experiment.min_agents,
            max_agents: self.experiment.max_agents,
            step: self.experiment.step,
            budget: self.engine.budget(),
        }
    }
}

/// Experiment sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSection {
    /// Topology family to generate
    pub family: Family,

    /// Scheduling discipline
    pub discipline: Discipline,

    /// Trials per agent count
    pub trials: u32,

    /// Smallest agent count of a sweep
    pub min_agents: usize,

    /// Largest agent count of a sweep
    pub max_agents: usize,

    /// Sweep stride
    pub step: usize,
}

impl Default for ExperimentSection {
    fn default() -> Self {
        let defaults = ExperimentConfig::default();
        Self {
            family: defaults.family,
            discipline: defaults.discipline,
            trials: defaults.trials,
            min_agents: defaults.min_agents,
            max_agents: defaults.max_agents,
            step: defaults.step,
        }
    }
}

/// Engine budget configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSection {
    /// Hard cap on calls/rounds per run (None = unbounded)
    pub max_steps: Option<u64>,

    /// Fixed wall-clock limit in seconds (overrides the per-agent default)
    pub timeout_secs: Option<f64>,

    /// Disable the wall-clock guard entirely
    #[serde(default)]
    pub no_timeout: bool,
}

impl EngineSection {
    /// Resolve these settings into a run budget.
    pub fn budget(&self) -> RunBudget {
        let wall_clock = if self.no_timeout {
            WallClock::Disabled
        } else {
            match self.timeout_secs {
                Some(secs) => WallClock::Fixed(Duration::from_secs_f64(secs)),
                None => WallClock::PerAgent,
            }
        };
        RunBudget {
            max_steps: self.max_steps,
            wall_clock,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Directory for sweep reports
    pub results_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            results_dir: dirs::data_dir().map(|p| p.join("gossip")),
            pretty: true,
        }
    }
}
