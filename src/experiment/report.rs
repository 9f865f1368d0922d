//! On-disk sweep reports.
//!
//! A [`SweepReport`] is the serializable aggregate of one sweep: per agent
//! count, per policy, the success/failure/timeout rates and the means over
//! successful runs. Reports round-trip through pretty-printed JSON so a
//! finished sweep can be reloaded and re-rendered without rerunning it.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Discipline, ExperimentConfig, PolicyStats};
use crate::error::Result;
use crate::policy::Policy;
use crate::topology::Family;

/// Aggregate of one policy at one agent count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySummary {
    /// Mean execution length over successful runs, if any.
    pub mean_length: Option<f64>,
    /// Mean elapsed seconds over successful runs, if any.
    pub mean_time_secs: Option<f64>,
    /// Fraction of trials that succeeded.
    pub success_rate: f64,
    /// Fraction of trials that failed.
    pub failure_rate: f64,
    /// Fraction of trials that timed out.
    pub timeout_rate: f64,
}

impl From<&PolicyStats> for PolicySummary {
    fn from(stats: &PolicyStats) -> Self {
        Self {
            mean_length: stats.mean_length(),
            mean_time_secs: stats.mean_time(),
            success_rate: stats.success_rate(),
            failure_rate: stats.failure_rate(),
            timeout_rate: stats.timeout_rate(),
        }
    }
}

/// All policy summaries at one agent count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    /// Agent count of this sweep point.
    pub agents: usize,
    /// Summaries keyed by policy name.
    pub policies: BTreeMap<String, PolicySummary>,
}

impl SweepRow {
    /// Build a row from the per-policy aggregates of one sweep point.
    pub fn from_stats(agents: usize, stats: &BTreeMap<Policy, PolicyStats>) -> Self {
        let policies = stats
            .iter()
            .map(|(policy, stats)| (policy.name().to_string(), PolicySummary::from(stats)))
            .collect();
        Self { agents, policies }
    }
}

/// Serializable result of a full sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Topology family the sweep ran on.
    pub family: Family,
    /// Scheduling discipline.
    pub discipline: Discipline,
    /// Trials per agent count.
    pub trials: u32,
    /// When the sweep finished.
    pub generated_at: DateTime<Utc>,
    /// One row per agent count, ascending.
    pub rows: Vec<SweepRow>,
}

impl SweepReport {
    /// Assemble a report from an experiment configuration and its rows.
    pub fn new(config: &ExperimentConfig, rows: Vec<SweepRow>) -> Self {
        Self {
            family: config.family,
            discipline: config.discipline,
            trials: config.trials,
            generated_at: Utc::now(),
            rows,
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a report previously written by [`SweepReport::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Render the report as an aligned plain-text table.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} topology, {} discipline, {} trials per point",
            self.family, self.discipline, self.trials
        );
        let _ = writeln!(
            out,
            "{:>7}  {:<6} {:>9} {:>9} {:>9} {:>12} {:>12}",
            "agents", "policy", "success", "failure", "timeout", "avg length", "avg time (s)"
        );

        for row in &self.rows {
            for (name, summary) in &row.policies {
                let _ = writeln!(
                    out,
                    "{:>7}  {:<6} {:>8.0}% {:>8.0}% {:>8.0}% {:>12} {:>12}",
                    row.agents,
                    name,
                    summary.success_rate * 100.0,
                    summary.failure_rate * 100.0,
                    summary.timeout_rate * 100.0,
                    summary
                        .mean_length
                        .map_or_else(|| "-".to_string(), |v| format!("{v:.1}")),
                    summary
                        .mean_time_secs
                        .map_or_else(|| "-".to_string(), |v| format!("{v:.4}")),
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> SweepReport {
        let mut stats = PolicyStats::default();
        stats.record(&crate::engine::RunReport {
            length: 6,
            elapsed_secs: 0.01,
            outcome: crate::engine::Outcome::Success,
            history: Vec::new(),
        });
        let mut by_policy = BTreeMap::new();
        for policy in Policy::ALL {
            by_policy.insert(policy, stats.clone());
        }
        SweepReport::new(
            &ExperimentConfig::default(),
            vec![SweepRow::from_stats(5, &by_policy)],
        )
    }

    #[test]
    fn test_json_roundtrip() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let restored: SweepReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, restored);
    }

    #[test]
    fn test_save_and_load() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.json");

        report.save(&path).unwrap();
        let restored = SweepReport::load(&path).unwrap();
        assert_eq!(report, restored);
    }

    #[test]
    fn test_table_lists_every_policy() {
        let table = sample_report().render_table();
        for policy in Policy::ALL {
            assert!(table.contains(policy.name()), "missing {policy}");
        }
        assert!(table.contains("100%"));
    }
}
