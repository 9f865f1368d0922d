//! Gossip simulator CLI binary.
//!
//! # Commands
//!
//! - `run` - Execute one policy on one freshly generated topology
//! - `compare` - Run all five policies against the same topologies
//! - `sweep` - Full experiment over a range of agent counts
//! - `report` - Render a previously saved sweep report

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use gossip::config::Config;
use gossip::engine::{RunBudget, WallClock};
use gossip::experiment::{compare_policies, sweep, ExperimentConfig, SweepReport, SweepRow};
use gossip::{run_rounds, run_sequential, Discipline, Family, Policy, Topology, VERSION};

#[derive(Parser)]
#[command(name = "gossip")]
#[command(author = "Gossip Core Contributors")]
#[command(version = VERSION)]
#[command(about = "Gossip protocol simulator - epidemic information spreading", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one policy on one freshly generated topology
    Run {
        /// Number of agents
        #[arg(short = 'n', long, default_value = "10")]
        agents: usize,

        /// Topology family (complete, incomplete, dynamic)
        #[arg(short, long, default_value = "complete")]
        topology: Family,

        /// Policy (ANY, CO, LNS, TOK, SPI)
        #[arg(short, long, default_value = "ANY")]
        policy: Policy,

        /// Schedule calls in synchronized rounds instead of sequentially
        #[arg(short, long)]
        rounds: bool,

        /// RNG seed (random if omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Hard cap on calls/rounds
        #[arg(long)]
        max_steps: Option<u64>,

        /// Disable the wall-clock timeout
        #[arg(long)]
        no_timeout: bool,

        /// Output the full report as JSON (including the call history)
        #[arg(long)]
        json: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run all five policies against the same topologies
    Compare {
        /// Number of agents
        #[arg(short = 'n', long, default_value = "10")]
        agents: usize,

        /// Topology family (complete, incomplete, dynamic)
        #[arg(short, long, default_value = "complete")]
        topology: Family,

        /// Number of trials
        #[arg(long, default_value = "10")]
        trials: u32,

        /// Schedule calls in synchronized rounds instead of sequentially
        #[arg(short, long)]
        rounds: bool,

        /// RNG seed (random if omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Full experiment over a range of agent counts
    Sweep {
        /// Topology family (complete, incomplete, dynamic)
        #[arg(short, long, default_value = "complete")]
        topology: Family,

        /// Number of trials per agent count
        #[arg(long, default_value = "10")]
        trials: u32,

        /// Smallest agent count
        #[arg(long, default_value = "5")]
        min_agents: usize,

        /// Largest agent count
        #[arg(long, default_value = "100")]
        max_agents: usize,

        /// Agent count stride
        #[arg(long, default_value = "5")]
        step: usize,

        /// Schedule calls in synchronized rounds instead of sequentially
        #[arg(short, long)]
        rounds: bool,

        /// RNG seed (random if omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// TOML config file (CLI arguments take precedence)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file for the JSON report
        #[arg(short, long, default_value = "sweep-report.json")]
        output: PathBuf,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render a previously saved sweep report
    Report {
        /// Report file written by `gossip sweep`
        file: PathBuf,

        /// Output raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            agents,
            topology,
            policy,
            rounds,
            seed,
            max_steps,
            no_timeout,
            json,
            verbose,
        } => cmd_run(
            agents, topology, policy, rounds, seed, max_steps, no_timeout, json, verbose,
        ),
        Commands::Compare {
            agents,
            topology,
            trials,
            rounds,
            seed,
            json,
            verbose,
        } => cmd_compare(agents, topology, trials, rounds, seed, json, verbose),
        Commands::Sweep {
            topology,
            trials,
            min_agents,
            max_agents,
            step,
            rounds,
            seed,
            config,
            output,
            verbose,
        } => cmd_sweep(
            topology, trials, min_agents, max_agents, step, rounds, seed, config, output, verbose,
        ),
        Commands::Report { file, json } => cmd_report(&file, json),
    }
}

/// Initialize logging
fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

/// Build an RNG from an optional seed
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn discipline_for(rounds: bool) -> Discipline {
    if rounds {
        Discipline::Rounds
    } else {
        Discipline::Sequential
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    agents: usize,
    topology: Family,
    policy: Policy,
    rounds: bool,
    seed: Option<u64>,
    max_steps: Option<u64>,
    no_timeout: bool,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    init_logging(verbose);
    let mut rng = make_rng(seed);

    let budget = RunBudget {
        max_steps,
        wall_clock: if no_timeout {
            WallClock::Disabled
        } else {
            WallClock::PerAgent
        },
    };

    let mut network = Topology::generate(topology, agents, &mut rng)?;
    let report = if rounds {
        run_rounds(&mut network, policy, &budget, &mut rng)
    } else {
        run_sequential(&mut network, policy, &budget, &mut rng)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let unit = if rounds { "rounds" } else { "calls" };
        println!(
            "{} on {} topology ({} agents, {}): {} after {} {} in {:.4}s",
            policy,
            topology,
            agents,
            discipline_for(rounds),
            report.outcome,
            report.length,
            unit,
            report.elapsed_secs,
        );
    }

    Ok(())
}

fn cmd_compare(
    agents: usize,
    topology: Family,
    trials: u32,
    rounds: bool,
    seed: Option<u64>,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    init_logging(verbose);
    let mut rng = make_rng(seed);

    let config = ExperimentConfig {
        family: topology,
        discipline: discipline_for(rounds),
        trials,
        ..ExperimentConfig::default()
    };
    let results = compare_policies(agents, &config, &mut rng)?;

    if json {
        let row = SweepRow::from_stats(agents, &results);
        println!("{}", serde_json::to_string_pretty(&row)?);
        return Ok(());
    }

    println!(
        "{} topology, {} agents, {} trials, {} discipline",
        topology,
        agents,
        trials,
        config.discipline
    );
    println!(
        "{:<6} {:>9} {:>9} {:>9} {:>12} {:>12}",
        "policy", "success", "failure", "timeout", "avg length", "avg time (s)"
    );
    for (policy, stats) in &results {
        println!(
            "{:<6} {:>8.0}% {:>8.0}% {:>8.0}% {:>12} {:>12}",
            policy.name(),
            stats.success_rate() * 100.0,
            stats.failure_rate() * 100.0,
            stats.timeout_rate() * 100.0,
            stats
                .mean_length()
                .map_or_else(|| "-".to_string(), |v| format!("{v:.1}")),
            stats
                .mean_time()
                .map_or_else(|| "-".to_string(), |v| format!("{v:.4}")),
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_sweep(
    topology: Family,
    trials: u32,
    min_agents: usize,
    max_agents: usize,
    step: usize,
    rounds: bool,
    seed: Option<u64>,
    config_file: Option<PathBuf>,
    output: PathBuf,
    verbose: bool,
) -> anyhow::Result<()> {
    init_logging(verbose);
    let mut rng = make_rng(seed);

    // File config as the base, CLI arguments on top.
    let mut config = match config_file {
        Some(path) => Config::from_file(path)?.experiment_config(),
        None => ExperimentConfig::default(),
    };
    config.family = topology;
    config.discipline = discipline_for(rounds);
    config.trials = trials;
    config.min_agents = min_agents;
    config.max_agents = max_agents;
    config.step = step;

    tracing::info!(
        family = %config.family,
        discipline = %config.discipline,
        trials = config.trials,
        "starting sweep"
    );
    let report = sweep(&config, &mut rng)?;
    report.save(&output)?;

    print!("{}", report.render_table());
    println!("Report written to {}", output.display());

    Ok(())
}

fn cmd_report(file: &Path, json: bool) -> anyhow::Result<()> {
    let report = SweepReport::load(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_table());
    }

    Ok(())
}
