//! Headless CIRL production simulator
//!
//! Runs a seeded Monte Carlo batch and prints a score summary.

use std::path::PathBuf;

use cirl_production::core::{EpisodeRng, QuantityRounding};
use cirl_production::simulation::{
    random_human_policies, BatchReport, EpisodeFailure, ScenarioFile, Simulator,
};
use cirl_production::{GameConfig, Result};
use clap::Parser;
use rand::SeedableRng;
use serde::Serialize;

/// CIRL production simulator - estimate expected return over many episodes
#[derive(Parser, Debug)]
#[command(name = "cirl_sim")]
#[command(about = "Run seeded batches of the CIRL production game")]
struct Args {
    /// Scenario TOML with [game], [robot] and [[human_policies]] tables
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of object types (ignored with --scenario)
    #[arg(long, default_value_t = 2)]
    num_objects: usize,

    /// Items the human produces per turn (ignored with --scenario)
    #[arg(long, default_value_t = 4)]
    human_prod_cap: u32,

    /// Items of one type the robot produces when specialising (ignored with --scenario)
    #[arg(long, default_value_t = 1)]
    robot_prod_cap: u32,

    /// Robot diversification bonus (ignored with --scenario)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    delta: f64,

    /// Turns per episode (ignored with --scenario)
    #[arg(long, default_value_t = 10)]
    max_t: usize,

    /// Discount factor in (0, 1] (ignored with --scenario)
    #[arg(long, default_value_t = 1.0)]
    gamma: f64,

    /// Round robot quantities down instead of keeping them exact
    #[arg(long)]
    floor_quantities: bool,

    /// Number of episodes in the batch
    #[arg(long, default_value_t = 1000)]
    episodes: usize,

    /// Base seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Random human policies to generate when the scenario defines none
    #[arg(long, default_value_t = 3)]
    policies: usize,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Include every episode's score in the output
    #[arg(long)]
    per_episode: bool,
}

/// Mixed into the base seed for random policy generation
const POLICY_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    base_seed: u64,
    episodes: usize,
    failed: usize,
    mean: Option<f64>,
    std_dev: Option<f64>,
    human_policies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    rewards: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<EpisodeFailure>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cirl_production=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(|| rand::random());

    let scenario = match &args.scenario {
        Some(path) => ScenarioFile::load_from_toml(path)?,
        None => ScenarioFile {
            game: game_from_args(args),
            ..ScenarioFile::default()
        },
    };

    let mut config = scenario.into_simulation_config()?;
    if config.human_policies.is_empty() {
        // Separate stream: episode seeds depend on `seed` alone
        let mut rng = EpisodeRng::seed_from_u64(seed ^ POLICY_STREAM);
        config.human_policies = random_human_policies(&config.game, args.policies, &mut rng)?;
    }

    let simulator = Simulator::new(config)?;
    tracing::info!(
        "Running {} episodes of {} turns with {} human policies (seed {})",
        args.episodes,
        simulator.config().game.max_t,
        simulator.config().human_policies.len(),
        seed
    );
    let report = simulator.run_batch(args.episodes, seed);

    print_report(args, &report, simulator.config().human_policies.len())
}

fn game_from_args(args: &Args) -> GameConfig {
    GameConfig {
        num_objects: args.num_objects,
        human_prod_cap: args.human_prod_cap,
        robot_prod_cap: args.robot_prod_cap,
        delta: args.delta,
        max_t: args.max_t,
        gamma: args.gamma,
        quantity_rounding: if args.floor_quantities {
            QuantityRounding::Floor
        } else {
            QuantityRounding::Exact
        },
    }
}

fn print_report(args: &Args, report: &BatchReport, human_policies: usize) -> Result<()> {
    let summary = RunSummary {
        base_seed: report.base_seed,
        episodes: report.attempted(),
        failed: report.failures.len(),
        mean: report.mean(),
        std_dev: report.std_dev(),
        human_policies,
        rewards: args.per_episode.then(|| report.rewards()),
        failures: report.failures.clone(),
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "text" => {
            println!("CIRL Production Batch");
            println!("=====================");
            println!("Episodes: {} ({} failed)", summary.episodes, summary.failed);
            println!("Human policies: {}", summary.human_policies);
            match (summary.mean, summary.std_dev) {
                (Some(mean), Some(sd)) => println!("Score: {:.4} +/- {:.4}", mean, sd),
                (Some(mean), None) => println!("Score: {:.4}", mean),
                _ => println!("Score: n/a"),
            }
            for failure in &summary.failures {
                println!("  episode {} (seed {}): {}", failure.index, failure.seed, failure.error);
            }
            if let Some(rewards) = &summary.rewards {
                for (i, r) in rewards.iter().enumerate() {
                    println!("  {:>6}: {:.4}", i, r);
                }
            }
            println!();
            println!("Seed: {}", summary.base_seed);
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
