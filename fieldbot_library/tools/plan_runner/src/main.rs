//! # plan_runner - Offline control-cycle runner
//!
//! Replays a recorded scenario through perception and planning and prints one
//! JSON line per cycle.
//!
//! Usage:
//!   plan_runner --scenario capture.json                      # Default field
//!   plan_runner --config field.toml --scenario capture.json  # Custom field
//!   plan_runner --scenario capture.json --cycles 100 -v      # Debug logging

use anyhow::{Context, Result};
use clap::Parser;
use fieldbot_library::{Circle, FieldbotConfig, MotionPlanner, Perception, PlanOutcome, Point2};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "plan_runner")]
#[command(about = "Run the fieldbot perception and planning cycle over a recorded scenario")]
pub struct Args {
    /// Field configuration file (TOML or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario file (JSON)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Number of control cycles to run
    #[arg(long, default_value = "1")]
    cycles: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// One recorded sensor sweep with the robot state
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub pose: Point2,

    /// Explicit goal; the nearest detected circle is used when absent
    #[serde(default)]
    pub goal: Option<Point2>,

    #[serde(default)]
    pub sensor_points: Vec<Point2>,

    /// Other robots as `[min, max]` rectangles
    #[serde(default)]
    pub dynamic_obstacles: Vec<(Point2, Point2)>,
}

/// Printed once per cycle
#[derive(Debug, Serialize)]
struct CycleReport<'a> {
    cycle: usize,
    circles: &'a [Circle],
    #[serde(flatten)]
    outcome: &'a PlanOutcome,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = load_config(args.config.as_deref())?;
    let scenario = load_scenario(&args.scenario)?;

    info!(
        "Grid {}m x {}m at {}m, {} static obstacles",
        config.grid.width,
        config.grid.height,
        config.grid.cell_resolution,
        config.planning.static_obstacles.len()
    );

    let perception = Perception::new(&config.perception);
    let mut planner = MotionPlanner::from_config(&config)?;

    let started = Instant::now();
    for cycle in 0..args.cycles {
        let (circles, outcome) = run_cycle(&perception, &mut planner, &scenario);
        let report = CycleReport {
            cycle,
            circles: &circles,
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string(&report)?);
    }

    info!(
        "Ran {} cycles in {:.3} ms",
        args.cycles,
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

/// Detect circles, then plan toward the explicit goal or the nearest circle
fn run_cycle(
    perception: &Perception,
    planner: &mut MotionPlanner,
    scenario: &Scenario,
) -> (Vec<Circle>, PlanOutcome) {
    let circles = perception.detect(&scenario.sensor_points);
    let outcome = match scenario.goal {
        Some(goal) => planner.plan(scenario.pose, Some(goal), &scenario.dynamic_obstacles),
        None => planner.plan_to_nearest(scenario.pose, &circles, &scenario.dynamic_obstacles),
    };
    (circles, outcome)
}

fn load_config(path: Option<&Path>) -> Result<FieldbotConfig> {
    match path {
        Some(path) => {
            let config = FieldbotConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            info!("Loaded config: {}", path.display());
            Ok(config)
        }
        None => {
            info!("No config given, using default field");
            Ok(FieldbotConfig::default())
        }
    }
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse scenario {}", path.display()))?;
    info!(
        "Loaded scenario: {} sensor points, {} dynamic obstacles",
        scenario.sensor_points.len(),
        scenario.dynamic_obstacles.len()
    );
    Ok(scenario)
}
