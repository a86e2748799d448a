//! Command-line front end: load a map, drop a robot on it, and let it find itself.
//!
//! Usage:
//!   grid-localizer maps/room.txt --pos 1 1 --dir 1 0 --print-map --wait 0.5
//!   grid-localizer maps/room.txt --seed 7 --json

use anyhow::{Context, Result};
use clap::Parser;
use glam::IVec2;
use grid_localizer::{
    Direction, Environment, GridMap, Localizer, LocalizerConfig, vector_from_slice,
};
use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Find a robot's starting pose on a known grid map
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File with the map ('X' is wall, anything else is open)
    file: String,

    /// Start position of the robot: ROW COL
    #[arg(long, num_args = 2, allow_negative_numbers = true)]
    pos: Option<Vec<i32>>,

    /// Start direction of the robot as a vector: ROW COL (e.g. 1 0 faces down)
    #[arg(long, num_args = 2, allow_negative_numbers = true)]
    dir: Option<Vec<i32>>,

    /// Sight range of the robot
    #[arg(long)]
    sight_range: Option<u32>,

    /// Seconds to wait between printed steps
    #[arg(long)]
    wait: Option<f64>,

    /// Print the map after every step (not recommended for large maps)
    #[arg(long)]
    print_map: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Seed for the random start pose
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

/// Start position from `--pos`, if given.
fn requested_position(args: &Args) -> Result<Option<IVec2>> {
    Ok(args.pos.as_deref().map(vector_from_slice).transpose()?)
}

/// Start direction from `--dir`. A vector that is not axis-aligned is
/// dropped with a warning so the direction gets picked at random.
fn requested_direction(args: &Args) -> Result<Option<Direction>> {
    let Some(dir) = args.dir.as_deref() else {
        return Ok(None);
    };
    match Direction::try_from(vector_from_slice(dir)?) {
        Ok(direction) => Ok(Some(direction)),
        Err(e) => {
            warn!("{e}; choosing a random direction");
            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => LocalizerConfig::load(path)
            .with_context(|| format!("failed to load config {path}"))?,
        None => LocalizerConfig::default(),
    };
    if let Some(range) = args.sight_range {
        config.sight_range = range;
    }
    if let Some(wait) = args.wait {
        config.step_delay_ms = (wait.max(0.0) * 1000.0) as u64;
    }
    config.print_map |= args.print_map;

    let map = GridMap::load(&args.file).with_context(|| format!("failed to load map {}", args.file))?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let position = requested_position(&args)?;
    let direction = requested_direction(&args)?;
    if position.is_none() {
        warn!("no start position given; choosing a random position");
    }
    if args.dir.is_none() {
        warn!("no start direction given; choosing a random direction");
    }
    let environment = Environment::with_partial_pose(map, position, direction, &mut rng)?;

    let print = config.print_map;
    let delay = config.step_delay();
    let mut localizer = Localizer::new(environment, config)?;
    let report = localizer.run(print, delay);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !print {
        println!(
            "{}",
            grid_localizer::render::summary(localizer.environment(), &report)
        );
    }

    Ok(())
}
