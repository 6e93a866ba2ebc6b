//! corridor — a small sorting floor driven by the planning brain.
//!
//! Two robots shuttle mail from two input stations on the left wall to
//! three output stations on the right wall of a 5×6 floor.  Each robot parks
//! on its own rest cell in the middle row between jobs, so the stations stay
//! clear for the other robot.
//!
//! Set `RUST_LOG=debug` to see every plan, `RUST_LOG=trace` for every action.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sc_core::{Direction, Position, RobotId, RobotType, SimConfig, SimRng, StationId};
use sc_output::{CsvWriter, RecordingObserver};
use sc_planner::{PathBrain, PlannerConfig, RestPolicy};
use sc_sim::{AlwaysReadyMail, SimBuilder};
use sc_spatial::{Grid, GridBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:     u64 = 42;
const END_TIME: f64 = 500.0;
const OUT_DIR:  &str = "output/corridor";

// ── Floor ─────────────────────────────────────────────────────────────────────

fn build_floor() -> Result<Grid> {
    let grid = GridBuilder::new(5, 6)
        .input(Position::new(0, 0), StationId(1))
        .input(Position::new(4, 0), StationId(2))
        .output(Position::new(0, 5), StationId(1))
        .output(Position::new(2, 5), StationId(2))
        .output(Position::new(4, 5), StationId(3))
        .wall(Position::new(1, 2))
        .wall(Position::new(3, 3))
        .build()?;
    Ok(grid)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let grid = build_floor()?;
    let starts = [(Position::new(2, 1), Direction::Up), (Position::new(2, 3), Direction::Down)];

    let rests: HashMap<RobotId, Position> =
        starts.iter().enumerate().map(|(i, (p, _))| (RobotId(i as u32), *p)).collect();
    let planner = PlannerConfig::default().with_rests(RestPolicy::Personal(rests));
    let brain = PathBrain::new(&grid, planner)?;

    let config = SimConfig::new(SEED, END_TIME);
    let mail = AlwaysReadyMail::new(grid.output_ids(), SimRng::new(config.seed));
    let kind = RobotType::new(1.0, 0.5, 1.0, 1.0);

    let mut builder = SimBuilder::new(config, grid, brain, mail);
    for (position, direction) in starts {
        builder = builder.robot(position, direction, kind);
    }
    let mut sim = builder.build()?;

    std::fs::create_dir_all(OUT_DIR)?;
    let mut obs = RecordingObserver::new(CsvWriter::new(Path::new(OUT_DIR))?);

    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    info!("simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("Delivered {} items by {}", sim.delivered(), sim.now());
    println!("  actions.csv : {} rows", obs.rows());
    println!();

    println!("{:<8} {:<10} {:<8} {:<8}", "Robot", "Cell", "Facing", "Mail");
    println!("{}", "-".repeat(36));
    for robot in sim.robots().iter() {
        println!(
            "{:<8} {:<10} {:<8} {:<8}",
            robot.id.0,
            robot.position.to_string(),
            robot.direction.as_str(),
            robot.mail.map_or_else(|| "-".to_owned(), |m| m.id.0.to_string()),
        );
    }

    Ok(())
}
