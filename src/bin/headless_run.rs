//! Headless batch runner: load a room snapshot, run it for a fixed
//! number of frames, and print a report summary.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use gridspire::core::config::EngineConfig;
use gridspire::core::report::ReportLevel;
use gridspire::entity::behaviors::InputSnapshot;
use gridspire::world::load_from_file;

#[derive(Parser)]
#[command(name = "headless_run", about = "Run a Gridspire room without a host")]
struct Args {
    /// Path to the room snapshot JSON
    #[arg(long)]
    room: PathBuf,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// RNG seed override for spawn-point selection
    #[arg(long)]
    seed: Option<u64>,

    /// Frame duration in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gridspire=warn")),
        )
        .init();

    let args = Args::parse();
    let mut config = EngineConfig::default();
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }

    let mut room = match load_from_file(&args.room, config) {
        Ok(room) => room,
        Err(err) => {
            eprintln!("failed to load {}: {err}", args.room.display());
            return ExitCode::FAILURE;
        }
    };

    for _ in 0..args.frames {
        room.set_input(InputSnapshot::new());
        room.tick(args.dt);
    }

    println!(
        "ran {} frames ({:.2}s simulated), {} entities live",
        room.frame(),
        room.sim_time(),
        room.len()
    );
    println!(
        "reports: {} info, {} warn, {} error ({} dropped)",
        room.sink().count_at(ReportLevel::Info),
        room.sink().count_at(ReportLevel::Warn),
        room.sink().count_at(ReportLevel::Error),
        room.sink().dropped()
    );
    ExitCode::SUCCESS
}
