#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Maze Runner sessions from input scripts.

mod headless;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use maze_runner_rendering::{palette, Presentation, RenderingBackend, Scene};
use maze_runner_system_session::{SessionConfig, SessionController, DEFAULT_MAZE_SIZE};
use maze_runner_world::query;
use tracing_subscriber::EnvFilter;

use crate::headless::HeadlessBackend;

/// Runs a maze session headlessly and prints the final view.
#[derive(Debug, Parser)]
#[command(name = "maze-runner", version, about)]
struct CliArgs {
    /// Maze width in rooms.
    #[arg(long, default_value_t = DEFAULT_MAZE_SIZE)]
    width: u32,
    /// Maze height in rooms.
    #[arg(long, default_value_t = DEFAULT_MAZE_SIZE)]
    height: u32,
    /// Seed for maze generation; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Input script, for example `forward*30 right*45 forward*60 legend`.
    #[arg(long, default_value = "idle")]
    script: String,
}

/// Entry point for the Maze Runner command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let frames = script::parse(&args.script).context("failed to parse --script")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = SessionConfig::new(args.width, args.height, seed);
    let mut session = SessionController::new(config).context("invalid maze configuration")?;

    println!("{}", query::welcome_banner(session.world()));
    tracing::info!(seed, frames = frames.len(), fps = args.fps, "starting headless run");

    let presentation = Presentation::new(
        "Maze Runner",
        palette::SKY,
        Scene::from_snapshot(&session.snapshot()),
    );
    let backend = HeadlessBackend::new(frames, args.fps)?;
    let scene = backend.run(presentation, |dt, input, scene| {
        let _ = session.update(&input, dt);
        *scene = Scene::from_snapshot(&session.snapshot());
        !session.should_quit()
    })?;

    println!("Seed {seed}");
    print_scene(&scene);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_scene(scene: &Scene) {
    if let Some(rows) = &scene.hud.minimap {
        for row in rows {
            println!("{row}");
        }
    }
    for line in scene.hud.lines.iter().chain(&scene.hud.legend) {
        println!("{line}");
    }
}
