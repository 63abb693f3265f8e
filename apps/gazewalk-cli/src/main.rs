mod scenario;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use gazewalk_assets::FsLoader;
use gazewalk_common::{Clock, FixedClock};
use gazewalk_input::Aabb;
use gazewalk_kernel::{MoveBound, Session, SessionConfig, SessionEvent, SimulatedXr};
use gazewalk_tools::SessionInspector;
use glam::Vec3;
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "gazewalk-cli", about = "Gaze-driven walkthrough sessions from the command line")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session config (YAML); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum MoveMode {
    Duration,
    Distance,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Walk the desktop path with keys held down
    Walk {
        /// Key codes to hold, e.g. KeyW,KeyA
        #[arg(short, long, value_delimiter = ',', default_value = "KeyW")]
        keys: Vec<String>,
        /// Simulated seconds
        #[arg(short, long, default_value = "1.0")]
        seconds: f32,
        /// Frame delta in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
    },
    /// Dwell on a fixed head pose in VR and report gaze moves
    Gaze {
        /// Move bound for gaze-triggered moves
        #[arg(short, long, value_enum, default_value = "duration")]
        mode: MoveMode,
        /// Seconds (duration) or meters (distance); config value when omitted
        #[arg(short, long)]
        amount: Option<f32>,
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Frame delta in seconds
        #[arg(long, default_value = "0.05")]
        dt: f32,
        /// Place a gaze target with this id straight ahead
        #[arg(long)]
        target: Option<String>,
    },
    /// Run a scripted scenario file
    Simulate {
        scenario: PathBuf,
        /// Write the session event log as JSON
        #[arg(short, long)]
        events: Option<PathBuf>,
        /// Print a debug frame per tick
        #[arg(short, long)]
        render: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("gazewalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", gazewalk_common::crate_info());
            println!("input: {}", gazewalk_input::crate_info());
            println!("assets: {}", gazewalk_assets::crate_info());
            println!("kernel: {}", gazewalk_kernel::crate_info());
            println!("render: {}", gazewalk_render::crate_info());
            println!("tools: {}", gazewalk_tools::crate_info());
        }
        Commands::Walk { keys, seconds, dt } => {
            anyhow::ensure!(dt > 0.0, "dt must be positive");
            let mut session = Session::new(load_config(cli.config.as_deref())?)?;
            for key in &keys {
                if !session.key(key, true) {
                    tracing::warn!(%key, "unbound key ignored");
                }
            }

            let ticks = (seconds / dt).round().max(0.0) as u64;
            println!("Walk: keys={} ticks={ticks} dt={dt}", keys.join(","));
            let mut clock = FixedClock::new(dt);
            let xr = SimulatedXr::default();
            for _ in 0..ticks {
                session.tick(clock.tick(), &xr);
            }
            println!("{}", SessionInspector::rig(&session));
        }
        Commands::Gaze {
            mode,
            amount,
            ticks,
            dt,
            target,
        } => {
            anyhow::ensure!(dt > 0.0, "dt must be positive");
            let mut config = load_config(cli.config.as_deref())?;
            let current = config.locomotion.mode.magnitude();
            config.locomotion.mode = match mode {
                MoveMode::Duration => MoveBound::Duration {
                    seconds: amount.unwrap_or(current),
                },
                MoveMode::Distance => MoveBound::Distance {
                    meters: amount.unwrap_or(current),
                },
            };
            if let Some(id) = target {
                // A wide panel 5 m ahead of the spawn point.
                let center = config.rig.spawn_position + Vec3::new(0.0, 0.0, -5.0);
                config
                    .targets
                    .insert(id, Aabb::from_center(center, Vec3::new(50.0, 50.0, 0.1)));
            }
            let mut session = Session::new(config)?;

            let mut clock = FixedClock::new(dt);
            let xr = SimulatedXr::presenting();
            for _ in 0..ticks {
                session.tick(clock.tick(), &xr);
                for event in session.drain_events() {
                    print_event(&event);
                }
            }
            println!("{}", SessionInspector::summary(&session));
        }
        Commands::Simulate {
            scenario,
            events,
            render,
        } => {
            let script = Scenario::load(&scenario)?;
            let root = script
                .session
                .asset_root
                .clone()
                .or_else(|| scenario.parent().map(Path::to_path_buf))
                .unwrap_or_default();
            tracing::info!(root = %root.display(), ticks = script.ticks, "running scenario");

            let mut session = Session::new(script.session.clone())?;
            session.attach_loader(Arc::new(FsLoader::new(root)));
            for frame in script.run(&mut session, render) {
                print!("{frame}");
            }
            println!("{}", SessionInspector::summary(&session));

            if let Some(path) = events {
                let json = serde_json::to_string_pretty(session.events())?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing event log {}", path.display()))?;
                println!("Events: {} written to {}", session.events().len(), path.display());
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::load_yaml(path)
            .with_context(|| format!("loading session config {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::GazeTriggered {
            frame,
            target,
            action,
        } => {
            let target = target.as_ref().map_or("none", |t| t.as_str());
            println!("[{frame:>4}] gaze trigger on {target} -> {action:?}");
        }
        SessionEvent::MoveStarted {
            frame, direction, ..
        } => println!(
            "[{frame:>4}] move started dir=({:.2}, {:.2}, {:.2})",
            direction.x, direction.y, direction.z
        ),
        SessionEvent::MoveCompleted { frame, position } => println!(
            "[{frame:>4}] move completed at ({:.3}, {:.3}, {:.3})",
            position.x, position.y, position.z
        ),
        other => println!("{other:?}"),
    }
}
