#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Motion Maze session.
//!
//! Keyboard lines, the simulated sensor and the tick driver all feed one
//! engine runtime. Frames go to stdout; logs and status reports go to stderr.

mod config;
mod input;
mod report;
mod sensor;

use std::{
    fs::OpenOptions,
    io::{self, BufRead},
    path::PathBuf,
    sync::mpsc,
    thread::JoinHandle,
};

use anyhow::{anyhow, Context, Result as AnyResult};
use clap::Parser;
use motion_maze_actuator::Panel;
use motion_maze_engine::{Engine, EngineHandle, Submitter};
use motion_maze_rendering::{StatusReport, TextBackend};
use tracing::{info, warn, Level};

use crate::{
    config::Settings,
    input::{parse_line, Input},
    report::{format_report, spawn_reporter, FrameObserver},
    sensor::Sensor,
};

const SENSOR_SEED_SALT: u64 = 0x5851_f42d_4c95_7f2d;

/// Motion-controlled maze game driven from the terminal.
#[derive(Debug, Parser)]
#[command(name = "motion-maze", version, about)]
struct Cli {
    /// TOML configuration file; `motion-maze.toml` is read when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for every random source; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Tick interval in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Disables the simulated motion sensor.
    #[arg(long)]
    no_sensor: bool,
    /// Makes maze walls block movement.
    #[arg(long)]
    respect_walls: bool,
    /// Seconds between status reports.
    #[arg(long)]
    status_secs: Option<u64>,
    /// Emits status reports as JSON.
    #[arg(long)]
    json_status: bool,
    /// Skips printing maze frames.
    #[arg(long)]
    headless: bool,
    /// File or device that receives actuator bytes.
    #[arg(long)]
    actuator_device: Option<PathBuf>,
    /// Maximum log level.
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

impl Cli {
    fn settings(&self) -> AnyResult<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if self.seed.is_some() {
            settings.game.seed = self.seed;
        }
        if let Some(tick_ms) = self.tick_ms {
            settings.game.tick_ms = tick_ms;
        }
        if let Some(interval_secs) = self.status_secs {
            settings.status.interval_secs = interval_secs;
        }
        if self.actuator_device.is_some() {
            settings.actuator.device.clone_from(&self.actuator_device);
        }
        settings.game.respect_walls |= self.respect_walls;
        settings.sensor.enabled &= !self.no_sensor;
        settings.status.json |= self.json_status;
        settings.validate().context("invalid command-line overrides")?;
        Ok(settings)
    }
}

fn main() -> AnyResult<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    let settings = cli.settings()?;
    let seed = settings.game.seed.unwrap_or_else(rand::random);
    info!(seed, "session_configured");

    let mut engine =
        Engine::new(settings.world_config(seed)).context("failed to build the game engine")?;
    engine.set_actuator(Box::new(open_panel(&settings)?));
    if !cli.headless {
        let _ = engine.subscribe(Box::new(FrameObserver::new(TextBackend::stdout())));
    }
    let _ = engine.start();

    let handle = EngineHandle::spawn(engine, Some(settings.tick_interval()));
    let submitter = handle.submitter();
    let (stop, workers) = spawn_workers(&settings, seed, &submitter);

    read_keyboard(&submitter)?;

    drop(stop);
    for worker in workers {
        worker
            .join()
            .map_err(|_| anyhow!("background thread panicked"))?;
    }
    let engine = handle.shutdown().context("failed to stop the engine")?;

    let summary = StatusReport::from_snapshot(&engine.snapshot());
    info!(report = %format_report(&summary, settings.status.json)?, "session_finished");
    // Drains the actuator panel's queued bytes.
    drop(engine);
    Ok(())
}

fn open_panel(settings: &Settings) -> AnyResult<Panel> {
    let Some(device) = settings.actuator.device.as_ref() else {
        return Ok(Panel::spawn(io::sink()));
    };
    let sink = OpenOptions::new()
        .write(true)
        .create(true)
        .append(true)
        .open(device)
        .with_context(|| format!("failed to open actuator device {}", device.display()))?;
    info!(device = %device.display(), "actuator_opened");
    Ok(Panel::spawn(sink))
}

/// Starts the sensor and reporter; dropping the returned senders stops them.
fn spawn_workers(
    settings: &Settings,
    seed: u64,
    submitter: &Submitter,
) -> (Vec<mpsc::Sender<()>>, Vec<JoinHandle<()>>) {
    let mut stops = Vec::new();
    let mut workers = Vec::new();

    if settings.sensor.enabled {
        let (stop, stopped) = mpsc::channel();
        stops.push(stop);
        workers.push(sensor::spawn(
            Sensor::new(seed ^ SENSOR_SEED_SALT, settings.sensor.fire_chance),
            settings.sensor_interval(),
            submitter.clone(),
            stopped,
        ));
    }

    let (stop, stopped) = mpsc::channel();
    stops.push(stop);
    workers.push(spawn_reporter(
        submitter.clone(),
        settings.status_interval(),
        settings.status.json,
        stopped,
    ));

    (stops, workers)
}

fn read_keyboard(submitter: &Submitter) -> AnyResult<()> {
    info!("controls: w/a/s/d move, b button, m motion, p pause, t x y teleport, q quit");
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read standard input")?;
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(error) => {
                warn!(error = %format!("{error:#}"), "input_rejected");
                continue;
            }
        };
        if input == Input::Quit {
            break;
        }
        input
            .submit(submitter)
            .context("engine stopped accepting input")?;
    }
    Ok(())
}
