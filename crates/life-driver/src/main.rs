//! Timer-driven driver that loads a pattern and steps it.

mod telemetry;

use anyhow::{Context, Result};
use life_core::{Cell, ChangeEvent, DriverConfig};
use life_world::Simulation;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

/// Env var naming a JSON config file
const CONFIG_ENV: &str = "LIFE_CONFIG";
const SUMMARY_EVERY: u64 = 100;

#[derive(Default)]
struct Tally {
    births: AtomicU64,
    deaths: AtomicU64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = match std::env::var(CONFIG_ENV) {
        Ok(path) => DriverConfig::from_json_file(&path)
            .with_context(|| format!("failed to read config {}", path))?,
        Err(_) => DriverConfig::default(),
    };
    if let Some(path) = std::env::args().nth(1) {
        config.pattern_path = Some(path);
    }

    telemetry::init_telemetry(config.log_json)?;
    info!("Starting Life driver");

    let mut sim = Simulation::new(config.simulation.clone());
    let tally = Arc::new(Tally::default());
    let sink = Arc::clone(&tally);
    sim.subscribe(move |event| match event {
        ChangeEvent::CellChanged { state: Cell::Alive, .. } => {
            sink.births.fetch_add(1, Ordering::Relaxed);
        }
        ChangeEvent::CellChanged { state: Cell::Dead, .. } => {
            sink.deaths.fetch_add(1, Ordering::Relaxed);
        }
        ChangeEvent::LoadComplete => {
            sink.births.store(0, Ordering::Relaxed);
            sink.deaths.store(0, Ordering::Relaxed);
        }
        _ => {}
    });

    match config.pattern_path.as_deref() {
        Some(path) => {
            info!("Loading pattern {}", path);
            sim.load(path)
                .await
                .with_context(|| format!("failed to load pattern {}", path))?;
        }
        None => {
            info!(
                "No pattern given, creating {0}x{0} grid",
                config.default_size
            );
            sim.new_pattern(config.default_size, config.randomize)?;
        }
    }

    info!(
        size = sim.size(),
        alive = sim.alive_count(),
        boundary = ?sim.config().boundary,
        "Simulation ready"
    );

    sim.toggle_play().context("nothing to simulate")?;

    tokio::select! {
        _ = run_loop(&mut sim, &config, &tally) => {}
        _ = shutdown_signal() => {}
    }

    if sim.is_playing() {
        sim.toggle_play()?;
    }

    info!(
        generation = sim.generation(),
        alive = sim.alive_count(),
        births = tally.births.load(Ordering::Relaxed),
        deaths = tally.deaths.load(Ordering::Relaxed),
        "Simulation stopped"
    );

    Ok(())
}

async fn run_loop(sim: &mut Simulation, config: &DriverConfig, tally: &Tally) {
    let mut ticker = interval(Duration::from_millis(config.tick_interval_ms.max(1)));
    // Skip missed ticks instead of bursting after a stall
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while sim.is_playing() {
        ticker.tick().await;

        let Some(report) = sim.step() else {
            break;
        };

        if report.generation % SUMMARY_EVERY == 0 {
            info!(
                generation = report.generation,
                alive = sim.alive_count(),
                births = tally.births.load(Ordering::Relaxed),
                deaths = tally.deaths.load(Ordering::Relaxed),
                "Progress"
            );
        }

        if sim.alive_count() == 0 {
            info!(generation = report.generation, "Population died out");
            break;
        }

        if config
            .max_generations
            .is_some_and(|max| report.generation >= max)
        {
            debug!(generation = report.generation, "Generation limit reached");
            break;
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
