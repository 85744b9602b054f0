//! Horde Runtime
//!
//! Headless binary that runs a scripted session: the player circles the
//! arena, shoots at the closest enemy and restarts after each defeat.

use anyhow::{Context, Result};
use clap::Parser;
use horde_core::math::{planar_direction, Vec2, Vec3};
use horde_core::time::{TICK_RATE_HZ, TICK_SECONDS};
use horde_metrics::TickTimer;
use horde_sim::components::Translation;
use horde_sim::{EntityKind, GameConfig, SessionState, Simulation, TickInput};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "horde", version, about = "Run a headless one-vs-many session")]
struct Cli {
    /// JSON game config; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of fixed ticks to simulate.
    #[arg(long, default_value_t = 60 * 120)]
    ticks: u64,

    /// Override the config's spawn seed.
    #[arg(long)]
    seed: Option<u64>,

    /// How many times to restart after a defeat before stopping.
    #[arg(long, default_value_t = 2)]
    restarts: u32,

    /// Ticks between shots.
    #[arg(long, default_value_t = 12)]
    fire_every: u64,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    info!("Horde v{}", horde_core::VERSION);
    let mut sim = Simulation::new(config).context("creating simulation")?;
    sim.start()?;

    let mut timer = TickTimer::new(TICK_RATE_HZ as usize);
    let mut restarts_left = cli.restarts;
    for tick in 0..cli.ticks {
        if sim.state() == SessionState::GameOver {
            if restarts_left == 0 {
                info!(tick, "out of restarts, stopping");
                break;
            }
            restarts_left -= 1;
            sim.restart()?;
        }

        let input = scripted_input(&sim, tick, cli.fire_every);
        timer.begin();
        let report = sim.tick(TICK_SECONDS, input)?;
        timer.end();

        if report.state == SessionState::GameOver {
            if let Some(hud) = sim.hud() {
                warn!(tick = report.tick, score = hud.score, "player defeated");
            }
        }
        if tick % u64::from(TICK_RATE_HZ * 5) == 0 {
            if let Some(hud) = sim.hud() {
                info!(
                    tick = report.tick,
                    health = hud.current,
                    max = hud.max,
                    score = hud.score,
                    enemies = sim.count(EntityKind::Enemy),
                    food = sim.count(EntityKind::Food),
                    tps = timer.ticks_per_second(),
                    "status"
                );
            }
        }
    }

    let (fastest, slowest) = timer.tick_time_range_ms();
    info!(
        avg_ms = timer.tick_time_ms(),
        fastest_ms = fastest,
        slowest_ms = slowest,
        score = sim.score().score,
        kills = sim.score().kills,
        "session finished"
    );
    for (name, timing) in sim.profiler().summary() {
        info!(system = name, calls = timing.calls, avg_us = timing.average().as_micros() as u64, "system timing");
    }
    for (name, value) in sim.counters().snapshot() {
        info!(counter = name, value, "counter");
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Walk a slow circle and shoot at the closest enemy every `fire_every` ticks.
fn scripted_input(sim: &Simulation, tick: u64, fire_every: u64) -> TickInput {
    let angle = tick as f32 * TICK_SECONDS * 0.5;
    let mut input = TickInput::moving(Vec2::new(angle.cos(), angle.sin()));

    if fire_every > 0 && tick % fire_every == 0 {
        input.fire = closest_enemy(sim).map(|(from, to)| planar_direction(from, to));
    }
    input
}

fn closest_enemy(sim: &Simulation) -> Option<(Vec3, Vec3)> {
    let world = sim.world();
    let player = world.get::<Translation>(sim.player()?).ok()?.position;
    world
        .query(&EntityKind::Enemy.query())
        .into_iter()
        .filter_map(|e| world.get::<Translation>(e).ok())
        .map(|t| t.position)
        .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)))
        .map(|enemy| (player, enemy))
}
