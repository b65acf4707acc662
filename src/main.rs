use anyhow::Result;
use clap::Parser;
use log::info;

use lane_crossing::{
    config::{SimulationConfig, Tile},
    simulation::{CollisionForecast, Direction, LaneId, PerformanceTracker, Phase, Session},
};

/// Autopilot hops at most this often.
const HOP_INTERVAL: f64 = 0.2;
/// Minimum head start the autopilot wants before stepping into a lane.
const SAFETY_MARGIN: f64 = 0.6;

#[derive(Parser)]
#[command(name = "lane-crossing")]
#[command(about = "Headless lane-crossing traffic simulation")]
struct Args {
    /// Board layout file
    #[arg(short, long, default_value = "board.toml")]
    board: String,

    /// Traffic configuration file
    #[arg(short, long, default_value = "traffic.toml")]
    traffic: String,

    /// Random seed for reproducible runs (overrides the traffic file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 30.0)]
    duration: f64,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Pause the game at this simulated time
    #[arg(long)]
    pause_at: Option<f64>,

    /// How long the pause lasts, in seconds
    #[arg(long, default_value_t = 3.0)]
    pause_for: f64,

    /// Let a simple bot try to cross the roads
    #[arg(short, long)]
    autopilot: bool,

    /// Enable verbose logging for detailed simulation progress
    #[arg(short, long)]
    verbose: bool,
}

fn autopilot_wants_hop(session: &Session, now: f64) -> bool {
    let player = session.player();
    if session.phase() != Phase::Play || player.row() == 0 {
        return false;
    }

    let target = player.row() - 1;
    match session.board().tile(player.column(), target) {
        Ok(Tile::Grass) => true,
        Ok(Tile::Stone) => match session.traffic().peek_collision(player.column(), LaneId(target), now) {
            CollisionForecast::Clear => true,
            CollisionForecast::FutureCollisionAt(time) => time - now > SAFETY_MARGIN,
            CollisionForecast::ImmediateCollision => false,
        },
        Ok(Tile::Water) | Err(_) => false,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();
    info!("Starting lane-crossing simulation (headless)");

    let mut config = SimulationConfig::load_from_files(&args.board, &args.traffic)?;
    if args.seed.is_some() {
        config.traffic.random.seed = args.seed;
    }
    info!(
        "Loaded board '{}' ({}x{}), enemy speeds {:.0}-{:.0}px/s, spawn every {:.2}s ±{:.0}%",
        config.board.board.name,
        config.board.board.columns,
        config.board.board.rows.len(),
        config.traffic.speeds.lower,
        config.traffic.speeds.upper,
        config.traffic.spawn.mean_interval,
        config.traffic.spawn.variance * 100.0
    );
    if let Some(seed) = config.traffic.random.seed {
        info!("Random seed: {}", seed);
    }

    let dt = 1.0 / args.fps;
    let mut now = 0.0;
    let mut session = Session::new(&config, now)?;
    let mut tracker = PerformanceTracker::new(config.traffic.performance.timing_samples as usize);

    let frames = (args.duration / dt).ceil() as u64;
    let mut next_report = 1.0;
    let mut hop_cooldown = 0.0;
    let mut resume_at = None;

    for frame in 0..frames {
        now += dt;

        if let Some(pause_at) = args.pause_at {
            if resume_at.is_none() && now >= pause_at && session.phase() == Phase::Play {
                session.toggle_pause();
                resume_at = Some(now + args.pause_for);
            }
        }
        if resume_at.is_some_and(|at| now >= at) && session.phase() == Phase::Paused {
            session.toggle_pause();
        }

        tracker.start_tick();
        session.step(dt, now)?;
        tracker.end_tick();

        if args.autopilot {
            hop_cooldown -= dt;
            if hop_cooldown <= 0.0 && autopilot_wants_hop(&session, now) {
                session.move_player(Direction::Up, now)?;
                hop_cooldown = HOP_INTERVAL;
            }
        }

        if now >= next_report {
            let traffic = session.traffic();
            info!(
                "Frame {}: {:?}, {} enemies active, {} pooled, {} deaths, {} crossings, tick {:.1}µs",
                frame,
                session.phase(),
                traffic.active_count(),
                traffic.pool().len(),
                session.deaths(),
                session.crossings(),
                tracker.average_tick_time().as_secs_f64() * 1e6
            );
            next_report += 1.0;
        }
    }

    let stats = session.traffic().stats();
    info!("Simulation completed!");
    info!("Simulated time: {:.2}s over {} frames", now, frames);
    info!(
        "Enemies: {} spawned, {} retired, {} peak active, {} actor shells allocated",
        stats.spawned,
        stats.retired,
        stats.peak_active,
        session.traffic().pool().allocated()
    );
    info!(
        "Spawn pressure: {} rejected attempts, {} abandoned cycles",
        stats.rejected_attempts, stats.abandoned_cycles
    );
    info!("Player: {} deaths, {} crossings", session.deaths(), session.crossings());
    info!(
        "Tick cost: {:.1}µs average, {:.1}µs slowest",
        tracker.average_tick_time().as_secs_f64() * 1e6,
        tracker.slowest_tick_time().as_secs_f64() * 1e6
    );

    Ok(())
}
