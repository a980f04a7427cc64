#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Wave Shooter session without a renderer.

mod headless;
mod hud;
mod report;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wave_shooter_core::{Command, SessionConfig};
use wave_shooter_session::{self as session, query, Session};

use crate::{
    headless::{Autopilot, HeadlessFactory},
    hud::Hud,
    report::SessionReport,
};

const DEFAULT_SESSION: &str = include_str!("../levels.toml");
const DEFAULT_LOG_FILTER: &str = "warn,wave_shooter=info,wave_shooter_session=info";

/// Command-line arguments accepted by the Wave Shooter adapter.
#[derive(Debug, Parser)]
#[command(name = "wave-shooter", about = "Plays a wave shooter session headlessly")]
struct Args {
    /// TOML file describing the session; the bundled levels are used when omitted.
    #[arg(long, value_name = "PATH")]
    levels: Option<PathBuf>,

    /// Overrides the spawn RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the number of lives the player starts with.
    #[arg(long)]
    lives: Option<u32>,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Stops the run after this many ticks even if the session has not ended.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u32,

    /// Ticks an enemy survives before the autopilot shoots it down.
    #[arg(long, default_value_t = 45)]
    kill_after: u32,

    /// Points awarded per destroyed enemy.
    #[arg(long, default_value_t = 100)]
    points: u32,

    /// Hits the player on every multiple of this tick.
    #[arg(long)]
    hit_every: Option<u32>,

    /// Prints the final report as JSON.
    #[arg(long)]
    json: bool,
}

/// Entry point for the Wave Shooter command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = load_config(&args)?;
    let initial_lives = config.initial_lives;
    let mut session = Session::new(config).context("invalid session configuration")?;
    let hud = Hud::attach(&mut session, initial_lives);

    let tick = Duration::from_millis(args.tick_ms);
    let mut factory = HeadlessFactory::default();
    let mut pilot = Autopilot::new(args.kill_after, args.hit_every, args.points);
    let mut events = Vec::new();

    session::apply(&mut session, Command::StartSession, &mut factory, &mut events)?;
    pilot.observe(&events);

    let mut ticks = 0;
    while !query::is_game_over(&session) && ticks < args.max_ticks {
        events.clear();
        session::apply(&mut session, Command::Tick { dt: tick }, &mut factory, &mut events)?;
        ticks += 1;
        pilot.observe(&events);

        for command in pilot.commands() {
            events.clear();
            session::apply(&mut session, command, &mut factory, &mut events)?;
            pilot.observe(&events);
        }
        debug!(tick = ticks, hud = %hud, "frame");
    }

    let report = SessionReport::capture(&session, &hud, &factory, ticks, tick);
    match report.outcome() {
        Some(outcome) => info!(?outcome, ticks, "session finished"),
        None => info!(ticks, "tick limit reached before the session ended"),
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.levels {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_config(&text).with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => parse_config(DEFAULT_SESSION).context("bundled levels are malformed")?,
    };

    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(lives) = args.lives {
        config = config.with_initial_lives(lives);
    }
    Ok(config)
}

fn parse_config(text: &str) -> Result<SessionConfig> {
    Ok(toml::from_str(text)?)
}
