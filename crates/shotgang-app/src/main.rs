use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use shotgang_app::bots::BotDriver;
use shotgang_app::game_loop::{self, MatchSummary, TICK_DURATION};
use shotgang_app::state::AppState;
use shotgang_app::telemetry::init_telemetry;
use shotgang_core::state::MatchSnapshot;
use shotgang_sim::level::LevelCatalog;
use shotgang_sim::{MatchConfig, MatchEngine};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a Shotgang match without a renderer", long_about = None)]
struct Args {
    /// Match configuration (TOML). Defaults are used if the file is missing.
    #[arg(long, default_value = "shotgang.toml")]
    config: PathBuf,
    /// Override the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Ticks to simulate (50 per second).
    #[arg(long, default_value_t = 30_000)]
    ticks: u64,
    /// Number of scripted players.
    #[arg(long, default_value_t = 2)]
    bots: u32,
    /// Pace the match at 50 Hz on a game loop thread.
    #[arg(long)]
    realtime: bool,
    /// Directory of JSON level layouts, matched by level name.
    #[arg(long)]
    levels: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = MatchConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    init_telemetry(config.log_level.as_deref(), config.json_logs)?;

    let catalog = match &args.levels {
        Some(dir) => LevelCatalog::from_dir(dir)
            .with_context(|| format!("load levels from {}", dir.display()))?,
        None => LevelCatalog::builtin(&config.player),
    };
    tracing::info!(
        seed = config.seed,
        ticks = args.ticks,
        bots = args.bots,
        realtime = args.realtime,
        levels = catalog.len(),
        "starting match"
    );

    let mut engine = MatchEngine::with_catalog(config.clone(), catalog);
    let mut bots = BotDriver::new(args.bots, config.seed);
    let last = if args.realtime {
        run_realtime(engine, bots, args.ticks)?
    } else {
        game_loop::run_headless(&mut engine, &mut bots, args.ticks)
    };

    match last {
        Some(snapshot) => {
            let summary = MatchSummary::from_snapshot(&snapshot);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        None => tracing::warn!("no ticks simulated"),
    }
    Ok(())
}

fn run_realtime(engine: MatchEngine, bots: BotDriver, ticks: u64) -> Result<Option<MatchSnapshot>> {
    let state = AppState::new();
    state.start(engine, bots)?;
    std::thread::sleep(TICK_DURATION * ticks.min(u32::MAX as u64) as u32);
    let snapshot = state.latest();
    state.shutdown()?;
    Ok(snapshot)
}
