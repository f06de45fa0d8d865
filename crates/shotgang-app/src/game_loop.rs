//! Game loop: runs the match engine at 50 Hz and publishes snapshots.
//!
//! The engine moves into the loop thread. Commands arrive via `mpsc`,
//! the latest snapshot is stored in shared state for polling, and the
//! engine is handed back through the join handle on shutdown.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::Serialize;

use shotgang_core::constants::TICK_RATE;
use shotgang_core::enums::{RoundPhase, SceneKind};
use shotgang_core::events::MatchEvent;
use shotgang_core::state::MatchSnapshot;
use shotgang_sim::MatchEngine;

use crate::bots::BotDriver;
use crate::state::LoopCommand;

/// Wall-clock duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawn the loop thread. Returns the command sender and a handle that
/// yields the engine once the loop stops.
pub fn spawn_game_loop(
    engine: MatchEngine,
    bots: BotDriver,
    latest_snapshot: Arc<Mutex<Option<MatchSnapshot>>>,
) -> (mpsc::Sender<LoopCommand>, JoinHandle<MatchEngine>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("shotgang-game-loop".into())
        .spawn(move || run_game_loop(engine, bots, cmd_rx, &latest_snapshot))
        .expect("failed to spawn game loop thread");

    (cmd_tx, handle)
}

/// Runs until Shutdown or channel disconnect.
fn run_game_loop(
    mut engine: MatchEngine,
    mut bots: BotDriver,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<MatchSnapshot>>,
) -> MatchEngine {
    let mut next_tick_time = Instant::now();
    let mut previous: Option<MatchSnapshot> = None;

    loop {
        // 1. Drain pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::Shutdown) => return engine,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return engine,
            }
        }

        // 2. Bot input and one tick
        let snapshot = step(&mut engine, &mut bots, previous.as_ref());

        // 3. Publish
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        previous = Some(snapshot);

        // 4. Sleep until the next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, skip ahead instead of catching up
            tracing::warn!(behind_ms = (now - next_tick_time).as_millis() as u64, "game loop lagging");
            next_tick_time = now;
        }
    }
}

/// Bot input derived from the previous snapshot, then one engine tick.
pub fn step(
    engine: &mut MatchEngine,
    bots: &mut BotDriver,
    previous: Option<&MatchSnapshot>,
) -> MatchSnapshot {
    if let Some(previous) = previous {
        engine.queue_commands(bots.commands(previous));
    }
    let snapshot = engine.tick();
    log_events(&snapshot);
    snapshot
}

/// Run `ticks` as fast as possible. Stops early once the match is over.
pub fn run_headless(engine: &mut MatchEngine, bots: &mut BotDriver, ticks: u64) -> Option<MatchSnapshot> {
    let mut previous: Option<MatchSnapshot> = None;
    for _ in 0..ticks {
        let snapshot = step(engine, bots, previous.as_ref());
        let finished = snapshot
            .round
            .as_ref()
            .is_some_and(|r| r.phase == RoundPhase::Terminal);
        previous = Some(snapshot);
        if finished {
            break;
        }
    }
    previous
}

fn log_events(snapshot: &MatchSnapshot) {
    for event in &snapshot.events {
        match event {
            MatchEvent::PlayerJoined {
                player,
                name,
                gamepad_id,
            } => tracing::info!(player = player.0, %name, gamepad_id, "player joined"),
            MatchEvent::PlayerKilled { victim, killer } => tracing::info!(
                victim = victim.0,
                killer = ?killer.map(|k| k.0),
                "player killed"
            ),
            MatchEvent::WinAwarded { player } => tracing::info!(player = player.0, "round won"),
            MatchEvent::RoundDrawn => tracing::info!("round drawn"),
            MatchEvent::MatchFinished => tracing::info!(tick = snapshot.time.tick, "match finished"),
            other => tracing::debug!(event = ?other, "match event"),
        }
    }
}

/// Final standings printed by the runner.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub ticks: u64,
    pub elapsed_ms: u64,
    pub level: String,
    pub scene: SceneKind,
    pub round: Option<RoundPhase>,
    pub queue_index: Option<usize>,
    pub queue_total: usize,
    pub players: Vec<SummaryLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
    pub name: String,
    pub wins: u32,
    pub kills: u32,
}

impl MatchSummary {
    pub fn from_snapshot(snapshot: &MatchSnapshot) -> Self {
        let mut players: Vec<SummaryLine> = snapshot
            .players
            .iter()
            .map(|p| SummaryLine {
                name: p.name.clone(),
                wins: p.wins,
                kills: p.kills,
            })
            .collect();
        players.sort_by(|a, b| (b.wins, b.kills).cmp(&(a.wins, a.kills)));

        Self {
            ticks: snapshot.time.tick,
            elapsed_ms: snapshot.time.elapsed_ms,
            level: snapshot.scene.level.clone(),
            scene: snapshot.scene.kind,
            round: snapshot.round.as_ref().map(|r| r.phase),
            queue_index: snapshot.queue.index,
            queue_total: snapshot.queue.total,
            players,
        }
    }
}
