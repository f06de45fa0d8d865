//! Runner state shared between the main thread and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, bail, Result};

use shotgang_core::commands::PlayerCommand;
use shotgang_core::state::MatchSnapshot;
use shotgang_sim::MatchEngine;

use crate::bots::BotDriver;
use crate::game_loop;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// Forward to the match engine.
    Player(PlayerCommand),
    /// Stop after the current tick and hand the engine back.
    Shutdown,
}

/// Handle on a running game loop.
///
/// - `command_tx` is `None` until `start`.
/// - `latest_snapshot` is shared with the loop thread and replaced every tick.
#[derive(Default)]
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    pub latest_snapshot: Arc<Mutex<Option<MatchSnapshot>>>,
    handle: Mutex<Option<JoinHandle<MatchEngine>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `engine` onto a new game loop thread.
    pub fn start(&self, engine: MatchEngine, bots: BotDriver) -> Result<()> {
        let mut handle = self.handle.lock().map_err(|_| anyhow!("runner state poisoned"))?;
        if handle.is_some() {
            bail!("match already running");
        }

        let (tx, join) = game_loop::spawn_game_loop(engine, bots, self.latest_snapshot.clone());
        *self
            .command_tx
            .lock()
            .map_err(|_| anyhow!("runner state poisoned"))? = Some(tx);
        *handle = Some(join);
        Ok(())
    }

    /// Forward a player command to the running match.
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        let tx = self.command_tx.lock().map_err(|_| anyhow!("runner state poisoned"))?;
        match tx.as_ref() {
            Some(tx) => tx
                .send(LoopCommand::Player(command))
                .map_err(|e| anyhow!("game loop gone: {e}")),
            None => bail!("match not started"),
        }
    }

    /// Latest snapshot, if the loop has ticked at least once.
    pub fn latest(&self) -> Option<MatchSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    pub fn is_running(&self) -> bool {
        self.handle.lock().map(|h| h.is_some()).unwrap_or(false)
    }

    /// Stop the loop and return its engine. `None` if it was never started.
    pub fn shutdown(&self) -> Result<Option<MatchEngine>> {
        if let Some(tx) = self
            .command_tx
            .lock()
            .map_err(|_| anyhow!("runner state poisoned"))?
            .take()
        {
            // The loop may already have exited on its own.
            let _ = tx.send(LoopCommand::Shutdown);
        }

        let join = self
            .handle
            .lock()
            .map_err(|_| anyhow!("runner state poisoned"))?
            .take();
        match join {
            Some(join) => join
                .join()
                .map(Some)
                .map_err(|_| anyhow!("game loop thread panicked")),
            None => Ok(None),
        }
    }
}
