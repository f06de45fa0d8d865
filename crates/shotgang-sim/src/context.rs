//! State that outlives a single level: the level queue, players in
//! transit between levels, and player id allocation.

use serde::{Deserialize, Serialize};

use shotgang_core::components::{Body, Player, PlayerTuning};
use shotgang_core::types::PlayerId;
use shotgang_rules::levels::LevelQueue;

/// A player extracted from an outgoing level, re-instantiated in the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCarryOver {
    pub player: Player,
    pub tuning: PlayerTuning,
    pub rotation: f32,
}

impl PlayerCarryOver {
    pub fn extract(player: &Player, tuning: &PlayerTuning, body: &Body) -> Self {
        Self {
            player: player.clone(),
            tuning: tuning.clone(),
            rotation: body.rotation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchContext {
    pub level_queue: LevelQueue,
    pub transfers: Vec<PlayerCarryOver>,
    next_player_id: u32,
}

impl MatchContext {
    pub fn new(level_queue: LevelQueue) -> Self {
        Self {
            level_queue,
            transfers: Vec::new(),
            next_player_id: 0,
        }
    }

    pub fn allocate_player_id(&mut self) -> PlayerId {
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        id
    }

    /// Next level is the last queued entry, or there is none.
    pub fn is_last_level(&self) -> bool {
        self.level_queue.is_exhausted()
    }
}
