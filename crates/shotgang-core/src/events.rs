//! Events emitted by the simulation for audio playback and match bookkeeping.

use serde::{Deserialize, Serialize};

use crate::enums::{SceneKind, Sound};
use crate::types::PlayerId;

/// A sound to play this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioEvent {
    pub sound: Sound,
    pub pitch: f32,
    pub volume: f32,
}

impl AudioEvent {
    pub fn plain(sound: Sound) -> Self {
        Self {
            sound,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Gameplay milestones, for the UI feed and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    PlayerJoined {
        player: PlayerId,
        name: String,
        gamepad_id: u32,
    },
    PlayerKilled {
        victim: PlayerId,
        /// `None` for environmental deaths (spiked walls).
        killer: Option<PlayerId>,
    },
    RoundStarted,
    RoundOver,
    WinAwarded {
        player: PlayerId,
    },
    RoundDrawn,
    LevelTransitionStarted {
        level: String,
        queue_index: usize,
    },
    LevelLoaded {
        level: String,
        kind: SceneKind,
    },
    MatchFinished,
}
