//! Per-level state. Rebuilt from scratch every time a level loads.

use shotgang_core::components::PlayerTuning;
use shotgang_core::enums::SceneKind;
use shotgang_core::types::{Color, PlayerId};
use shotgang_rules::round::RoundState;

use crate::systems::volley::VolleyTimer;

/// Fade out of the current level. The next level loads when it completes.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransition {
    pub level: String,
    pub started_ms: u64,
}

#[derive(Debug, Clone)]
pub struct SceneState {
    pub kind: SceneKind,
    pub level: String,
    pub background_color: Color,
    /// Present in arena levels only.
    pub round: Option<RoundState>,
    pub volley: Option<VolleyTimer>,
    /// Tuning for joining players. No template, no joins.
    pub template: Option<PlayerTuning>,
    /// Players admitted to this level, in join order.
    pub active_players: Vec<PlayerId>,
    /// Living players when the round ended. Only they can still win it.
    pub survivors: Vec<PlayerId>,
    pub transition: Option<PendingTransition>,
}

impl SceneState {
    /// Damage only counts where a round is being played.
    pub fn takes_damage(&self) -> bool {
        self.round.is_some()
    }

    /// Players may move and shoot. The lobby is always live.
    pub fn has_started(&self) -> bool {
        self.round.as_ref().is_none_or(|r| r.has_started())
    }

    pub fn is_game_over(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.is_game_over())
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            kind: SceneKind::Lobby,
            level: String::new(),
            background_color: Color::DARK,
            round: None,
            volley: None,
            template: None,
            active_players: Vec::new(),
            survivors: Vec::new(),
            transition: None,
        }
    }
}
