//! Match snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::components::Wall;
use crate::enums::*;
use crate::events::{AudioEvent, MatchEvent};
use crate::types::{Color, PlayerId, SimTime, Vec2};

/// Complete match state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub scene: SceneView,
    /// Present in arena levels only.
    pub round: Option<RoundView>,
    /// Present in the lobby only.
    pub start_area: Option<StartAreaView>,
    /// Present once the forced volley timer is running.
    pub volley: Option<VolleyView>,
    pub players: Vec<PlayerView>,
    pub bullets: Vec<BulletView>,
    pub effects: Vec<EffectView>,
    pub walls: Vec<Wall>,
    pub spawn_points: Vec<Vec2>,
    pub queue: QueueView,
    pub audio_events: Vec<AudioEvent>,
    pub events: Vec<MatchEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneView {
    pub kind: SceneKind,
    pub level: String,
    pub background_color: Color,
    /// Black overlay while fading into the next level, 0..1.
    pub transition_alpha: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundView {
    pub phase: RoundPhase,
    /// "3", "2", "1", then "GO".
    pub countdown_text: Option<String>,
    /// Results-screen fade, 0..1.
    pub game_over_alpha: f32,
    pub banner: Option<BannerView>,
    /// Last level finished with an outright winner.
    pub show_final_winner: bool,
    /// Sorted best first.
    pub standings: Vec<StandingView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerView {
    pub text: String,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingView {
    pub player: PlayerId,
    pub name: String,
    pub color: Color,
    pub wins: u32,
    pub kills: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub gamepad_id: u32,
    pub color: Color,
    pub position: Vec2,
    pub rotation: f32,
    pub radius: f32,
    pub health: f32,
    /// Life bar fill, 0..1.
    pub health_fraction: f32,
    pub dead: bool,
    pub kills: u32,
    pub wins: u32,
    pub anim_frame: u32,
}

/// Bullet trail segment for the additive bullet layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub texture: &'static str,
    pub position: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    pub color: Color,
    pub intensity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAreaView {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub players_ready: usize,
    pub players_total: usize,
    /// Seconds left while every player is inside.
    pub countdown: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolleyView {
    /// 0 right after a volley, 1 when the next one fires.
    pub progress: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueView {
    /// Position in the level queue; `None` before the first level.
    pub index: Option<usize>,
    pub total: usize,
    pub is_last: bool,
}
