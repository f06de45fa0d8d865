//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in systems and in
//! the rules crate, not here.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{Color, PlayerId, Vec2};

/// Verlet body. Velocity is implicit: the displacement since the last step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub last_position: Vec2,
    /// Acceleration accumulated for the next step (units/s²). Cleared after integration.
    pub acceleration: Vec2,
    /// Facing in radians, world space (x right, y down).
    pub rotation: f32,
    pub radius: f32,
    pub mass: f32,
    /// Fraction of velocity lost per step.
    pub drag: f32,
    pub body_type: BodyType,
    /// Layer bits this body occupies.
    pub layer: u32,
    /// Layer bits this body collides with.
    pub mask: u32,
}

impl Body {
    /// A resting body at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            last_position: position,
            acceleration: Vec2::ZERO,
            rotation: 0.0,
            radius: 0.0,
            mass: 1.0,
            drag: 0.0,
            body_type: BodyType::Dynamic,
            layer: NO_COLLISION_LAYER,
            mask: 0,
        }
    }

    /// A body moving `speed` units per step along `angle`.
    pub fn launched(position: Vec2, angle: f32, speed: f32) -> Self {
        Self {
            last_position: position - Vec2::from_angle(angle) * speed,
            ..Self::at(position)
        }
    }

    /// Displacement per step.
    pub fn velocity(&self) -> Vec2 {
        self.position - self.last_position
    }

    /// Kill all motion at the current position.
    pub fn halt(&mut self) {
        self.last_position = self.position;
        self.acceleration = Vec2::ZERO;
    }

    pub fn collides_with(&self, layer: u32) -> bool {
        self.mask & layer != 0
    }
}

/// Player identity, health and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub gamepad_id: u32,
    pub color: Color,
    pub health: f32,
    pub kills: u32,
    pub wins: u32,
}

impl Player {
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Health as shown on the life bar, clamped to 0..1.
    pub fn health_fraction(&self) -> f32 {
        (self.health / FULL_HEALTH).clamp(0.0, 1.0)
    }

    /// Ranking key: a win outweighs any realistic number of kills.
    pub fn score_key(&self) -> u32 {
        self.wins * 100 + self.kills
    }
}

/// Per-player movement and weapon tuning. Levels carry one as their player template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Movement acceleration at full stick (units/s²).
    pub speed: f32,
    pub radius: f32,
    pub drag: f32,
    pub density: f32,
    pub shooting_enabled: bool,
    /// Shots per second.
    pub fire_rate: f32,
    /// Acceleration applied opposite the aim when firing.
    pub recoil: f32,
    pub full_auto: bool,
    /// Initial bullet displacement per step.
    pub bullet_velocity: f32,
    pub bullet_mass: f32,
    /// Full fan width (degrees).
    pub bullet_cone_angle: f32,
    /// Gaussian spread per bullet (degrees).
    pub bullet_spread_angle: f32,
    pub bullet_count: u32,
    /// Muzzle offset from the facing direction (degrees).
    pub bullet_spawn_offset_angle: f32,
    /// Muzzle distance from the player center.
    pub bullet_spawn_offset_length: f32,
    pub frame_start_index: u32,
    pub frame_end_index: u32,
    /// Animation frames per second while moving.
    pub frame_rate: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 800.0,
            radius: PLAYER_RADIUS,
            drag: 0.1,
            density: 1.0,
            shooting_enabled: false,
            fire_rate: 10.0,
            recoil: 1000.0,
            full_auto: false,
            bullet_velocity: 100.0,
            bullet_mass: 10.0,
            bullet_cone_angle: 45.0,
            bullet_spread_angle: 2.0,
            bullet_count: 10,
            bullet_spawn_offset_angle: 30.0,
            bullet_spawn_offset_length: 40.0,
            frame_start_index: 0,
            frame_end_index: 4,
            frame_rate: 2.0,
        }
    }
}

/// Transient control state of a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerControl {
    /// Movement acceleration requested this tick.
    pub move_acceleration: Vec2,
    /// Trigger latch for semi-automatic fire.
    pub shot_fired: bool,
    pub last_shot_ms: Option<u64>,
    pub last_step_ms: u64,
    pub anim_frame: f32,
}

/// A shotgun pellet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub spawner: PlayerId,
    pub spawned_at_ms: u64,
    pub max_lifetime_ms: u64,
    pub color: Color,
}

impl Projectile {
    /// Lifetime as a fraction of the maximum, clamped to 0..1.
    pub fn lifetime_fraction(&self, now_ms: u64) -> f32 {
        let lived = now_ms.saturating_sub(self.spawned_at_ms) as f32;
        (lived / self.max_lifetime_ms.max(1) as f32).clamp(0.0, 1.0)
    }
}

/// Axis-aligned wall box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub has_spikes: bool,
    pub color: Color,
}

impl Wall {
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Closest point on (or in) the box to `point`.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }
}

/// Static spawn marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Vec2,
}

/// Lobby ready zone. All active players standing inside starts the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartArea {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub ready_countdown_ms: u64,
    pub countdown_started_ms: Option<u64>,
    pub last_countdown_second: Option<u64>,
    pub transitioned: bool,
}

impl StartArea {
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }

    /// Whole seconds left on the ready countdown.
    pub fn countdown_second(&self, now_ms: u64) -> Option<u64> {
        let started = self.countdown_started_ms?;
        let elapsed = now_ms.saturating_sub(started);
        Some((self.ready_countdown_ms / 1000).saturating_sub(elapsed / 1000))
    }
}

/// Fire-and-forget visual effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub color: Color,
    /// Secondary color sparks cool towards.
    pub end_color: Color,
    pub size: Vec2,
    pub start_size: f32,
    pub end_size: f32,
    pub intensity: f32,
    pub start_intensity: f32,
    pub turbulence: f32,
    pub spawned_at_ms: u64,
    /// `None` for persistent effects (decals, decorations).
    pub lifetime_ms: Option<u64>,
    pub texture: &'static str,
}

impl Effect {
    pub fn new(kind: EffectKind, texture: &'static str, now_ms: u64) -> Self {
        Self {
            kind,
            color: Color::WHITE,
            end_color: Color::WHITE,
            size: Vec2::ZERO,
            start_size: 0.0,
            end_size: 0.0,
            intensity: 0.0,
            start_intensity: 0.0,
            turbulence: 0.0,
            spawned_at_ms: now_ms,
            lifetime_ms: None,
            texture,
        }
    }

    /// Fraction of lifetime used, clamped to 0..1. Persistent effects stay at 0.
    pub fn lifetime_fraction(&self, now_ms: u64) -> f32 {
        match self.lifetime_ms {
            Some(lifetime) => {
                let lived = now_ms.saturating_sub(self.spawned_at_ms) as f32;
                (lived / lifetime.max(1) as f32).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.lifetime_ms
            .is_some_and(|lifetime| now_ms.saturating_sub(self.spawned_at_ms) > lifetime)
    }
}
