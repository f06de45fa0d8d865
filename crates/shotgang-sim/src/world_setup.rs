//! Entity spawn factories.
//!
//! Builds walls, spawn points, the start area, players and bullets with
//! the component bundles the systems expect.

use hecs::{Entity, World};

use shotgang_core::components::*;
use shotgang_core::constants::*;
use shotgang_core::enums::BodyType;
use shotgang_core::types::{Color, Vec2};

use crate::context::PlayerCarryOver;
use crate::level::LevelLayout;

/// Populate an empty world with the static content of `layout`.
pub fn load_layout(world: &mut World, layout: &LevelLayout, ready_override_ms: Option<u64>) {
    for wall in &layout.walls {
        world.spawn((wall.to_wall(),));
    }
    for &position in &layout.spawn_points {
        world.spawn((SpawnPoint { position },));
    }
    if let Some(area) = &layout.start_area {
        world.spawn((StartArea {
            center: area.center,
            half_extents: area.size * 0.5,
            ready_countdown_ms: ready_override_ms.unwrap_or(area.ready_countdown_ms),
            countdown_started_ms: None,
            last_countdown_second: None,
            transitioned: false,
        },));
    }
}

/// Collision body of a living player.
pub fn player_body(position: Vec2, rotation: f32, tuning: &PlayerTuning) -> Body {
    Body {
        rotation,
        radius: tuning.radius,
        mass: tuning.density * std::f32::consts::PI * tuning.radius * tuning.radius,
        drag: tuning.drag,
        layer: PLAYER_LAYER,
        mask: PLAYER_LAYER | WALL_LAYER,
        ..Body::at(position)
    }
}

pub fn spawn_player(
    world: &mut World,
    player: Player,
    tuning: PlayerTuning,
    position: Vec2,
    rotation: f32,
) -> Entity {
    let body = player_body(position, rotation, &tuning);
    let control = PlayerControl {
        anim_frame: tuning.frame_start_index as f32,
        ..PlayerControl::default()
    };
    world.spawn((player, body, tuning, control))
}

/// Re-instantiate a carried-over player: full health, alive, scores kept.
pub fn spawn_carried_player(world: &mut World, carry: PlayerCarryOver, position: Vec2) -> Entity {
    let PlayerCarryOver {
        mut player,
        tuning,
        rotation,
    } = carry;
    player.health = FULL_HEALTH;
    spawn_player(world, player, tuning, position, rotation)
}

/// Mark a player dead: pinned, no longer collidable.
pub fn set_dead(player: &mut Player, body: &mut Body) {
    player.health = 0.0;
    body.body_type = BodyType::Static;
    body.layer = NO_COLLISION_LAYER;
    body.halt();
}

pub fn spawn_bullet(
    world: &mut World,
    spawner: shotgang_core::types::PlayerId,
    position: Vec2,
    angle: f32,
    velocity: f32,
    mass: f32,
    now_ms: u64,
) -> Entity {
    let body = Body {
        mass,
        drag: BULLET_DRAG,
        layer: BULLET_LAYER,
        mask: WALL_LAYER | PLAYER_LAYER,
        ..Body::launched(position, angle, velocity)
    };
    let projectile = Projectile {
        spawner,
        spawned_at_ms: now_ms,
        max_lifetime_ms: BULLET_MAX_LIFETIME_MS,
        color: Color::rgb(1.0, 0.85, 0.4),
    };
    world.spawn((projectile, body))
}

pub fn spawn_effect(world: &mut World, effect: Effect, body: Body) -> Entity {
    world.spawn((effect, body))
}
