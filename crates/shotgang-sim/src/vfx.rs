//! Visual effect factories.
//!
//! Every function spawns fire-and-forget `Effect` entities. Nothing here
//! affects gameplay.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use shotgang_core::components::{Body, Effect};
use shotgang_core::constants::*;
use shotgang_core::enums::EffectKind;
use shotgang_core::types::{Color, Vec2};
use shotgang_rules::input::gaussian;

use crate::world_setup::spawn_effect;

fn flash(now_ms: u64, color: Color, intensity: f32, radius: f32) -> Effect {
    Effect {
        color,
        end_color: color,
        size: Vec2::splat(radius),
        intensity,
        start_intensity: intensity,
        lifetime_ms: Some(100),
        ..Effect::new(EffectKind::Flash, "", now_ms)
    }
}

fn smoke(now_ms: u64, rng: &mut ChaCha8Rng, color: Color, start: f32, end: f32) -> Effect {
    Effect {
        color,
        end_color: color,
        size: Vec2::splat(start),
        start_size: start,
        end_size: end,
        lifetime_ms: Some(500 + (800.0 * rng.gen::<f32>()) as u64),
        ..Effect::new(EffectKind::Smoke, TEXTURE_SMOKE_PUFF, now_ms)
    }
}

fn spark(now_ms: u64, turbulence: f32, lifetime_ms: u64) -> Effect {
    let start = Color::rgb(1.0, 0.85, 0.5);
    Effect {
        color: start,
        end_color: Color::rgb(1.0, 0.5, 0.0),
        size: Vec2::new(5.0, 5.0),
        intensity: 4.0,
        start_intensity: 4.0,
        turbulence,
        lifetime_ms: Some(lifetime_ms),
        ..Effect::new(EffectKind::Spark, TEXTURE_SPARK_0, now_ms)
    }
}

fn decal(now_ms: u64, kind: EffectKind, texture: &'static str, color: Color, size: Vec2) -> Effect {
    Effect {
        color,
        end_color: color,
        size,
        ..Effect::new(kind, texture, now_ms)
    }
}

fn particle_body(position: Vec2, rotation: f32, drag: f32) -> Body {
    Body {
        rotation,
        drag,
        layer: PARTICLE_LAYER,
        ..Body::at(position)
    }
}

/// Muzzle flash, sparks, smoke and an ejected shell. `rotation` is the aim.
pub fn spawn_shotgun_effects(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    now_ms: u64,
    position: Vec2,
    rotation: f32,
) {
    let radius = 400.0 + 300.0 * rng.gen::<f32>();
    spawn_effect(
        world,
        flash(now_ms, Color::rgb(1.0, 0.85, 0.3), 8.0, radius),
        particle_body(position, rotation, 0.0),
    );

    for _ in 0..15 {
        let speed = 10.0 + rng.gen::<f32>() * 60.0;
        let angle = rotation + 10.0_f32.to_radians() * gaussian(rng);
        let lifetime = 50 + rng.gen_range(0..300);
        let body = Body {
            drag: 0.2,
            layer: PARTICLE_LAYER,
            ..Body::launched(position, angle, speed)
        };
        spawn_effect(world, spark(now_ms, 5.0, lifetime), body);
    }

    for _ in 0..10 {
        let speed = 5.0 + 20.0 * rng.gen::<f32>();
        let start = 5.0 + 10.0 * rng.gen::<f32>();
        let end = 80.0 + 80.0 * rng.gen::<f32>();
        let effect = smoke(now_ms, rng, Color::rgba(0.6, 0.6, 0.6, 0.2), start, end);
        let body = Body {
            rotation: rng.gen::<f32>() * TAU,
            drag: 0.15 + 0.05 * rng.gen::<f32>(),
            layer: PARTICLE_LAYER,
            ..Body::launched(position, rotation, speed)
        };
        spawn_effect(world, effect, body);
    }

    let shell = decal(
        now_ms,
        EffectKind::Shell,
        TEXTURE_SHOTGUN_SHELL,
        Color::rgb(0.7, 0.7, 0.7),
        Vec2::new(8.0, 16.0),
    );
    let body = Body {
        rotation,
        drag: 0.2,
        layer: SHELL_LAYER,
        ..Body::launched(position, rotation + FRAC_PI_2, 35.0)
    };
    spawn_effect(world, shell, body);
}

/// Blood splatter on the walls behind a hit player.
pub fn spawn_wall_blood(world: &mut World, rng: &mut ChaCha8Rng, now_ms: u64, position: Vec2) {
    let size = Vec2::new(512.0 + 65.0 * gaussian(rng), 512.0 + 65.0 * gaussian(rng));
    let effect = decal(
        now_ms,
        EffectKind::Decal,
        TEXTURE_BLOOD_1,
        Color::rgb(0.5, 0.5, 0.5),
        size,
    );
    let rotation = (10.0 * gaussian(rng)).to_radians();
    spawn_effect(world, effect, particle_body(position, rotation, 0.0));
}

/// Faint blood pool on the ground.
pub fn spawn_ground_blood(world: &mut World, rng: &mut ChaCha8Rng, now_ms: u64, position: Vec2) {
    let position = position + Vec2::new(10.0 * gaussian(rng), 10.0 * gaussian(rng));
    let size = Vec2::new(200.0 + 10.0 * gaussian(rng), 200.0 + 10.0 * gaussian(rng));
    let effect = decal(
        now_ms,
        EffectKind::Decoration,
        TEXTURE_BLOOD_0,
        Color::rgba(1.0, 1.0, 1.0, 0.2),
        size,
    );
    let rotation = (20.0 * gaussian(rng)).to_radians();
    spawn_effect(world, effect, particle_body(position, rotation, 0.0));
}

pub fn spawn_spike_wall_blood(world: &mut World, rng: &mut ChaCha8Rng, now_ms: u64, position: Vec2) {
    let effect = decal(
        now_ms,
        EffectKind::Decal,
        TEXTURE_BLOOD_0,
        Color::rgba(0.9, 0.9, 0.9, 0.9),
        Vec2::splat(300.0),
    );
    let rotation = rng.gen::<f32>() * TAU;
    spawn_effect(world, effect, particle_body(position, rotation, 0.0));
}

/// Red puff where a pellet enters a player. `direction` is the contact normal.
pub fn spawn_blood_puff(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    now_ms: u64,
    position: Vec2,
    direction: Vec2,
) {
    let color = Color::rgb(1.0, 0.4 + 0.3 * rng.gen::<f32>(), 0.4 + 0.3 * rng.gen::<f32>());
    let start = 10.0 + 15.0 * rng.gen::<f32>();
    let end = 40.0 + 40.0 * rng.gen::<f32>();
    let effect = smoke(now_ms, rng, color, start, end);
    let body = Body {
        rotation: rng.gen::<f32>() * TAU,
        last_position: position - direction * 3.0,
        drag: 0.4,
        layer: PARTICLE_LAYER,
        ..Body::at(position)
    };
    spawn_effect(world, effect, body);
}

/// Smoke, flash, two sparks and a burn mark where a pellet hits a wall.
pub fn spawn_bullet_wall_hit(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    now_ms: u64,
    position: Vec2,
    direction: Vec2,
) {
    let speed = 2.0 + 10.0 * rng.gen::<f32>();
    let start = 2.0 + 5.0 * rng.gen::<f32>();
    let end = 30.0 + 20.0 * rng.gen::<f32>();
    let effect = smoke(now_ms, rng, Color::rgba(0.5, 0.5, 0.5, 0.8), start, end);
    let body = Body {
        rotation: rng.gen::<f32>() * TAU,
        last_position: position - direction * speed,
        drag: 0.4,
        layer: PARTICLE_LAYER,
        ..Body::at(position)
    };
    spawn_effect(world, effect, body);

    spawn_effect(
        world,
        flash(now_ms, Color::rgb(1.0, 0.7, 0.3), 1.0, 300.0),
        particle_body(position + direction * speed, 0.0, 0.0),
    );

    let base = direction.y.atan2(direction.x);
    for _ in 0..2 {
        let spark_speed = 30.0 + rng.gen::<f32>() * 10.0;
        let angle = base + 0.5 * PI * gaussian(rng);
        let lifetime = 100 + rng.gen_range(0..100);
        let body = Body {
            drag: 0.3,
            layer: PARTICLE_LAYER,
            ..Body::launched(position, angle, spark_speed)
        };
        spawn_effect(world, spark(now_ms, 10.0, lifetime), body);
    }

    let burn = decal(
        now_ms,
        EffectKind::Decal,
        TEXTURE_BURN_0,
        Color::rgba(1.0, 1.0, 1.0, 0.8 + 0.2 * rng.gen::<f32>()),
        Vec2::new(536.0 / 4.0, 486.0 / 4.0),
    );
    let rotation = rng.gen::<f32>() * TAU;
    spawn_effect(world, burn, particle_body(position, rotation, 0.0));
}
