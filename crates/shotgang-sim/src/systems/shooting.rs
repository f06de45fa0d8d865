//! Firing a shotgun blast.

use std::f32::consts::PI;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use shotgang_core::components::{Body, Player, PlayerControl, PlayerTuning};
use shotgang_core::enums::Sound;
use shotgang_core::events::AudioEvent;
use shotgang_core::types::{PlayerId, Vec2};
use shotgang_rules::input::gaussian;

use crate::vfx;
use crate::world_setup::spawn_bullet;

/// Fire one blast from `entity`. Returns false when dead, missing, or
/// still inside the fire-rate interval.
pub fn shoot(
    world: &mut World,
    entity: Entity,
    now_ms: u64,
    rng: &mut ChaCha8Rng,
    audio_events: &mut Vec<AudioEvent>,
) -> bool {
    let (spawner, position, rotation, tuning) = {
        let Ok((player, body, tuning, control)) =
            world.query_one_mut::<(&Player, &mut Body, &PlayerTuning, &mut PlayerControl)>(entity)
        else {
            return false;
        };

        if player.is_dead() {
            return false;
        }
        let interval = 1000.0 / tuning.fire_rate.max(0.0001);
        if let Some(last) = control.last_shot_ms {
            if (now_ms.saturating_sub(last) as f32) < interval {
                return false;
            }
        }

        body.acceleration += Vec2::from_angle(body.rotation + PI) * tuning.recoil;
        control.last_shot_ms = Some(now_ms);
        (player.id, body.position, body.rotation, tuning.clone())
    };

    audio_events.push(AudioEvent {
        sound: Sound::Shotgun,
        pitch: 1.0 + 0.05 * gaussian(rng),
        volume: 1.0,
    });
    audio_events.push(AudioEvent {
        sound: Sound::ShellDrop(rng.gen_range(0..3)),
        pitch: 2.0 + 0.2 * gaussian(rng),
        volume: 0.5,
    });

    let muzzle = fire_pellets(world, spawner, position, rotation, &tuning, now_ms, rng);
    vfx::spawn_shotgun_effects(world, rng, now_ms, muzzle, rotation);
    true
}

/// Fan `bullet_count` pellets across the cone. Returns the last muzzle position.
fn fire_pellets(
    world: &mut World,
    spawner: PlayerId,
    position: Vec2,
    rotation: f32,
    tuning: &PlayerTuning,
    now_ms: u64,
    rng: &mut ChaCha8Rng,
) -> Vec2 {
    let cone = tuning.bullet_cone_angle.to_radians();
    let count = tuning.bullet_count.max(1) as f32;
    let step = cone / count;
    let mut muzzle = position;

    for i in 0..tuning.bullet_count {
        let offset = tuning.bullet_spawn_offset_angle.to_radians() + 0.02 * gaussian(rng);
        muzzle = position + Vec2::from_angle(rotation + offset) * tuning.bullet_spawn_offset_length;

        let spread = tuning.bullet_spread_angle.to_radians() * gaussian(rng);
        let fan = 0.5 * (cone - step) - step * i as f32;
        spawn_bullet(
            world,
            spawner,
            muzzle,
            rotation + fan + spread,
            tuning.bullet_velocity,
            tuning.bullet_mass,
            now_ms,
        );
    }

    muzzle
}
