//! Cleanup system: removes consumed and expired bullets and expired effects.

use hecs::{Entity, World};

use shotgang_core::components::{Effect, Projectile};

/// Despawn everything queued in `despawn_buffer` plus bullets past their
/// lifetime and expired effects.
pub fn run(world: &mut World, now_ms: u64, despawn_buffer: &mut Vec<Entity>) {
    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if now_ms.saturating_sub(projectile.spawned_at_ms) > projectile.max_lifetime_ms {
            despawn_buffer.push(entity);
        }
    }

    for (entity, effect) in world.query_mut::<&Effect>() {
        if effect.is_expired(now_ms) {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
