//! Contact resolution: damage, kill credit, deaths and hit effects.

use std::collections::HashSet;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use shotgang_core::components::{Body, Player, Projectile};
use shotgang_core::constants::GROUND_BLOOD_CHANCE;
use shotgang_core::enums::Sound;
use shotgang_core::events::{AudioEvent, MatchEvent};
use shotgang_core::types::{PlayerId, Vec2};
use shotgang_rules::damage::{apply_damage, compute_damage, kill, DamageOutcome};

use crate::systems::collision::Contact;
use crate::vfx;
use crate::world_setup::set_dead;

/// Everything contact resolution needs besides the world.
pub struct ContactCtx<'a> {
    pub now_ms: u64,
    /// False in the lobby: hits bleed but do no damage.
    pub takes_damage: bool,
    pub damage_coefficient: f32,
    pub rng: &'a mut ChaCha8Rng,
    pub audio_events: &'a mut Vec<AudioEvent>,
    pub events: &'a mut Vec<MatchEvent>,
    /// Bullets consumed this tick.
    pub despawn_buffer: &'a mut Vec<Entity>,
}

pub fn run(world: &mut World, contacts: &[Contact], ctx: &mut ContactCtx) {
    let mut consumed: HashSet<Entity> = HashSet::new();

    for contact in contacts {
        match *contact {
            Contact::BulletPlayer {
                bullet,
                player,
                point,
                normal,
            } => {
                if consumed.contains(&bullet) {
                    continue;
                }
                if resolve_bullet_player(world, bullet, player, point, normal, ctx) {
                    consumed.insert(bullet);
                    ctx.despawn_buffer.push(bullet);
                }
            }
            Contact::BulletWall {
                bullet,
                point,
                normal,
            } => {
                if consumed.insert(bullet) {
                    vfx::spawn_bullet_wall_hit(world, ctx.rng, ctx.now_ms, point, normal);
                    ctx.despawn_buffer.push(bullet);
                }
            }
            Contact::PlayerWall { player, has_spikes } => {
                if has_spikes {
                    resolve_spike_wall(world, player, ctx);
                }
            }
        }
    }
}

/// Returns true if the bullet was consumed.
fn resolve_bullet_player(
    world: &mut World,
    bullet: Entity,
    target: Entity,
    point: Vec2,
    normal: Vec2,
    ctx: &mut ContactCtx,
) -> bool {
    let Ok(projectile) = world.get::<&Projectile>(bullet).map(|p| *p) else {
        return false;
    };
    let Ok(bullet_body) = world.get::<&Body>(bullet).map(|b| *b) else {
        return false;
    };

    let (victim, killed, position) = {
        let Ok((player, body)) = world.query_one_mut::<(&mut Player, &mut Body)>(target) else {
            return false;
        };
        // Own pellets pass through.
        if player.id == projectile.spawner {
            return false;
        }

        let mut killed = false;
        if ctx.takes_damage {
            let damage = compute_damage(
                ctx.damage_coefficient,
                bullet_body.velocity().length(),
                bullet_body.mass,
                projectile.lifetime_fraction(ctx.now_ms),
            );
            if apply_damage(player, damage) == DamageOutcome::Killed {
                set_dead(player, body);
                killed = true;
            }
        }
        (player.id, killed, body.position)
    };

    if killed {
        credit_kill(world, projectile.spawner);
        ctx.audio_events.push(AudioEvent::plain(Sound::Death));
        ctx.events.push(MatchEvent::PlayerKilled {
            victim,
            killer: Some(projectile.spawner),
        });
        tracing::debug!(victim = victim.0, killer = projectile.spawner.0, "player killed");
    }

    vfx::spawn_blood_puff(world, ctx.rng, ctx.now_ms, point, normal);
    vfx::spawn_wall_blood(world, ctx.rng, ctx.now_ms, position + bullet_body.velocity());
    if ctx.rng.gen_bool(GROUND_BLOOD_CHANCE) {
        vfx::spawn_ground_blood(world, ctx.rng, ctx.now_ms, position);
    }
    true
}

/// One kill for the spawner, if it is still in the level.
fn credit_kill(world: &mut World, spawner: PlayerId) {
    if let Some((_, player)) = world
        .query_mut::<&mut Player>()
        .into_iter()
        .find(|(_, p)| p.id == spawner)
    {
        player.kills += 1;
    }
}

fn resolve_spike_wall(world: &mut World, target: Entity, ctx: &mut ContactCtx) {
    let (victim, position) = {
        let Ok((player, body)) = world.query_one_mut::<(&mut Player, &mut Body)>(target) else {
            return;
        };
        if !kill(player) {
            return;
        }
        set_dead(player, body);
        (player.id, body.position)
    };

    ctx.audio_events.push(AudioEvent::plain(Sound::Death));
    ctx.events.push(MatchEvent::PlayerKilled {
        victim,
        killer: None,
    });
    tracing::debug!(victim = victim.0, "player impaled");
    vfx::spawn_spike_wall_blood(world, ctx.rng, ctx.now_ms, position);
}
