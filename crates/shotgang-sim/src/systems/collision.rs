//! Contact generation.
//!
//! Bullets sweep the segment travelled this tick against player circles and
//! wall boxes; the earliest hit wins. Players are pushed out of walls and
//! out of each other. Effects never collide.

use hecs::{Entity, World};

use shotgang_core::components::{Body, Player, Projectile, Wall};
use shotgang_core::constants::*;
use shotgang_core::enums::BodyType;
use shotgang_core::types::{PlayerId, Vec2};

/// A gameplay-relevant contact, resolved by `systems::contact`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Bullet entered a player's circle.
    BulletPlayer {
        bullet: Entity,
        player: Entity,
        point: Vec2,
        normal: Vec2,
    },
    /// Bullet struck a wall.
    BulletWall {
        bullet: Entity,
        point: Vec2,
        normal: Vec2,
    },
    /// Player touched a wall this tick.
    PlayerWall {
        player: Entity,
        has_spikes: bool,
    },
}

struct PlayerShape {
    entity: Entity,
    id: PlayerId,
    position: Vec2,
    radius: f32,
    layer: u32,
    mask: u32,
    dynamic: bool,
}

/// Generate this tick's contacts. Runs after movement.
pub fn run(world: &mut World) -> Vec<Contact> {
    let walls: Vec<Wall> = world.query::<&Wall>().iter().map(|(_, w)| *w).collect();
    let mut contacts = Vec::new();

    contacts.extend(push_players_out_of_walls(world, &walls));
    separate_players(world);

    let players = collect_players(world);
    for (bullet, (projectile, body)) in world.query::<(&Projectile, &Body)>().iter() {
        if let Some(contact) = sweep_bullet(bullet, projectile, body, &players, &walls) {
            contacts.push(contact);
        }
    }

    contacts
}

fn collect_players(world: &World) -> Vec<PlayerShape> {
    world
        .query::<(&Player, &Body)>()
        .iter()
        .map(|(entity, (player, body))| PlayerShape {
            entity,
            id: player.id,
            position: body.position,
            radius: body.radius,
            layer: body.layer,
            mask: body.mask,
            dynamic: body.body_type == BodyType::Dynamic,
        })
        .collect()
}

/// Earliest thing the bullet hit along its path, ignoring its own spawner.
fn sweep_bullet(
    bullet: Entity,
    projectile: &Projectile,
    body: &Body,
    players: &[PlayerShape],
    walls: &[Wall],
) -> Option<Contact> {
    let from = body.last_position;
    let to = body.position;
    let travel = to - from;

    let mut best: Option<(f32, Contact)> = None;
    let mut consider = |t: f32, contact: Contact| {
        if best.as_ref().is_none_or(|(best_t, _)| t < *best_t) {
            best = Some((t, contact));
        }
    };

    if body.collides_with(WALL_LAYER) {
        for wall in walls {
            if let Some((t, normal)) = segment_aabb(from, to, wall.min(), wall.max()) {
                let point = from + travel * t;
                consider(t, Contact::BulletWall { bullet, point, normal });
            }
        }
    }

    for player in players {
        if !body.collides_with(player.layer) || player.id == projectile.spawner {
            continue;
        }
        if let Some((t, normal)) = segment_circle(from, to, player.position, player.radius) {
            let point = from + travel * t;
            consider(
                t,
                Contact::BulletPlayer {
                    bullet,
                    player: player.entity,
                    point,
                    normal,
                },
            );
        }
    }

    best.map(|(_, contact)| contact)
}

fn push_players_out_of_walls(world: &mut World, walls: &[Wall]) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for (entity, (_player, body)) in world.query_mut::<(&Player, &mut Body)>() {
        if body.body_type == BodyType::Static || !body.collides_with(WALL_LAYER) {
            continue;
        }
        for wall in walls {
            if let Some(push) = circle_aabb_push(body.position, body.radius, wall) {
                body.position += push;
                contacts.push(Contact::PlayerWall {
                    player: entity,
                    has_spikes: wall.has_spikes,
                });
            }
        }
    }
    contacts
}

fn separate_players(world: &mut World) {
    let players = collect_players(world);
    let mut corrections: Vec<(Entity, Vec2)> = Vec::new();

    for (i, a) in players.iter().enumerate() {
        for b in &players[i + 1..] {
            if a.mask & b.layer == 0 || b.mask & a.layer == 0 {
                continue;
            }
            let delta = b.position - a.position;
            let dist = delta.length();
            let overlap = a.radius + b.radius - dist;
            if overlap <= 0.0 {
                continue;
            }
            let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
            let (share_a, share_b) = match (a.dynamic, b.dynamic) {
                (true, true) => (0.5, 0.5),
                (true, false) => (1.0, 0.0),
                (false, true) => (0.0, 1.0),
                (false, false) => continue,
            };
            corrections.push((a.entity, -normal * overlap * share_a));
            corrections.push((b.entity, normal * overlap * share_b));
        }
    }

    for (entity, correction) in corrections {
        if let Ok(mut body) = world.get::<&mut Body>(entity) {
            body.position += correction;
        }
    }
}

/// Earliest entry of segment `from -> to` into a circle, as `(t, normal)`.
/// A segment starting inside reports `t = 0`.
pub fn segment_circle(from: Vec2, to: Vec2, center: Vec2, radius: f32) -> Option<(f32, Vec2)> {
    let d = to - from;
    let f = from - center;
    let c = f.dot(f) - radius * radius;
    if c <= 0.0 {
        return Some((0.0, f.normalize_or_zero()));
    }

    let a = d.dot(d);
    if a <= f32::EPSILON {
        return None;
    }
    let b = 2.0 * f.dot(d);
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let normal = (from + d * t - center).normalize_or_zero();
    Some((t, normal))
}

/// Slab test of segment `from -> to` against a box, as `(t, normal)`.
pub fn segment_aabb(from: Vec2, to: Vec2, min: Vec2, max: Vec2) -> Option<(f32, Vec2)> {
    let d = to - from;
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (origin, dir, lo, hi) = (from[axis], d[axis], min[axis], max[axis]);
        if dir.abs() <= f32::EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let (near, far) = {
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            if t1 < t2 { (t1, t2) } else { (t2, t1) }
        };
        if near > t_min {
            t_min = near;
            normal = Vec2::ZERO;
            normal[axis] = -dir.signum();
        }
        t_max = t_max.min(far);
        if t_min > t_max {
            return None;
        }
    }

    if normal == Vec2::ZERO {
        normal = -d.normalize_or_zero();
    }
    Some((t_min, normal))
}

/// Displacement that moves a circle out of a wall, if they overlap.
pub fn circle_aabb_push(center: Vec2, radius: f32, wall: &Wall) -> Option<Vec2> {
    let closest = wall.closest_point(center);
    let delta = center - closest;
    let dist = delta.length();

    if dist > f32::EPSILON {
        if dist >= radius {
            return None;
        }
        return Some(delta / dist * (radius - dist));
    }

    // Center inside the box: leave through the nearest face.
    let to_min = center - wall.min();
    let to_max = wall.max() - center;
    let faces = [
        (to_min.x, Vec2::NEG_X),
        (to_max.x, Vec2::X),
        (to_min.y, Vec2::NEG_Y),
        (to_max.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .fold((f32::INFINITY, Vec2::ZERO), |acc, face| if face.0 < acc.0 { face } else { acc });
    Some(normal * (depth + radius))
}
