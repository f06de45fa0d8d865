//! Snapshot system: queries the ECS world and builds a complete MatchSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use shotgang_core::components::*;
use shotgang_core::constants::LEVEL_FADE_MS;
use shotgang_core::enums::*;
use shotgang_core::events::{AudioEvent, MatchEvent};
use shotgang_core::state::*;
use shotgang_core::types::{SimTime, Vec2};
use shotgang_rules::round::{countdown_text, game_over_alpha, RoundTimings};
use shotgang_rules::standings::{banner_color, banner_text, sort_standings, winning_player};

use crate::context::MatchContext;
use crate::scene::SceneState;
use crate::systems::start_area;

/// Inputs to `build_snapshot` that are not in the world.
pub struct SnapshotInput<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub scene: &'a SceneState,
    pub context: &'a MatchContext,
    pub timings: &'a RoundTimings,
    pub audio_events: Vec<AudioEvent>,
    pub events: Vec<MatchEvent>,
}

pub fn build_snapshot(world: &World, input: SnapshotInput) -> MatchSnapshot {
    let now = input.time.elapsed_ms;
    let scene = input.scene;

    MatchSnapshot {
        time: input.time,
        phase: input.phase,
        scene: build_scene(scene, now),
        round: build_round(world, scene, input.context, input.timings, now),
        start_area: build_start_area(world, scene, now),
        volley: scene
            .volley
            .as_ref()
            .filter(|_| scene.has_started())
            .map(|timer| VolleyView {
                progress: timer.progress(now),
            }),
        players: build_players(world),
        bullets: build_bullets(world, now),
        effects: build_effects(world, now),
        walls: world.query::<&Wall>().iter().map(|(_, w)| *w).collect(),
        spawn_points: world
            .query::<&SpawnPoint>()
            .iter()
            .map(|(_, p)| p.position)
            .collect(),
        queue: QueueView {
            index: input.context.level_queue.index(),
            total: input.context.level_queue.len(),
            is_last: input.context.is_last_level(),
        },
        audio_events: input.audio_events,
        events: input.events,
    }
}

fn build_scene(scene: &SceneState, now: u64) -> SceneView {
    let transition_alpha = scene.transition.as_ref().map_or(0.0, |t| {
        (now.saturating_sub(t.started_ms) as f32 / LEVEL_FADE_MS as f32).clamp(0.0, 1.0)
    });
    SceneView {
        kind: scene.kind,
        level: scene.level.clone(),
        background_color: scene.background_color,
        transition_alpha,
    }
}

fn build_round(
    world: &World,
    scene: &SceneState,
    context: &MatchContext,
    timings: &RoundTimings,
    now: u64,
) -> Option<RoundView> {
    let round = scene.round.as_ref()?;

    let mut players: Vec<Player> = world
        .query::<&Player>()
        .iter()
        .map(|(_, p)| p.clone())
        .collect();
    players.sort_by_key(|p| p.id);
    sort_standings(&mut players);

    let (game_over_alpha, banner, show_final_winner) = match round.elapsed_since_game_over(now) {
        Some(elapsed) => {
            let final_results = context.is_last_level() && !round.transition_requested;
            let contenders: Vec<Player> = players
                .iter()
                .filter(|p| p.is_dead() || scene.survivors.contains(&p.id))
                .cloned()
                .collect();
            let winner = winning_player(&contenders, final_results).map(|i| &contenders[i]);
            let show_final = final_results && winner.is_some();
            let banner = BannerView {
                text: banner_text(winner),
                color: banner_color(winner, show_final),
            };
            (game_over_alpha(timings, elapsed), Some(banner), show_final)
        }
        None => (0.0, None, false),
    };

    Some(RoundView {
        phase: round.phase,
        countdown_text: countdown_text(timings, now.saturating_sub(round.started_at_ms)),
        game_over_alpha,
        banner,
        show_final_winner,
        standings: players
            .iter()
            .map(|p| StandingView {
                player: p.id,
                name: p.name.clone(),
                color: p.color,
                wins: p.wins,
                kills: p.kills,
                alive: !p.is_dead(),
            })
            .collect(),
    })
}

fn build_start_area(world: &World, scene: &SceneState, now: u64) -> Option<StartAreaView> {
    let mut query = world.query::<&StartArea>();
    let (_, area) = query.iter().next()?;
    Some(StartAreaView {
        center: area.center,
        half_extents: area.half_extents,
        players_ready: start_area::players_ready(world, scene, area),
        players_total: scene.active_players.len(),
        countdown: area.countdown_second(now),
    })
}

fn build_players(world: &World) -> Vec<PlayerView> {
    let mut players: Vec<PlayerView> = world
        .query::<(&Player, &Body, &PlayerControl)>()
        .iter()
        .map(|(_, (player, body, control))| PlayerView {
            id: player.id,
            name: player.name.clone(),
            gamepad_id: player.gamepad_id,
            color: if player.is_dead() {
                player.color.fade(0.6)
            } else {
                player.color
            },
            position: body.position,
            rotation: body.rotation,
            radius: body.radius,
            health: player.health,
            health_fraction: player.health_fraction(),
            dead: player.is_dead(),
            kills: player.kills,
            wins: player.wins,
            anim_frame: control.anim_frame as u32,
        })
        .collect();
    players.sort_by_key(|p| p.id);
    players
}

fn build_bullets(world: &World, now: u64) -> Vec<BulletView> {
    world
        .query::<(&Projectile, &Body)>()
        .iter()
        .map(|(_, (projectile, body))| {
            let t = 1.0 - projectile.lifetime_fraction(now);
            let alpha = if t > 0.3 { 1.0 } else { t / 0.3 };
            BulletView {
                from: body.last_position,
                to: body.position,
                color: projectile.color.fade(alpha),
            }
        })
        .collect()
}

fn build_effects(world: &World, now: u64) -> Vec<EffectView> {
    world
        .query::<(&Effect, &Body)>()
        .iter()
        .map(|(_, (effect, body))| {
            let t = 1.0 - effect.lifetime_fraction(now);
            let (color, size, rotation) = match effect.kind {
                EffectKind::Smoke => (effect.color.fade(t * t), effect.size, body.rotation),
                EffectKind::Spark => {
                    let velocity = body.velocity();
                    let alpha = if t > 0.5 { 1.0 } else { t / 0.5 };
                    let length = velocity.length().max(5.0);
                    (
                        effect.color.mix(effect.end_color, t).fade(alpha),
                        Vec2::new(length, effect.size.y),
                        velocity.y.atan2(velocity.x),
                    )
                }
                _ => (effect.color, effect.size, body.rotation),
            };
            EffectView {
                kind: effect.kind,
                texture: effect.texture,
                position: body.position,
                size,
                rotation,
                color,
                intensity: effect.intensity,
            }
        })
        .collect()
}
