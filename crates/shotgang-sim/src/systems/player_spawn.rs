//! Player admission: joins from the START button and carried-over players.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use shotgang_core::components::{Body, Player, SpawnPoint};
use shotgang_core::constants::FULL_HEALTH;
use shotgang_core::events::MatchEvent;
use shotgang_core::types::Vec2;
use shotgang_rules::roster::pick_player_spec;
use shotgang_rules::spawn::find_spawn_coordinate;

use crate::context::MatchContext;
use crate::scene::SceneState;
use crate::world_setup;

/// Where the next player should appear.
pub fn spawn_coordinate(world: &World) -> Vec2 {
    let points: Vec<Vec2> = world
        .query::<&SpawnPoint>()
        .iter()
        .map(|(_, p)| p.position)
        .collect();
    let players: Vec<Vec2> = world
        .query::<(&Player, &Body)>()
        .iter()
        .filter(|(_, (player, _))| !player.is_dead())
        .map(|(_, (_, body))| body.position)
        .collect();
    find_spawn_coordinate(&points, &players)
}

/// Add a player for `gamepad_id` unless one is already active. Levels
/// without a template ignore joins.
pub fn join(
    world: &mut World,
    scene: &mut SceneState,
    context: &mut MatchContext,
    gamepad_id: u32,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<MatchEvent>,
) -> Option<Entity> {
    let Some(template) = scene.template.clone() else {
        tracing::debug!(gamepad_id, level = %scene.level, "join ignored, level has no template");
        return None;
    };

    let existing: Vec<(u32, String)> = world
        .query::<&Player>()
        .iter()
        .map(|(_, p)| (p.gamepad_id, p.name.clone()))
        .collect();
    if existing.iter().any(|(pad, _)| *pad == gamepad_id) {
        return None;
    }

    let taken: Vec<&str> = existing.iter().map(|(_, name)| name.as_str()).collect();
    let spec = pick_player_spec(&taken, existing.len(), rng);
    let position = spawn_coordinate(world);
    let player = Player {
        id: context.allocate_player_id(),
        name: spec.name,
        gamepad_id,
        color: spec.color,
        health: FULL_HEALTH,
        kills: 0,
        wins: 0,
    };

    tracing::debug!(player = player.id.0, name = %player.name, gamepad_id, "player joined");
    events.push(MatchEvent::PlayerJoined {
        player: player.id,
        name: player.name.clone(),
        gamepad_id,
    });
    scene.active_players.push(player.id);
    Some(world_setup::spawn_player(world, player, template, position, 0.0))
}

/// Re-admit every player waiting in the transfer list.
pub fn admit_transfers(world: &mut World, scene: &mut SceneState, context: &mut MatchContext) {
    for carry in std::mem::take(&mut context.transfers) {
        let position = spawn_coordinate(world);
        scene.active_players.push(carry.player.id);
        world_setup::spawn_carried_player(world, carry, position);
    }
}
