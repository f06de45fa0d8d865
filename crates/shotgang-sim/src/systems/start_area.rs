//! Lobby start area: everyone inside starts the match.

use hecs::World;

use shotgang_core::components::{Body, Player, StartArea};
use shotgang_core::enums::Sound;
use shotgang_core::events::AudioEvent;
use shotgang_core::types::Vec2;

use crate::scene::SceneState;

/// Returns true on the tick the ready countdown completes.
pub fn run(
    world: &mut World,
    scene: &SceneState,
    now_ms: u64,
    audio_events: &mut Vec<AudioEvent>,
) -> bool {
    let positions: Vec<Vec2> = world
        .query::<(&Player, &Body)>()
        .iter()
        .filter(|(_, (player, _))| scene.active_players.contains(&player.id))
        .map(|(_, (_, body))| body.position)
        .collect();

    let mut transition = false;
    for (_entity, area) in world.query_mut::<&mut StartArea>() {
        let all_ready = !positions.is_empty() && positions.iter().all(|p| area.contains(*p));

        if !all_ready {
            area.countdown_started_ms = None;
            area.last_countdown_second = None;
            continue;
        }

        let started = *area.countdown_started_ms.get_or_insert(now_ms);
        if let Some(second) = area.countdown_second(now_ms) {
            if area.last_countdown_second != Some(second) {
                let sound = if second == 0 {
                    Sound::CountdownDing1
                } else {
                    Sound::CountdownDing0
                };
                audio_events.push(AudioEvent::plain(sound));
                area.last_countdown_second = Some(second);
            }
        }

        if now_ms.saturating_sub(started) > area.ready_countdown_ms && !area.transitioned {
            area.transitioned = true;
            transition = true;
        }
    }
    transition
}

/// How many active players stand inside the area.
pub fn players_ready(world: &World, scene: &SceneState, area: &StartArea) -> usize {
    world
        .query::<(&Player, &Body)>()
        .iter()
        .filter(|(_, (player, body))| {
            scene.active_players.contains(&player.id) && area.contains(body.position)
        })
        .count()
}
