//! Drives the round state machine of an arena level.

use hecs::World;

use shotgang_core::components::Player;
use shotgang_core::enums::Sound;
use shotgang_core::events::{AudioEvent, MatchEvent};
use shotgang_core::types::PlayerId;
use shotgang_rules::round::{RoundAction, RoundInput, RoundTimings};

use crate::scene::SceneState;

/// Step the round. Returns true when the next level should be loaded.
pub fn run(
    world: &mut World,
    scene: &mut SceneState,
    timings: &RoundTimings,
    is_last_level: bool,
    now_ms: u64,
    audio_events: &mut Vec<AudioEvent>,
    events: &mut Vec<MatchEvent>,
) -> bool {
    let Some(round) = scene.round.as_mut() else {
        return false;
    };

    let (total, mut alive) = count_players(world);
    // Players joining after the round ended take no part in scoring it.
    if round.is_game_over() {
        alive = count_survivors(world, &scene.survivors);
    }
    let input = RoundInput {
        now_ms,
        total_players: total,
        alive_players: alive,
        is_last_level,
    };

    let mut request_transition = false;
    for action in round.step(timings, &input) {
        match action {
            RoundAction::CountdownCue { go } => {
                let sound = if go {
                    Sound::CountdownDing1
                } else {
                    Sound::CountdownDing0
                };
                audio_events.push(AudioEvent::plain(sound));
            }
            RoundAction::RoundStarted => {
                tracing::info!(level = %scene.level, players = total, "round started");
                events.push(MatchEvent::RoundStarted);
            }
            RoundAction::RoundOver => {
                scene.survivors = living_players(world);
                tracing::info!(level = %scene.level, alive, "round over");
                events.push(MatchEvent::RoundOver);
            }
            RoundAction::AwardWin => award_win(world, &scene.survivors, events),
            RoundAction::Draw => {
                tracing::info!(level = %scene.level, "round drawn");
                events.push(MatchEvent::RoundDrawn);
            }
            RoundAction::RequestTransition => request_transition = true,
            RoundAction::MatchFinished => {
                tracing::info!(level = %scene.level, "match finished");
                events.push(MatchEvent::MatchFinished);
            }
        }
    }
    request_transition
}

/// (total, alive) player counts.
pub fn count_players(world: &World) -> (usize, usize) {
    let mut query = world.query::<&Player>();
    query.iter().fold((0, 0), |(total, alive), (_, player)| {
        (total + 1, alive + usize::from(!player.is_dead()))
    })
}

fn living_players(world: &World) -> Vec<PlayerId> {
    let mut query = world.query::<&Player>();
    query
        .iter()
        .filter(|(_, p)| !p.is_dead())
        .map(|(_, p)| p.id)
        .collect()
}

fn count_survivors(world: &World, survivors: &[PlayerId]) -> usize {
    let mut query = world.query::<&Player>();
    query
        .iter()
        .filter(|(_, p)| !p.is_dead() && survivors.contains(&p.id))
        .count()
}

fn award_win(world: &mut World, survivors: &[PlayerId], events: &mut Vec<MatchEvent>) {
    let winner = world
        .query_mut::<&mut Player>()
        .into_iter()
        .find(|(_, p)| !p.is_dead() && survivors.contains(&p.id));
    if let Some((_, player)) = winner {
        player.wins += 1;
        tracing::info!(player = player.id.0, name = %player.name, wins = player.wins, "win awarded");
        events.push(MatchEvent::WinAwarded { player: player.id });
    }
}
