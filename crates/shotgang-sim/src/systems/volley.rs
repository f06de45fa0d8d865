//! Forced volleys: every player fires on a fixed interval.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use shotgang_core::components::Player;
use shotgang_core::events::AudioEvent;

use crate::scene::SceneState;
use crate::systems::shooting;

#[derive(Debug, Clone, PartialEq)]
pub struct VolleyTimer {
    pub interval_ms: u64,
    /// Set when the round starts, reset after every volley.
    pub last_volley_ms: Option<u64>,
}

impl VolleyTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_volley_ms: None,
        }
    }

    /// 0 right after a volley, 1 when the next one is due.
    pub fn progress(&self, now_ms: u64) -> f32 {
        match self.last_volley_ms {
            Some(last) => {
                (now_ms.saturating_sub(last) as f32 / self.interval_ms.max(1) as f32).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }
}

/// Enough players alive for a volley to matter.
pub fn volley_allowed(total: usize, alive: usize) -> bool {
    (total > 1 && alive > 1) || (total == 1 && alive == 1)
}

/// Returns true when a volley fired this tick.
pub fn run(
    world: &mut World,
    scene: &mut SceneState,
    now_ms: u64,
    rng: &mut ChaCha8Rng,
    audio_events: &mut Vec<AudioEvent>,
) -> bool {
    if !scene.has_started() {
        return false;
    }
    let Some(timer) = scene.volley.as_mut() else {
        return false;
    };
    let last = *timer.last_volley_ms.get_or_insert(now_ms);
    if now_ms.saturating_sub(last) < timer.interval_ms {
        return false;
    }

    let players: Vec<(Entity, bool)> = world
        .query::<&Player>()
        .iter()
        .map(|(entity, player)| (entity, player.is_dead()))
        .collect();
    let alive = players.iter().filter(|(_, dead)| !dead).count();
    if !volley_allowed(players.len(), alive) {
        return false;
    }

    for (entity, _) in players {
        shooting::shoot(world, entity, now_ms, rng, audio_events);
    }
    timer.last_volley_ms = Some(now_ms);
    tracing::debug!(now_ms, "forced volley");
    true
}
