//! Gamepad-driven player movement, aiming, footsteps and triggers.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use shotgang_core::commands::GamepadState;
use shotgang_core::components::{Body, Player, PlayerControl, PlayerTuning};
use shotgang_core::constants::*;
use shotgang_core::enums::Sound;
use shotgang_core::events::AudioEvent;
use shotgang_core::types::Vec2;
use shotgang_rules::input::{filter_stick, gaussian};

use crate::scene::SceneState;
use crate::systems::shooting;

/// Apply input to every living player, then fire for those who pulled the trigger.
pub fn run(
    world: &mut World,
    gamepads: &BTreeMap<u32, GamepadState>,
    scene: &SceneState,
    now_ms: u64,
    rng: &mut ChaCha8Rng,
    audio_events: &mut Vec<AudioEvent>,
) {
    let started = scene.has_started();
    let game_over = scene.is_game_over();
    let mut shooters: Vec<Entity> = Vec::new();

    for (entity, (player, body, tuning, control)) in
        world.query_mut::<(&Player, &mut Body, &PlayerTuning, &mut PlayerControl)>()
    {
        control.move_acceleration = Vec2::ZERO;

        if !player.is_dead() && !game_over {
            if let Some(pad) = gamepads.get(&player.gamepad_id) {
                let left = filter_stick(pad.left_stick);
                let right = filter_stick(pad.right_stick);

                if right.length() > AIM_STICK_THRESHOLD {
                    body.rotation = right.y.atan2(right.x);
                }

                if started {
                    control.move_acceleration = left * tuning.speed;
                    footsteps(control, now_ms, rng, audio_events);
                    if trigger(control, tuning, pad.right_trigger) {
                        shooters.push(entity);
                    }
                }
            }
        }

        body.acceleration += control.move_acceleration;
        animate(control, tuning);
    }

    for entity in shooters {
        shooting::shoot(world, entity, now_ms, rng, audio_events);
    }
}

fn footsteps(
    control: &mut PlayerControl,
    now_ms: u64,
    rng: &mut ChaCha8Rng,
    audio_events: &mut Vec<AudioEvent>,
) {
    let interval = FOOTSTEP_INTERVAL_MS + rng.gen_range(0..FOOTSTEP_JITTER_MS);
    if control.move_acceleration.length() > FOOTSTEP_MIN_ACCELERATION
        && now_ms.saturating_sub(control.last_step_ms) > interval
    {
        audio_events.push(AudioEvent {
            sound: Sound::Step(rng.gen_range(0..3)),
            pitch: 2.0 + 0.1 * gaussian(rng),
            volume: 0.3 + 0.1 * gaussian(rng),
        });
        control.last_step_ms = now_ms;
    }
}

/// Semi-automatic fires once per pull; full auto fires while held.
fn trigger(control: &mut PlayerControl, tuning: &PlayerTuning, value: f32) -> bool {
    if tuning.shooting_enabled && value > TRIGGER_THRESHOLD {
        let fire = !control.shot_fired || tuning.full_auto;
        control.shot_fired = true;
        fire
    } else {
        control.shot_fired = false;
        false
    }
}

fn animate(control: &mut PlayerControl, tuning: &PlayerTuning) {
    if control.move_acceleration == Vec2::ZERO {
        return;
    }
    control.anim_frame += DT * tuning.frame_rate;
    if control.anim_frame >= tuning.frame_end_index as f32 {
        control.anim_frame = tuning.frame_start_index as f32;
    }
}
