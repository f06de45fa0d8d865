//! Scripted gamepads for headless runs.
//!
//! Each bot reads the previous snapshot and answers with gamepad state:
//! walk into the lobby start area, then hunt the nearest living player.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use shotgang_core::commands::{GamepadState, PlayerCommand};
use shotgang_core::state::{MatchSnapshot, PlayerView};
use shotgang_core::types::Vec2;

/// Bots close in until this distance, then strafe.
const ENGAGE_DISTANCE: f32 = 250.0;
/// Bots only pull the trigger within this distance.
const FIRE_DISTANCE: f32 = 450.0;
/// Close enough to the start area center.
const ARRIVE_DISTANCE: f32 = 20.0;
/// Gamepad ids for bots start here, clear of real controllers.
pub const BOT_GAMEPAD_BASE: u32 = 100;

pub struct BotDriver {
    gamepads: Vec<u32>,
    rng: ChaCha8Rng,
}

impl BotDriver {
    pub fn new(count: u32, seed: u64) -> Self {
        Self {
            gamepads: (0..count).map(|i| BOT_GAMEPAD_BASE + i).collect(),
            rng: ChaCha8Rng::seed_from_u64(seed ^ 0xB075),
        }
    }

    pub fn len(&self) -> usize {
        self.gamepads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gamepads.is_empty()
    }

    /// Commands for every bot. Bots without a player press START.
    pub fn commands(&mut self, snapshot: &MatchSnapshot) -> Vec<PlayerCommand> {
        let mut commands = Vec::with_capacity(self.gamepads.len());
        for i in 0..self.gamepads.len() {
            let gamepad_id = self.gamepads[i];
            match snapshot.players.iter().find(|p| p.gamepad_id == gamepad_id) {
                Some(me) => {
                    let state = self.drive(me, snapshot);
                    commands.push(PlayerCommand::SetGamepad { gamepad_id, state });
                }
                None => commands.push(PlayerCommand::PressStart { gamepad_id }),
            }
        }
        commands
    }

    fn drive(&mut self, me: &PlayerView, snapshot: &MatchSnapshot) -> GamepadState {
        if me.dead {
            return GamepadState::default();
        }

        if let Some(area) = &snapshot.start_area {
            return GamepadState {
                left_stick: steer(me.position, area.center, ARRIVE_DISTANCE),
                ..GamepadState::default()
            };
        }

        let target = snapshot
            .players
            .iter()
            .filter(|p| p.id != me.id && !p.dead)
            .min_by(|a, b| {
                a.position
                    .distance_squared(me.position)
                    .total_cmp(&b.position.distance_squared(me.position))
            });
        let wobble = Vec2::new(self.rng.gen_range(-0.4..0.4), self.rng.gen_range(-0.4..0.4));
        let Some(target) = target else {
            return GamepadState {
                left_stick: wobble,
                ..GamepadState::default()
            };
        };

        let offset = target.position - me.position;
        let distance = offset.length();
        let aim = offset.normalize_or_zero();
        let left_stick = if distance > ENGAGE_DISTANCE {
            aim + wobble
        } else {
            aim.perp() * 0.6 + wobble
        };

        // Release every other tick so semi-automatic weapons re-fire.
        let right_trigger = if distance < FIRE_DISTANCE && snapshot.time.tick % 2 == 0 {
            1.0
        } else {
            0.0
        };

        GamepadState {
            left_stick: left_stick.clamp_length_max(1.0),
            right_stick: aim,
            right_trigger,
        }
    }
}

/// Unit stick towards `to`, or neutral once within `slack`.
fn steer(from: Vec2, to: Vec2, slack: f32) -> Vec2 {
    let offset = to - from;
    if offset.length() < slack {
        Vec2::ZERO
    } else {
        offset.normalize()
    }
}
