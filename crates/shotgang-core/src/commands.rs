//! Input commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Analog state of one gamepad, sampled by the host each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadState {
    /// Movement stick, each axis in -1..1 (y grows downwards).
    pub left_stick: Vec2,
    /// Aim stick, each axis in -1..1.
    pub right_stick: Vec2,
    /// Fire trigger, 0..1.
    pub right_trigger: f32,
}

/// All possible host inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// START button went down on a gamepad (edge, not level).
    PressStart { gamepad_id: u32 },
    /// Latest analog state of a gamepad.
    SetGamepad { gamepad_id: u32, state: GamepadState },
    /// Gamepad unplugged; its player stays in the scene without input.
    DisconnectGamepad { gamepad_id: u32 },
    /// Freeze the scene.
    Pause,
    /// Unfreeze the scene.
    Resume,
}
