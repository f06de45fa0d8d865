//! Fundamental identity, color and time types.

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Stable player identity. Survives level transitions, unlike ECS entity handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Linear RGBA color, components in 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GOLD: Color = Color::rgb(1.0, 0.9, 0.0);
    pub const DARK: Color = Color::rgb(0.1, 0.1, 0.1);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels (roster colors are authored this way).
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
    }

    /// Linear blend: `t = 1` gives `self`, `t = 0` gives `other`.
    pub fn mix(self, other: Color, t: f32) -> Self {
        Self {
            r: t * self.r + (1.0 - t) * other.r,
            g: t * self.g + (1.0 - t) * other.g,
            b: t * self.b + (1.0 - t) * other.b,
            a: self.a,
        }
    }
}

/// Simulation time tracking. Milliseconds are exact because the tick
/// length divides a second evenly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: u64,
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms += crate::constants::TICK_MS;
    }

    /// Milliseconds elapsed since `since`, saturating at zero.
    pub fn since(&self, since: u64) -> u64 {
        self.elapsed_ms.saturating_sub(since)
    }
}
