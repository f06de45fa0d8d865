//! Gamepad filtering and random jitter.

use rand::Rng;
use shotgang_core::constants::STICK_DEAD_ZONE;
use shotgang_core::types::Vec2;

/// Radial dead zone, then rescale so the edge of the dead zone reads 0 and
/// full deflection reads 1.
pub fn filter_stick(stick: Vec2) -> Vec2 {
    let length = stick.length();
    if length <= STICK_DEAD_ZONE {
        return Vec2::ZERO;
    }
    let scaled = ((length - STICK_DEAD_ZONE) / (1.0 - STICK_DEAD_ZONE)).min(1.0);
    stick / length * scaled
}

/// Standard normal sample (Box-Muller).
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}

/// Uniform in `base ± spread`.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, base: f32, spread: f32) -> f32 {
    base + rng.gen_range(-1.0..=1.0) * spread
}
