//! Bullet damage and the death transition.

use shotgang_core::components::Player;
use shotgang_core::constants::DAMAGE_COEFFICIENT;

/// Something that takes damage and can die exactly once.
pub trait Damageable {
    fn health(&self) -> f32;
    fn set_health(&mut self, health: f32);

    fn is_dead(&self) -> bool {
        self.health() <= 0.0
    }
}

impl Damageable for Player {
    fn health(&self) -> f32 {
        self.health
    }

    fn set_health(&mut self, health: f32) {
        self.health = health;
    }
}

/// Result of applying one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead; nothing changed.
    Ignored,
    Wounded,
    /// Health crossed zero on this hit. Credit the kill and run the death handler.
    Killed,
}

/// Damage dealt by a pellet: linear falloff over the pellet's lifetime.
///
/// `speed` is the displacement per tick, `lifetime_fraction` is clamped to 0..1.
pub fn compute_damage(coefficient: f32, speed: f32, mass: f32, lifetime_fraction: f32) -> f32 {
    coefficient * speed * mass * (1.0 - lifetime_fraction.clamp(0.0, 1.0))
}

/// `compute_damage` with the default coefficient.
pub fn pellet_damage(speed: f32, mass: f32, lifetime_fraction: f32) -> f32 {
    compute_damage(DAMAGE_COEFFICIENT, speed, mass, lifetime_fraction)
}

/// Subtract `amount` from the target. A killing blow pins health to zero.
pub fn apply_damage<T: Damageable + ?Sized>(target: &mut T, amount: f32) -> DamageOutcome {
    if target.is_dead() {
        return DamageOutcome::Ignored;
    }

    let health = target.health() - amount.max(0.0);
    if health <= 0.0 {
        target.set_health(0.0);
        DamageOutcome::Killed
    } else {
        target.set_health(health);
        DamageOutcome::Wounded
    }
}

/// Unconditional kill (spiked walls). Returns false if already dead.
pub fn kill<T: Damageable + ?Sized>(target: &mut T) -> bool {
    if target.is_dead() {
        return false;
    }
    target.set_health(0.0);
    true
}
