//! Gameplay rules for Shotgang.
//!
//! Round lifecycle, damage, spawn selection, level queueing and scoring,
//! written as pure functions over plain data. No ECS dependency.

pub mod damage;
pub mod input;
pub mod levels;
pub mod roster;
pub mod round;
pub mod spawn;
pub mod standings;

pub use shotgang_core as core;
