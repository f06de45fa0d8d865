//! Match simulation for Shotgang.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces MatchSnapshots for the renderer.

pub mod config;
pub mod context;
pub mod engine;
pub mod level;
pub mod scene;
pub mod systems;
pub mod vfx;
pub mod world_setup;

pub use config::MatchConfig;
pub use engine::MatchEngine;
pub use shotgang_core as core;

#[cfg(test)]
mod tests;
