//! Shotgang headless runner.
//!
//! Wires the match engine to a fixed-rate game loop thread, scripted bot
//! gamepads and tracing telemetry.

pub mod bots;
pub mod game_loop;
pub mod state;
pub mod telemetry;

pub use shotgang_core as core;
