//! ECS systems that operate on the match world each tick.
//!
//! Systems are pure functions over `&mut World` plus whatever engine state
//! they need passed in explicitly. Per-level state lives in `SceneState`,
//! cross-level state in `MatchContext`.

pub mod cleanup;
pub mod collision;
pub mod contact;
pub mod effects;
pub mod game_state;
pub mod movement;
pub mod player_control;
pub mod player_spawn;
pub mod shooting;
pub mod snapshot;
pub mod start_area;
pub mod volley;
