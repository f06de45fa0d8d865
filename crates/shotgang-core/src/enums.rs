//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Round lifecycle phase of an arena level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Counting down before players may move and shoot.
    #[default]
    Countdown,
    /// Round in progress, elimination is being tracked.
    Active,
    /// Elimination condition met; scoring and results screen.
    RoundOver,
    /// Next level requested.
    Transition,
    /// Last queued level finished; final standings, no further transition.
    Terminal,
}

/// What kind of scene is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    /// Join-and-ready area. No damage, no rounds.
    #[default]
    Lobby,
    /// Competitive level with a round state machine.
    Arena,
}

/// Top-level run state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Running,
    Paused,
}

/// Physics body mobility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    #[default]
    Dynamic,
    Static,
}

/// Visual effect kinds spawned by the VFX factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Short-lived light burst.
    Flash,
    /// Streaking spark particle.
    Spark,
    /// Growing, fading smoke puff (also used for blood puffs).
    Smoke,
    /// Ejected shotgun shell.
    Shell,
    /// Persistent decal drawn on walls.
    Decal,
    /// Persistent ground decoration (blood pools).
    Decoration,
}

/// Sounds the simulation asks the audio layer to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    CountdownDing0,
    CountdownDing1,
    Shotgun,
    ShellDrop(u8),
    Step(u8),
    Death,
}

impl Sound {
    /// Asset name the audio layer resolves.
    pub fn asset_name(self) -> &'static str {
        match self {
            Sound::CountdownDing0 => "countdown_ding_0",
            Sound::CountdownDing1 => "countdown_ding_1",
            Sound::Shotgun => "shotgun",
            Sound::ShellDrop(0) => "shell_drop_0",
            Sound::ShellDrop(1) => "shell_drop_1",
            Sound::ShellDrop(_) => "shell_drop_2",
            Sound::Step(0) => "step_0",
            Sound::Step(1) => "step_1",
            Sound::Step(_) => "step_2",
            Sound::Death => "death",
        }
    }
}
