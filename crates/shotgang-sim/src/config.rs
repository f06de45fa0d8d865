//! Match configuration loaded from TOML with env overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use shotgang_core::components::PlayerTuning;
use shotgang_core::constants::*;
use shotgang_rules::round::RoundTimings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// RNG seed. Same seed, same match.
    pub seed: u64,
    /// How many shuffled copies of the level list are queued.
    pub level_repeat_count: usize,
    pub countdown_ms: u64,
    pub grace_ms: u64,
    pub game_over_fade_ms: u64,
    pub next_level_hold_ms: u64,
    pub damage_coefficient: f32,
    /// Overrides every arena's volley interval when set. Zero disables volleys.
    pub volley_interval_ms: Option<u64>,
    /// Overrides the lobby start area's ready countdown when set.
    pub ready_countdown_ms: Option<u64>,
    /// Default tuning for the built-in level catalog.
    pub player: PlayerTuning,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            level_repeat_count: LEVEL_REPEAT_COUNT,
            countdown_ms: COUNTDOWN_MS,
            grace_ms: ROUND_GRACE_MS,
            game_over_fade_ms: GAME_OVER_FADE_MS,
            next_level_hold_ms: NEXT_LEVEL_HOLD_MS,
            damage_coefficient: DAMAGE_COEFFICIENT,
            volley_interval_ms: None,
            ready_countdown_ms: None,
            player: PlayerTuning::default(),
            log_level: Some("info".to_string()),
            json_logs: false,
        }
    }
}

impl MatchConfig {
    /// Read `path` if it exists, otherwise start from defaults. Env overrides
    /// and clamping are applied either way.
    pub fn load(path: &Path) -> Result<Self> {
        let cfg = if path.is_file() {
            let txt = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            Self::from_toml(&txt).with_context(|| format!("parse {}", path.display()))?
        } else {
            Self::default()
        };
        Ok(cfg.with_env_overrides().clamped())
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str::<Self>(text).context("parse match TOML")
    }

    /// `SHOTGANG_SEED` and `SHOTGANG_LOG`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(seed) = std::env::var("SHOTGANG_SEED").ok().and_then(|v| v.parse().ok()) {
            self.seed = seed;
        }
        if let Ok(level) = std::env::var("SHOTGANG_LOG") {
            self.log_level = Some(level);
        }
        self
    }

    pub fn clamped(mut self) -> Self {
        self.level_repeat_count = self.level_repeat_count.clamp(1, 10);
        self.countdown_ms = self.countdown_ms.min(60_000);
        self.grace_ms = self.grace_ms.min(10_000);
        self.game_over_fade_ms = self.game_over_fade_ms.min(30_000);
        self.next_level_hold_ms = self.next_level_hold_ms.min(30_000);
        self.damage_coefficient = self.damage_coefficient.clamp(0.0, 10.0);
        self.ready_countdown_ms = self.ready_countdown_ms.map(|ms| ms.min(60_000));
        self.player.fire_rate = self.player.fire_rate.max(0.0001);
        self.player.drag = self.player.drag.clamp(0.0, 1.0);
        self.player.radius = self.player.radius.max(1.0);
        self.player.bullet_count = self.player.bullet_count.min(64);
        if self.player.frame_end_index <= self.player.frame_start_index {
            self.player.frame_end_index = self.player.frame_start_index + 1;
        }
        self
    }

    pub fn round_timings(&self) -> RoundTimings {
        RoundTimings {
            countdown_ms: self.countdown_ms,
            grace_ms: self.grace_ms,
            fade_ms: self.game_over_fade_ms,
            hold_ms: self.next_level_hold_ms,
        }
    }
}
