//! Level layouts and the catalog they are loaded from.
//!
//! A layout is the static content of a scene: walls, spawn points, the lobby
//! start area and the player template. The built-in catalog generates the
//! lobby and the nine arenas; a directory of `*.json` layouts can replace it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shotgang_core::components::{PlayerTuning, Wall};
use shotgang_core::constants::*;
use shotgang_core::enums::SceneKind;
use shotgang_core::types::{Color, Vec2};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("level {0} defined twice")]
    Duplicate(String),
}

/// Wall as authored: center and full size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub center: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub has_spikes: bool,
    #[serde(default = "default_wall_color")]
    pub color: Color,
}

fn default_wall_color() -> Color {
    Color::rgb(0.3, 0.3, 0.3)
}

impl WallSpec {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            has_spikes: false,
            color: default_wall_color(),
        }
    }

    pub fn spiked(mut self) -> Self {
        self.has_spikes = true;
        self.color = Color::rgb(0.45, 0.2, 0.2);
        self
    }

    pub fn to_wall(self) -> Wall {
        Wall {
            center: self.center,
            half_extents: self.size * 0.5,
            has_spikes: self.has_spikes,
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartAreaSpec {
    pub center: Vec2,
    pub size: Vec2,
    #[serde(default = "default_ready_countdown")]
    pub ready_countdown_ms: u64,
}

fn default_ready_countdown() -> u64 {
    READY_COUNTDOWN_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    #[serde(default)]
    pub kind: SceneKind,
    #[serde(default)]
    pub background_color: Color,
    #[serde(default)]
    pub spawn_points: Vec<Vec2>,
    #[serde(default)]
    pub walls: Vec<WallSpec>,
    #[serde(default)]
    pub start_area: Option<StartAreaSpec>,
    /// Tuning for players joining in this level. No template, no joins.
    #[serde(default)]
    pub template: Option<PlayerTuning>,
    /// Forced volley interval. Arena levels only.
    #[serde(default)]
    pub volley_interval_ms: Option<u64>,
}

impl LevelLayout {
    /// Placeholder for a level that could not be found.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: if name == LOBBY_LEVEL {
                SceneKind::Lobby
            } else {
                SceneKind::Arena
            },
            background_color: Color::DARK,
            spawn_points: Vec::new(),
            walls: Vec::new(),
            start_area: None,
            template: None,
            volley_interval_ms: None,
        }
    }
}

/// Named level layouts.
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: BTreeMap<String, LevelLayout>,
}

impl LevelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lobby plus every arena in `LEVEL_NAMES`, generated from `tuning`.
    pub fn builtin(tuning: &PlayerTuning) -> Self {
        let mut catalog = Self::new();
        catalog.insert(lobby_layout(tuning));
        for (index, name) in LEVEL_NAMES.iter().enumerate() {
            catalog.insert(arena_layout(name, index, tuning));
        }
        catalog
    }

    /// Load every `*.json` layout in `dir`, keyed by the layout's own name.
    pub fn from_dir(dir: &Path) -> Result<Self, LevelError> {
        let entries = std::fs::read_dir(dir).map_err(|source| LevelError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LevelError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Self::new();
        for path in paths {
            let text = std::fs::read_to_string(&path).map_err(|source| LevelError::Io {
                path: path.clone(),
                source,
            })?;
            let layout: LevelLayout = serde_json::from_str(&text)
                .map_err(|source| LevelError::Parse { path: path.clone(), source })?;
            if catalog.levels.contains_key(&layout.name) {
                return Err(LevelError::Duplicate(layout.name));
            }
            catalog.insert(layout);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, layout: LevelLayout) {
        self.levels.insert(layout.name.clone(), layout);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.levels.contains_key(name)
    }

    /// Names of every arena level, sorted.
    pub fn arena_names(&self) -> Vec<&str> {
        self.levels
            .values()
            .filter(|layout| layout.kind == SceneKind::Arena)
            .map(|layout| layout.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Layout for `name`, or an empty layout if unknown.
    pub fn get(&self, name: &str) -> LevelLayout {
        match self.levels.get(name) {
            Some(layout) => layout.clone(),
            None => {
                tracing::warn!(level = name, "level not found, loading empty layout");
                LevelLayout::empty(name)
            }
        }
    }
}

// --- Built-in layouts ---

const ARENA_WIDTH: f32 = 1920.0;
const ARENA_HEIGHT: f32 = 1080.0;
const BORDER: f32 = 40.0;

fn border_walls(spiked: bool) -> Vec<WallSpec> {
    let (w, h) = (ARENA_WIDTH, ARENA_HEIGHT);
    let edge = |wall: WallSpec| if spiked { wall.spiked() } else { wall };
    vec![
        edge(WallSpec::new(Vec2::new(w / 2.0, BORDER / 2.0), Vec2::new(w, BORDER))),
        edge(WallSpec::new(Vec2::new(w / 2.0, h - BORDER / 2.0), Vec2::new(w, BORDER))),
        edge(WallSpec::new(Vec2::new(BORDER / 2.0, h / 2.0), Vec2::new(BORDER, h))),
        edge(WallSpec::new(Vec2::new(w - BORDER / 2.0, h / 2.0), Vec2::new(BORDER, h))),
    ]
}

fn corner_spawns() -> Vec<Vec2> {
    let inset = 200.0;
    vec![
        Vec2::new(inset, inset),
        Vec2::new(ARENA_WIDTH - inset, ARENA_HEIGHT - inset),
        Vec2::new(ARENA_WIDTH - inset, inset),
        Vec2::new(inset, ARENA_HEIGHT - inset),
        Vec2::new(ARENA_WIDTH / 2.0, inset),
        Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT - inset),
    ]
}

fn lobby_layout(tuning: &PlayerTuning) -> LevelLayout {
    LevelLayout {
        name: LOBBY_LEVEL.to_string(),
        kind: SceneKind::Lobby,
        background_color: Color::rgb(0.12, 0.12, 0.14),
        spawn_points: corner_spawns(),
        walls: border_walls(false),
        start_area: Some(StartAreaSpec {
            center: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
            size: Vec2::new(400.0, 300.0),
            ready_countdown_ms: READY_COUNTDOWN_MS,
        }),
        template: Some(PlayerTuning {
            shooting_enabled: true,
            ..tuning.clone()
        }),
        volley_interval_ms: None,
    }
}

/// Concrete levels allow free fire, grass levels only fire on the volley
/// timer, desert levels have both plus spiked borders.
fn arena_layout(name: &str, index: usize, tuning: &PlayerTuning) -> LevelLayout {
    let theme = index / 3;
    let variant = index % 3;
    let center = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);

    let mut walls = border_walls(theme == 2);
    match variant {
        0 => walls.push(WallSpec::new(center, Vec2::new(200.0, 200.0))),
        1 => {
            walls.push(WallSpec::new(center - Vec2::new(400.0, 0.0), Vec2::new(60.0, 400.0)));
            walls.push(WallSpec::new(center + Vec2::new(400.0, 0.0), Vec2::new(60.0, 400.0)));
        }
        _ => {
            walls.push(WallSpec::new(center, Vec2::new(600.0, 60.0)));
            walls.push(WallSpec::new(center, Vec2::new(60.0, 400.0)).spiked());
        }
    }

    let (background_color, shooting_enabled, volley_interval_ms) = match theme {
        0 => (Color::rgb(0.35, 0.35, 0.36), true, None),
        1 => (Color::rgb(0.2, 0.35, 0.15), false, Some(VOLLEY_INTERVAL_MS)),
        _ => (Color::rgb(0.6, 0.5, 0.3), true, Some(VOLLEY_INTERVAL_MS)),
    };

    LevelLayout {
        name: name.to_string(),
        kind: SceneKind::Arena,
        background_color,
        spawn_points: corner_spawns(),
        walls,
        start_area: None,
        template: Some(PlayerTuning {
            shooting_enabled,
            ..tuning.clone()
        }),
        volley_interval_ms,
    }
}
