//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 50;

/// Milliseconds per tick.
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Collision layers ---

pub const WALL_LAYER: u32 = 1;
pub const PLAYER_LAYER: u32 = 2;
pub const BULLET_LAYER: u32 = 4;
pub const SHELL_LAYER: u32 = 8;
pub const PARTICLE_LAYER: u32 = 16;
pub const NO_COLLISION_LAYER: u32 = 1024;

// --- Player ---

/// Health of a freshly spawned player.
pub const FULL_HEALTH: f32 = 100.0;

/// Default player circle radius (world units).
pub const PLAYER_RADIUS: f32 = 24.0;

/// Radial dead zone applied to analog sticks.
pub const STICK_DEAD_ZONE: f32 = 0.2;

/// Right-stick magnitude above which the player turns to aim.
pub const AIM_STICK_THRESHOLD: f32 = 0.4;

/// Trigger value above which the trigger counts as pulled.
pub const TRIGGER_THRESHOLD: f32 = 0.5;

/// Base interval between footstep sounds (ms).
pub const FOOTSTEP_INTERVAL_MS: u64 = 250;

/// Random extra footstep delay, exclusive upper bound (ms).
pub const FOOTSTEP_JITTER_MS: u64 = 3;

/// Acceleration magnitude above which the player counts as walking.
pub const FOOTSTEP_MIN_ACCELERATION: f32 = 1.0;

// --- Projectiles ---

/// Base damage coefficient: damage = k * speed * mass * (1 - lifetime fraction).
pub const DAMAGE_COEFFICIENT: f32 = 0.30;

/// Bullet lifetime before it is removed (ms).
pub const BULLET_MAX_LIFETIME_MS: u64 = 200;

/// Verlet drag applied to bullets each tick.
pub const BULLET_DRAG: f32 = 0.1;

/// Chance that a bullet hit leaves a blood pool on the ground.
pub const GROUND_BLOOD_CHANCE: f64 = 0.2;

// --- Round lifecycle ---

/// Countdown before a round becomes active (ms).
pub const COUNTDOWN_MS: u64 = 3000;

/// How long "GO" stays on screen after the countdown (ms).
pub const GO_DISPLAY_MS: u64 = 1000;

/// Delay between the elimination condition and scoring, so near-simultaneous
/// deaths resolve as a draw (ms).
pub const ROUND_GRACE_MS: u64 = 500;

/// Fade to black after the round is over (ms).
pub const GAME_OVER_FADE_MS: u64 = 2000;

/// Hold on the results screen after the fade (ms).
pub const NEXT_LEVEL_HOLD_MS: u64 = 2000;

/// Scene fade when transitioning into the next level (ms).
pub const LEVEL_FADE_MS: u64 = 500;

/// Lobby start-area countdown (ms).
pub const READY_COUNTDOWN_MS: u64 = 3000;

/// Default interval between forced volleys in arena levels (ms).
pub const VOLLEY_INTERVAL_MS: u64 = 5000;

// --- Levels ---

/// Number of times the level list is shuffled and queued.
pub const LEVEL_REPEAT_COUNT: usize = 3;

pub const LOBBY_LEVEL: &str = "levels/shotgang_start.scn";

pub const LEVEL_NAMES: [&str; 9] = [
    "levels/shotgang_level_concrete_0.scn",
    "levels/shotgang_level_concrete_1.scn",
    "levels/shotgang_level_concrete_2.scn",
    "levels/shotgang_level_grass_0.scn",
    "levels/shotgang_level_grass_1.scn",
    "levels/shotgang_level_grass_2.scn",
    "levels/shotgang_level_desert_0.scn",
    "levels/shotgang_level_desert_1.scn",
    "levels/shotgang_level_desert_2.scn",
];

// --- Asset names ---

pub const FONT_BADABB: &str = "badabb";
pub const TEXTURE_SHOTGUN_SHELL: &str = "shotgun_shell";
pub const TEXTURE_SMOKE_PUFF: &str = "smoke_puff";
pub const TEXTURE_SPARK_0: &str = "spark_0";
pub const TEXTURE_BLOOD_0: &str = "blood_0";
pub const TEXTURE_BLOOD_1: &str = "blood_1";
pub const TEXTURE_BURN_0: &str = "burn_decal";
