//! Match engine: the core of the game.
//!
//! `MatchEngine` owns the hecs world, the current scene and the match
//! context, processes gamepad commands, runs all systems, and produces
//! `MatchSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use shotgang_core::commands::{GamepadState, PlayerCommand};
use shotgang_core::components::{Body, Player, PlayerTuning};
use shotgang_core::constants::*;
use shotgang_core::enums::{GamePhase, SceneKind};
use shotgang_core::events::{AudioEvent, MatchEvent};
use shotgang_core::state::MatchSnapshot;
use shotgang_core::types::SimTime;
use shotgang_rules::levels::LevelQueue;
use shotgang_rules::round::{RoundState, RoundTimings};

use crate::config::MatchConfig;
use crate::context::{MatchContext, PlayerCarryOver};
use crate::level::LevelCatalog;
use crate::scene::{PendingTransition, SceneState};
use crate::systems;
use crate::systems::contact::ContactCtx;
use crate::systems::snapshot::SnapshotInput;
use crate::systems::volley::VolleyTimer;
use crate::world_setup;

/// The match engine. Owns the ECS world and all match state.
pub struct MatchEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    config: MatchConfig,
    timings: RoundTimings,
    catalog: LevelCatalog,
    context: MatchContext,
    scene: SceneState,
    gamepads: BTreeMap<u32, GamepadState>,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    audio_events: Vec<AudioEvent>,
    events: Vec<MatchEvent>,
}

impl MatchEngine {
    /// New match on the built-in level catalog, starting in the lobby.
    pub fn new(config: MatchConfig) -> Self {
        let catalog = LevelCatalog::builtin(&config.player);
        Self::with_catalog(config, catalog)
    }

    /// New match on `catalog` with a freshly shuffled level queue.
    pub fn with_catalog(config: MatchConfig, catalog: LevelCatalog) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let names = queued_level_names(&catalog);
        let queue = LevelQueue::shuffled(&names, config.level_repeat_count, &mut rng);
        Self::build(config, catalog, queue, rng)
    }

    /// New match playing `queue` in order.
    pub fn with_queue(config: MatchConfig, catalog: LevelCatalog, queue: LevelQueue) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::build(config, catalog, queue, rng)
    }

    fn build(config: MatchConfig, catalog: LevelCatalog, queue: LevelQueue, rng: ChaCha8Rng) -> Self {
        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng,
            timings: config.round_timings(),
            config,
            catalog,
            context: MatchContext::new(queue),
            scene: SceneState::default(),
            gamepads: BTreeMap::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            audio_events: Vec::new(),
            events: Vec::new(),
        };
        engine.load_level(LOBBY_LEVEL);
        engine
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the match by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> MatchSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Running {
            if self.scene.transition.is_some() {
                self.advance_transition();
            } else {
                self.run_systems();
            }
            self.time.advance();
        }

        self.snapshot()
    }

    /// Extract every player and start fading into the next queued level.
    /// No-op when the queue is exhausted or a transition is already running.
    pub fn transition_to_next_level(&mut self) -> bool {
        if self.scene.transition.is_some() {
            return false;
        }
        if self.context.level_queue.is_exhausted() {
            tracing::debug!(level = %self.scene.level, "level queue exhausted, staying");
            return false;
        }

        let mut carried: Vec<PlayerCarryOver> = self
            .world
            .query::<(&Player, &PlayerTuning, &Body)>()
            .iter()
            .map(|(_, (player, tuning, body))| PlayerCarryOver::extract(player, tuning, body))
            .collect();
        carried.sort_by_key(|c| c.player.id);
        self.context.transfers.extend(carried);

        let Some(level) = self.context.level_queue.advance().map(str::to_string) else {
            return false;
        };
        let queue_index = self.context.level_queue.index().unwrap_or(0);

        tracing::info!(
            from = %self.scene.level,
            to = %level,
            queue_index,
            players = self.context.transfers.len(),
            "level transition"
        );
        self.events.push(MatchEvent::LevelTransitionStarted {
            level: level.clone(),
            queue_index,
        });
        self.scene.transition = Some(PendingTransition {
            level,
            started_ms: self.time.elapsed_ms,
        });
        true
    }

    /// Get the current run phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn context(&self) -> &MatchContext {
        &self.context
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Mutable world access for tests that stage positions directly.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Load `name` immediately, bypassing the queue and the fade.
    #[cfg(test)]
    pub fn load_level_now(&mut self, name: &str) {
        self.load_level(name);
    }

    /// Mutable scene access for tests.
    #[cfg(test)]
    pub fn scene_mut(&mut self) -> &mut SceneState {
        &mut self.scene
    }

    fn snapshot(&mut self) -> MatchSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotInput {
                time: self.time,
                phase: self.phase,
                scene: &self.scene,
                context: &self.context,
                timings: &self.timings,
                audio_events: std::mem::take(&mut self.audio_events),
                events: std::mem::take(&mut self.events),
            },
        )
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::PressStart { gamepad_id } => {
                if self.phase != GamePhase::Running || self.scene.transition.is_some() {
                    tracing::debug!(gamepad_id, "start press dropped");
                    return;
                }
                systems::player_spawn::join(
                    &mut self.world,
                    &mut self.scene,
                    &mut self.context,
                    gamepad_id,
                    &mut self.rng,
                    &mut self.events,
                );
            }
            PlayerCommand::SetGamepad { gamepad_id, state } => {
                self.gamepads.insert(gamepad_id, state);
            }
            PlayerCommand::DisconnectGamepad { gamepad_id } => {
                self.gamepads.remove(&gamepad_id);
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Running {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Running;
                }
            }
        }
    }

    /// Load the pending level once the fade has completed.
    fn advance_transition(&mut self) {
        let Some(transition) = self.scene.transition.as_ref() else {
            return;
        };
        if self.time.since(transition.started_ms) >= LEVEL_FADE_MS {
            let level = transition.level.clone();
            self.load_level(&level);
        }
    }

    /// Replace the world with `name` and re-admit carried-over players.
    fn load_level(&mut self, name: &str) {
        let layout = self.catalog.get(name);
        let now = self.time.elapsed_ms;

        self.world.clear();
        self.despawn_buffer.clear();
        world_setup::load_layout(&mut self.world, &layout, self.config.ready_countdown_ms);

        let arena = layout.kind == SceneKind::Arena;
        let volley = self
            .config
            .volley_interval_ms
            .or(layout.volley_interval_ms)
            .filter(|ms| arena && *ms > 0)
            .map(VolleyTimer::new);

        self.scene = SceneState {
            kind: layout.kind,
            level: layout.name.clone(),
            background_color: layout.background_color,
            round: arena.then(|| RoundState::new(now)),
            volley,
            template: layout.template.clone(),
            active_players: Vec::new(),
            survivors: Vec::new(),
            transition: None,
        };
        systems::player_spawn::admit_transfers(&mut self.world, &mut self.scene, &mut self.context);

        tracing::info!(
            level = %self.scene.level,
            kind = ?self.scene.kind,
            players = self.scene.active_players.len(),
            "level loaded"
        );
        self.events.push(MatchEvent::LevelLoaded {
            level: self.scene.level.clone(),
            kind: self.scene.kind,
        });
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.elapsed_ms;

        // 1. Gamepad input, aiming, triggers
        systems::player_control::run(
            &mut self.world,
            &self.gamepads,
            &self.scene,
            now,
            &mut self.rng,
            &mut self.audio_events,
        );
        // 2. Forced volleys
        systems::volley::run(
            &mut self.world,
            &mut self.scene,
            now,
            &mut self.rng,
            &mut self.audio_events,
        );
        // 3. Lobby start area
        let ready = systems::start_area::run(&mut self.world, &self.scene, now, &mut self.audio_events);
        // 4. Verlet integration
        systems::movement::run(&mut self.world);
        // 5. Contact generation
        let contacts = systems::collision::run(&mut self.world);
        // 6. Damage, kills, deaths, hit effects
        systems::contact::run(
            &mut self.world,
            &contacts,
            &mut ContactCtx {
                now_ms: now,
                takes_damage: self.scene.takes_damage(),
                damage_coefficient: self.config.damage_coefficient,
                rng: &mut self.rng,
                audio_events: &mut self.audio_events,
                events: &mut self.events,
                despawn_buffer: &mut self.despawn_buffer,
            },
        );
        // 7. Effect animation
        systems::effects::run(&mut self.world, now, &mut self.rng);
        // 8. Round state machine
        let round_done = systems::game_state::run(
            &mut self.world,
            &mut self.scene,
            &self.timings,
            self.context.is_last_level(),
            now,
            &mut self.audio_events,
            &mut self.events,
        );
        // 9. Cleanup (consumed, expired)
        systems::cleanup::run(&mut self.world, now, &mut self.despawn_buffer);

        if ready || round_done {
            self.transition_to_next_level();
        }
    }
}

/// The standard rotation when `catalog` carries all of it, otherwise every
/// arena the catalog does have.
fn queued_level_names(catalog: &LevelCatalog) -> Vec<&str> {
    let missing: Vec<&str> = LEVEL_NAMES
        .iter()
        .copied()
        .filter(|name| !catalog.contains(name))
        .collect();
    if missing.is_empty() {
        return LEVEL_NAMES.to_vec();
    }

    let arenas = catalog.arena_names();
    if arenas.is_empty() {
        tracing::warn!(?missing, "catalog has no arenas, queued levels will load empty");
        return LEVEL_NAMES.to_vec();
    }
    tracing::warn!(
        missing = missing.len(),
        arenas = arenas.len(),
        "catalog lacks the standard rotation, queueing its own arenas"
    );
    arenas
}
