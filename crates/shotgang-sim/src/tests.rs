//! Tests for the match engine, round lifecycle, damage and level flow.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use shotgang_core::commands::{GamepadState, PlayerCommand};
use shotgang_core::components::*;
use shotgang_core::constants::*;
use shotgang_core::enums::*;
use shotgang_core::events::{AudioEvent, MatchEvent};
use shotgang_core::state::MatchSnapshot;
use shotgang_core::types::{Color, PlayerId, Vec2};
use shotgang_rules::levels::LevelQueue;

use crate::config::MatchConfig;
use crate::engine::MatchEngine;
use crate::level::{LevelCatalog, LevelLayout, StartAreaSpec, WallSpec};
use crate::systems::collision::{self, segment_aabb, segment_circle, Contact};
use crate::systems::contact::{self, ContactCtx};
use crate::systems::{cleanup, movement};
use crate::world_setup;

// ---- Fixtures ----

fn test_config() -> MatchConfig {
    MatchConfig {
        seed: 7,
        ..MatchConfig::default()
    }
}

fn shooting_template() -> PlayerTuning {
    PlayerTuning {
        shooting_enabled: true,
        ..PlayerTuning::default()
    }
}

fn spawn_points() -> Vec<Vec2> {
    vec![
        Vec2::new(200.0, 200.0),
        Vec2::new(1000.0, 200.0),
        Vec2::new(200.0, 800.0),
        Vec2::new(1000.0, 800.0),
    ]
}

fn arena(name: &str) -> LevelLayout {
    LevelLayout {
        name: name.to_string(),
        kind: SceneKind::Arena,
        background_color: Color::DARK,
        spawn_points: spawn_points(),
        walls: Vec::new(),
        start_area: None,
        template: Some(shooting_template()),
        volley_interval_ms: None,
    }
}

fn lobby() -> LevelLayout {
    LevelLayout {
        name: LOBBY_LEVEL.to_string(),
        kind: SceneKind::Lobby,
        background_color: Color::DARK,
        spawn_points: spawn_points(),
        walls: Vec::new(),
        start_area: Some(StartAreaSpec {
            center: Vec2::new(600.0, 500.0),
            size: Vec2::new(400.0, 400.0),
            ready_countdown_ms: READY_COUNTDOWN_MS,
        }),
        template: Some(shooting_template()),
        volley_interval_ms: None,
    }
}

fn test_catalog() -> LevelCatalog {
    let mut catalog = LevelCatalog::new();
    catalog.insert(lobby());
    catalog.insert(arena("arena_a"));
    catalog.insert(arena("arena_b"));
    catalog.insert(LevelLayout {
        template: Some(PlayerTuning::default()),
        volley_interval_ms: Some(1000),
        ..arena("arena_volley")
    });
    catalog.insert(LevelLayout {
        walls: vec![WallSpec::new(Vec2::new(600.0, 500.0), Vec2::new(100.0, 100.0)).spiked()],
        ..arena("arena_spikes")
    });
    catalog.insert(LevelLayout {
        template: None,
        ..arena("arena_closed")
    });
    catalog
}

/// Engine in the lobby with `levels` queued in order.
fn engine_with(levels: &[&str]) -> MatchEngine {
    let queue = LevelQueue::new(levels.iter().map(|l| l.to_string()).collect());
    MatchEngine::with_queue(test_config(), test_catalog(), queue)
}

/// Engine sitting in `level` with `count` freshly joined players.
fn arena_engine(level: &str, count: u32) -> MatchEngine {
    let mut engine = engine_with(&["arena_a", "arena_b"]);
    engine.load_level_now(level);
    for gamepad_id in 0..count {
        engine.queue_command(PlayerCommand::PressStart { gamepad_id });
    }
    engine.tick();
    engine
}

fn players(engine: &MatchEngine) -> Vec<Player> {
    let mut players: Vec<Player> = engine
        .world()
        .query::<&Player>()
        .iter()
        .map(|(_, p)| p.clone())
        .collect();
    players.sort_by_key(|p| p.id);
    players
}

fn player(engine: &MatchEngine, id: u32) -> Player {
    players(engine)
        .into_iter()
        .find(|p| p.id == PlayerId(id))
        .expect("player present")
}

fn body(engine: &MatchEngine, id: u32) -> Body {
    let mut query = engine.world().query::<(&Player, &Body)>();
    query
        .iter()
        .find(|(_, (p, _))| p.id == PlayerId(id))
        .map(|(_, (_, b))| *b)
        .expect("player body present")
}

fn place(engine: &mut MatchEngine, id: u32, position: Vec2) {
    for (_, (player, body)) in engine.world_mut().query_mut::<(&Player, &mut Body)>() {
        if player.id == PlayerId(id) {
            body.position = position;
            body.last_position = position;
        }
    }
}

fn set_pad(engine: &mut MatchEngine, gamepad_id: u32, state: GamepadState) {
    engine.queue_command(PlayerCommand::SetGamepad { gamepad_id, state });
}

fn aim_and_fire(right_stick: Vec2) -> GamepadState {
    GamepadState {
        left_stick: Vec2::ZERO,
        right_stick,
        right_trigger: 1.0,
    }
}

fn run(engine: &mut MatchEngine, ticks: usize) -> Vec<MatchSnapshot> {
    (0..ticks).map(|_| engine.tick()).collect()
}

fn skip_countdown(engine: &mut MatchEngine) {
    for _ in 0..500 {
        let started = engine
            .scene()
            .round
            .as_ref()
            .is_some_and(|r| r.phase != RoundPhase::Countdown);
        if started {
            return;
        }
        engine.tick();
    }
    panic!("round never started");
}

fn count_sounds(snapshots: &[MatchSnapshot], sound: Sound) -> usize {
    snapshots
        .iter()
        .flat_map(|s| s.audio_events.iter())
        .filter(|a| a.sound == sound)
        .count()
}

fn count_events(snapshots: &[MatchSnapshot], matches: impl Fn(&MatchEvent) -> bool) -> usize {
    snapshots
        .iter()
        .flat_map(|s| s.events.iter())
        .filter(|e| matches(e))
        .count()
}

/// Player 0 faces player 1 at point blank range and pulls the trigger.
fn shoot_down_player_one(engine: &mut MatchEngine) -> Vec<MatchSnapshot> {
    place(engine, 0, Vec2::new(400.0, 500.0));
    place(engine, 1, Vec2::new(520.0, 500.0));
    set_pad(engine, 0, aim_and_fire(Vec2::X));
    run(engine, 5)
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = MatchConfig {
        seed: 12345,
        ..MatchConfig::default()
    };
    let mut engine_a = MatchEngine::new(config.clone());
    let mut engine_b = MatchEngine::new(config);

    let commands = vec![
        PlayerCommand::PressStart { gamepad_id: 0 },
        PlayerCommand::PressStart { gamepad_id: 1 },
        PlayerCommand::SetGamepad {
            gamepad_id: 0,
            state: GamepadState {
                left_stick: Vec2::new(0.5, 0.3),
                right_stick: Vec2::X,
                right_trigger: 1.0,
            },
        },
    ];
    engine_a.queue_commands(commands.clone());
    engine_b.queue_commands(commands);

    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_different_seeds_shuffle_differently() {
    let a = MatchEngine::new(MatchConfig {
        seed: 111,
        ..MatchConfig::default()
    });
    let b = MatchEngine::new(MatchConfig {
        seed: 222,
        ..MatchConfig::default()
    });
    assert_ne!(a.context().level_queue.levels(), b.context().level_queue.levels());
    assert_eq!(a.context().level_queue.len(), LEVEL_NAMES.len() * LEVEL_REPEAT_COUNT);
}

#[test]
fn test_starts_in_lobby() {
    let mut engine = MatchEngine::new(test_config());
    let snapshot = engine.tick();
    assert_eq!(snapshot.scene.kind, SceneKind::Lobby);
    assert_eq!(snapshot.scene.level, LOBBY_LEVEL);
    assert!(snapshot.round.is_none());
    assert!(snapshot.start_area.is_some());
    assert_eq!(snapshot.queue.index, None);
    assert!(!snapshot.walls.is_empty());
}

// ---- Timing and pause ----

#[test]
fn test_tick_timing_fifty_ticks_one_second() {
    let mut engine = engine_with(&["arena_a"]);
    run(&mut engine, 50);
    assert_eq!(engine.time().tick, 50);
    assert_eq!(engine.time().elapsed_ms, 1000);
}

#[test]
fn test_pause_freezes_time_and_players() {
    let mut engine = arena_engine("arena_a", 1);
    skip_countdown(&mut engine);
    set_pad(
        &mut engine,
        0,
        GamepadState {
            left_stick: Vec2::X,
            ..GamepadState::default()
        },
    );
    run(&mut engine, 10);

    engine.queue_command(PlayerCommand::Pause);
    engine.tick();
    let time = engine.time();
    let position = body(&engine, 0).position;

    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 5 });
    let paused = run(&mut engine, 20);
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time(), time, "time must not advance while paused");
    assert_eq!(body(&engine, 0).position, position);
    assert!(paused.iter().all(|s| s.phase == GamePhase::Paused));

    engine.queue_command(PlayerCommand::Resume);
    run(&mut engine, 10);
    assert_eq!(engine.phase(), GamePhase::Running);
    assert_eq!(engine.time().tick, time.tick + 10);
    assert!(body(&engine, 0).position.x > position.x, "moving again");
    assert_eq!(players(&engine).len(), 1, "start press while paused is dropped");
}

// ---- Joining ----

#[test]
fn test_join_uses_roster_without_duplicates() {
    let mut engine = engine_with(&["arena_a"]);
    for gamepad_id in 0..7 {
        engine.queue_command(PlayerCommand::PressStart { gamepad_id });
    }
    let snapshot = engine.tick();

    let names: Vec<String> = players(&engine).into_iter().map(|p| p.name).collect();
    assert_eq!(names.len(), 7);
    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 7, "names must be unique: {names:?}");
    assert_eq!(names[6], "P6", "roster exhausted falls back to P<count>");
    assert_eq!(player(&engine, 6).color, Color::WHITE);

    let joined = count_events(&[snapshot], |e| matches!(e, MatchEvent::PlayerJoined { .. }));
    assert_eq!(joined, 7);
}

#[test]
fn test_same_gamepad_joins_once() {
    let mut engine = engine_with(&["arena_a"]);
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 3 });
    engine.tick();
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 3 });
    engine.tick();
    assert_eq!(players(&engine).len(), 1);
    assert_eq!(engine.scene().active_players, vec![PlayerId(0)]);
}

#[test]
fn test_join_ignored_without_template() {
    let engine = arena_engine("arena_closed", 2);
    assert!(players(&engine).is_empty());
    assert!(engine.scene().active_players.is_empty());
}

#[test]
fn test_join_spawns_far_from_existing_players() {
    let mut engine = engine_with(&["arena_a"]);
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 0 });
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 1 });
    engine.tick();
    assert_eq!(body(&engine, 0).position, Vec2::new(200.0, 200.0));
    assert_eq!(body(&engine, 1).position, Vec2::new(1000.0, 800.0));
}

#[test]
fn test_join_accepted_mid_round() {
    let mut engine = arena_engine("arena_a", 2);
    skip_countdown(&mut engine);
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 9 });
    engine.tick();
    assert_eq!(players(&engine).len(), 3);
}

// ---- Round lifecycle ----

#[test]
fn test_countdown_blocks_movement_and_cues_each_second() {
    let mut engine = arena_engine("arena_a", 2);
    let start = body(&engine, 0).position;
    set_pad(
        &mut engine,
        0,
        GamepadState {
            left_stick: Vec2::X,
            ..GamepadState::default()
        },
    );

    // First tick after the load already cued second 0.
    let ticks_to_go = (COUNTDOWN_MS / TICK_MS) as usize - 2;
    let countdown = run(&mut engine, ticks_to_go);
    assert_eq!(engine.scene().round.as_ref().unwrap().phase, RoundPhase::Countdown);
    assert_eq!(body(&engine, 0).position, start, "no movement before GO");
    assert_eq!(count_sounds(&countdown, Sound::CountdownDing0), 2);
    assert_eq!(countdown.last().unwrap().round.as_ref().unwrap().countdown_text.as_deref(), Some("1"));

    let go = run(&mut engine, 5);
    assert_eq!(engine.scene().round.as_ref().unwrap().phase, RoundPhase::Active);
    assert_eq!(count_sounds(&go, Sound::CountdownDing1), 1);
    assert_eq!(count_sounds(&go, Sound::CountdownDing0), 0);
    assert_eq!(count_events(&go, |e| *e == MatchEvent::RoundStarted), 1);
    assert_eq!(go.last().unwrap().round.as_ref().unwrap().countdown_text.as_deref(), Some("GO"));

    run(&mut engine, 10);
    assert!(body(&engine, 0).position.x > start.x, "moves after GO");
}

#[test]
fn test_kill_credited_once_and_win_awarded_once() {
    let mut engine = arena_engine("arena_a", 2);
    skip_countdown(&mut engine);

    let mut snapshots = shoot_down_player_one(&mut engine);
    let victim = player(&engine, 1);
    assert!(victim.is_dead());
    assert_eq!(victim.health, 0.0, "health pinned at zero");
    assert_eq!(body(&engine, 1).layer, NO_COLLISION_LAYER);
    assert_eq!(body(&engine, 1).body_type, BodyType::Static);
    assert_eq!(player(&engine, 0).kills, 1);

    // Pull the trigger again; the corpse no longer collides.
    set_pad(&mut engine, 0, GamepadState::default());
    snapshots.extend(run(&mut engine, 10));
    set_pad(&mut engine, 0, aim_and_fire(Vec2::X));
    snapshots.extend(run(&mut engine, 60));

    assert_eq!(player(&engine, 0).kills, 1);
    assert_eq!(count_sounds(&snapshots, Sound::Death), 1);
    assert_eq!(
        count_events(&snapshots, |e| *e
            == MatchEvent::PlayerKilled {
                victim: PlayerId(1),
                killer: Some(PlayerId(0)),
            }),
        1
    );

    // Past the grace window the survivor is credited exactly once.
    assert_eq!(player(&engine, 0).wins, 1);
    assert_eq!(player(&engine, 1).wins, 0);
    snapshots.extend(run(&mut engine, 50));
    assert_eq!(player(&engine, 0).wins, 1);
    assert_eq!(
        count_events(&snapshots, |e| matches!(e, MatchEvent::WinAwarded { .. })),
        1
    );

    let round = snapshots.last().unwrap().round.clone().unwrap();
    assert_eq!(round.phase, RoundPhase::RoundOver);
    assert!(round.game_over_alpha > 0.0);
    assert_eq!(round.standings[0].player, PlayerId(0));
    assert_eq!(round.banner.unwrap().text, format!("{} WINS!", player(&engine, 0).name));
}

#[test]
fn test_simultaneous_deaths_are_a_draw() {
    let mut engine = arena_engine("arena_a", 2);
    skip_countdown(&mut engine);
    for (_, player) in engine.world_mut().query_mut::<&mut Player>() {
        player.health = 0.0;
    }
    let snapshots = run(&mut engine, 60);

    assert_eq!(count_events(&snapshots, |e| *e == MatchEvent::RoundOver), 1);
    assert_eq!(count_events(&snapshots, |e| *e == MatchEvent::RoundDrawn), 1);
    assert_eq!(count_events(&snapshots, |e| matches!(e, MatchEvent::WinAwarded { .. })), 0);
    assert!(players(&engine).iter().all(|p| p.wins == 0));
    let banner = snapshots.last().unwrap().round.clone().unwrap().banner.unwrap();
    assert_eq!(banner.text, "DRAW");
}

#[test]
fn test_late_joiner_cannot_win_a_drawn_round() {
    let mut engine = arena_engine("arena_a", 2);
    skip_countdown(&mut engine);
    for (_, player) in engine.world_mut().query_mut::<&mut Player>() {
        player.health = 0.0;
    }
    let over = run(&mut engine, 2);
    assert_eq!(count_events(&over, |e| *e == MatchEvent::RoundOver), 1);

    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 9 });
    let snapshots = run(&mut engine, 60);

    let newcomer = player(&engine, 2);
    assert!(!newcomer.is_dead());
    assert_eq!(newcomer.wins, 0);
    assert_eq!(count_events(&snapshots, |e| matches!(e, MatchEvent::WinAwarded { .. })), 0);
    assert_eq!(count_events(&snapshots, |e| *e == MatchEvent::RoundDrawn), 1);
    let banner = snapshots.last().unwrap().round.clone().unwrap().banner.unwrap();
    assert_eq!(banner.text, "DRAW");
}

#[test]
fn test_solo_round_ends_when_player_dies() {
    let mut engine = arena_engine("arena_a", 1);
    skip_countdown(&mut engine);
    let alive = run(&mut engine, 50);
    assert_eq!(count_events(&alive, |e| *e == MatchEvent::RoundOver), 0);

    for (_, player) in engine.world_mut().query_mut::<&mut Player>() {
        player.health = 0.0;
    }
    let over = run(&mut engine, 2);
    assert_eq!(count_events(&over, |e| *e == MatchEvent::RoundOver), 1);
}

#[test]
fn test_own_pellets_never_hurt() {
    let mut engine = arena_engine("arena_a", 1);
    skip_countdown(&mut engine);
    let tuning = PlayerTuning {
        full_auto: true,
        ..shooting_template()
    };
    for (_, t) in engine.world_mut().query_mut::<&mut PlayerTuning>() {
        *t = tuning.clone();
    }
    set_pad(
        &mut engine,
        0,
        GamepadState {
            left_stick: Vec2::new(-1.0, 0.0),
            right_stick: Vec2::X,
            right_trigger: 1.0,
        },
    );
    let snapshots = run(&mut engine, 100);
    assert!(count_sounds(&snapshots, Sound::Shotgun) > 5);
    assert_eq!(player(&engine, 0).health, FULL_HEALTH);
}

#[test]
fn test_lobby_hits_bleed_without_damage() {
    let mut engine = engine_with(&["arena_a"]);
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 0 });
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 1 });
    engine.tick();
    place(&mut engine, 0, Vec2::new(400.0, 150.0));
    place(&mut engine, 1, Vec2::new(520.0, 150.0));
    set_pad(&mut engine, 0, aim_and_fire(Vec2::X));
    let snapshots = run(&mut engine, 3);

    assert_eq!(player(&engine, 1).health, FULL_HEALTH);
    assert_eq!(player(&engine, 0).kills, 0);
    let decals = snapshots
        .last()
        .unwrap()
        .effects
        .iter()
        .filter(|e| e.kind == EffectKind::Decal)
        .count();
    assert!(decals > 0, "hits still leave blood");
}

#[test]
fn test_spike_wall_kills_without_credit() {
    let mut engine = arena_engine("arena_spikes", 2);
    place(&mut engine, 0, Vec2::new(600.0, 560.0));
    place(&mut engine, 1, Vec2::new(1000.0, 800.0));
    let snapshots = run(&mut engine, 20);

    assert!(player(&engine, 0).is_dead());
    assert!(players(&engine).iter().all(|p| p.kills == 0));
    assert_eq!(count_sounds(&snapshots, Sound::Death), 1);
    assert_eq!(
        count_events(&snapshots, |e| *e
            == MatchEvent::PlayerKilled {
                victim: PlayerId(0),
                killer: None,
            }),
        1
    );
}

#[test]
fn test_players_blocked_by_walls() {
    let mut engine = engine_with(&["arena_a"]);
    engine.load_level_now("arena_a");
    let wall = WallSpec::new(Vec2::new(500.0, 500.0), Vec2::new(100.0, 400.0)).to_wall();
    engine.world_mut().spawn((wall,));
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 0 });
    engine.tick();
    skip_countdown(&mut engine);
    place(&mut engine, 0, Vec2::new(400.0, 500.0));
    set_pad(
        &mut engine,
        0,
        GamepadState {
            left_stick: Vec2::X,
            ..GamepadState::default()
        },
    );
    run(&mut engine, 150);
    let p = body(&engine, 0);
    assert!(p.position.x <= 450.0 - p.radius + 0.5, "stopped at the wall, x = {}", p.position.x);
}

// ---- Level flow ----

#[test]
fn test_transfer_preserves_scores_and_restores_health() {
    let mut engine = engine_with(&["arena_a", "arena_b"]);
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 0 });
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 1 });
    engine.tick();
    let names: Vec<String> = players(&engine).into_iter().map(|p| p.name).collect();

    assert!(engine.transition_to_next_level());
    assert!(!engine.transition_to_next_level(), "one transition at a time");
    let fade = run(&mut engine, 30);
    assert!(fade.iter().any(|s| s.scene.transition_alpha > 0.0));
    assert_eq!(engine.scene().level, "arena_a");
    assert_eq!(engine.context().level_queue.index(), Some(0));
    assert!(engine.context().transfers.is_empty());
    assert_eq!(players(&engine).len(), 2);

    skip_countdown(&mut engine);
    shoot_down_player_one(&mut engine);
    assert!(player(&engine, 1).is_dead());

    let total_ms = ROUND_GRACE_MS + GAME_OVER_FADE_MS + NEXT_LEVEL_HOLD_MS + LEVEL_FADE_MS + 500;
    let snapshots = run(&mut engine, (total_ms / TICK_MS) as usize);
    assert_eq!(engine.scene().level, "arena_b");
    assert_eq!(
        count_events(&snapshots, |e| matches!(e, MatchEvent::LevelTransitionStarted { .. })),
        1
    );

    let carried = players(&engine);
    assert_eq!(carried.len(), 2);
    assert_eq!(carried.iter().map(|p| p.name.clone()).collect::<Vec<_>>(), names);
    assert!(carried.iter().all(|p| p.health == FULL_HEALTH));
    assert_eq!(carried[0].wins, 1);
    assert_eq!(carried[0].kills, 1);
    assert_eq!(carried[1].wins, 0);
    assert_eq!(body(&engine, 1).layer, PLAYER_LAYER);
    assert_eq!(body(&engine, 1).body_type, BodyType::Dynamic);
    assert_ne!(body(&engine, 0).position, body(&engine, 1).position);
}

#[test]
fn test_last_level_is_terminal() {
    let mut engine = engine_with(&["arena_a"]);
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 0 });
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 1 });
    engine.tick();
    assert!(engine.transition_to_next_level());
    run(&mut engine, 30);
    assert_eq!(engine.scene().level, "arena_a");
    assert!(engine.context().is_last_level());

    skip_countdown(&mut engine);
    let mut snapshots = shoot_down_player_one(&mut engine);
    snapshots.extend(run(&mut engine, 400));

    assert_eq!(engine.scene().level, "arena_a", "no transition after the last level");
    assert_eq!(engine.scene().round.as_ref().unwrap().phase, RoundPhase::Terminal);
    assert_eq!(count_events(&snapshots, |e| *e == MatchEvent::MatchFinished), 1);
    assert_eq!(
        count_events(&snapshots, |e| matches!(e, MatchEvent::LevelTransitionStarted { .. })),
        0
    );

    let round = snapshots.last().unwrap().round.clone().unwrap();
    assert!(round.show_final_winner);
    assert_eq!(round.banner.unwrap().color, Color::GOLD);
    assert!(snapshots.last().unwrap().queue.is_last);

    assert!(!engine.transition_to_next_level());
    assert_eq!(engine.context().level_queue.index(), Some(0));
}

#[test]
fn test_exhausted_queue_transition_is_noop() {
    let mut engine = engine_with(&[]);
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 0 });
    engine.tick();
    assert!(!engine.transition_to_next_level());
    run(&mut engine, 40);
    assert_eq!(engine.scene().kind, SceneKind::Lobby);
    assert!(engine.context().transfers.is_empty());
    assert_eq!(engine.context().level_queue.index(), None);
}

#[test]
fn test_lobby_start_area_transitions_once() {
    let mut engine = engine_with(&["arena_a", "arena_b"]);
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 0 });
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 1 });
    engine.tick();

    place(&mut engine, 0, Vec2::new(550.0, 500.0));
    let outside = run(&mut engine, 5);
    let area = outside.last().unwrap().start_area.clone().unwrap();
    assert_eq!(area.players_ready, 1);
    assert_eq!(area.players_total, 2);
    assert_eq!(area.countdown, None, "one player outside, no countdown");

    place(&mut engine, 1, Vec2::new(650.0, 500.0));
    let ready = run(&mut engine, 160);
    assert_eq!(ready[0].start_area.as_ref().unwrap().countdown, Some(3));
    assert_eq!(count_sounds(&ready, Sound::CountdownDing0), 3);
    assert_eq!(count_sounds(&ready, Sound::CountdownDing1), 1);
    assert_eq!(
        count_events(&ready, |e| matches!(e, MatchEvent::LevelTransitionStarted { .. })),
        1
    );

    run(&mut engine, 30);
    assert_eq!(engine.scene().kind, SceneKind::Arena);
    assert_eq!(engine.scene().level, "arena_a");
    assert_eq!(players(&engine).len(), 2);
}

#[test]
fn test_leaving_start_area_cancels_countdown() {
    let mut engine = engine_with(&["arena_a"]);
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 0 });
    engine.tick();
    place(&mut engine, 0, Vec2::new(600.0, 500.0));
    let inside = run(&mut engine, 60);
    assert_eq!(inside.last().unwrap().start_area.as_ref().unwrap().countdown, Some(2));

    place(&mut engine, 0, Vec2::new(100.0, 100.0));
    let outside = run(&mut engine, 200);
    assert_eq!(outside.last().unwrap().start_area.as_ref().unwrap().countdown, None);
    assert_eq!(engine.scene().kind, SceneKind::Lobby);
}

#[test]
fn test_missing_level_loads_empty() {
    let mut engine = engine_with(&["arena_a"]);
    engine.load_level_now("levels/nowhere.scn");
    engine.queue_command(PlayerCommand::PressStart { gamepad_id: 0 });
    let snapshot = engine.tick();
    assert_eq!(snapshot.scene.kind, SceneKind::Arena);
    assert!(snapshot.walls.is_empty());
    assert!(snapshot.players.is_empty(), "no template, no joins");
}

// ---- Volley ----

#[test]
fn test_forced_volley_fires_on_interval() {
    let mut engine = arena_engine("arena_volley", 2);
    let load_ms = engine.time().elapsed_ms - TICK_MS;
    place(&mut engine, 0, Vec2::new(200.0, 200.0));
    place(&mut engine, 1, Vec2::new(200.0, 800.0));

    // Trigger alone does nothing: shooting is disabled in this level.
    set_pad(&mut engine, 0, aim_and_fire(Vec2::X));
    let until_first = ((load_ms + COUNTDOWN_MS + 1100) - engine.time().elapsed_ms) / TICK_MS;
    let first = run(&mut engine, until_first as usize);
    assert_eq!(count_sounds(&first, Sound::Shotgun), 2, "one volley, both players");

    let progress = first.last().unwrap().volley.as_ref().unwrap().progress;
    assert!(progress < 0.2, "timer reset after the volley, got {progress}");

    let second = run(&mut engine, 50);
    assert_eq!(count_sounds(&second, Sound::Shotgun), 2);
}

#[test]
fn test_no_volley_before_round_starts() {
    let mut engine = arena_engine("arena_volley", 2);
    let snapshots = run(&mut engine, 100);
    assert_eq!(count_sounds(&snapshots, Sound::Shotgun), 0);
    assert!(snapshots.iter().all(|s| s.volley.is_none()));
}

// ---- Contact resolution ----

fn make_player(id: u32) -> Player {
    Player {
        id: PlayerId(id),
        name: format!("P{id}"),
        gamepad_id: id,
        color: Color::WHITE,
        health: FULL_HEALTH,
        kills: 0,
        wins: 0,
    }
}

struct Resolved {
    audio: Vec<AudioEvent>,
    events: Vec<MatchEvent>,
    despawned: Vec<Entity>,
}

fn resolve(world: &mut World, contacts: &[Contact], takes_damage: bool) -> Resolved {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut audio = Vec::new();
    let mut events = Vec::new();
    let mut despawned = Vec::new();
    contact::run(
        world,
        contacts,
        &mut ContactCtx {
            now_ms: 0,
            takes_damage,
            damage_coefficient: DAMAGE_COEFFICIENT,
            rng: &mut rng,
            audio_events: &mut audio,
            events: &mut events,
            despawn_buffer: &mut despawned,
        },
    );
    Resolved {
        audio,
        events,
        despawned,
    }
}

fn hit(bullet: Entity, player: Entity) -> Contact {
    Contact::BulletPlayer {
        bullet,
        player,
        point: Vec2::ZERO,
        normal: Vec2::X,
    }
}

#[test]
fn test_resolver_ignores_own_bullet() {
    let mut world = World::new();
    let tuning = PlayerTuning::default();
    let shooter = world_setup::spawn_player(&mut world, make_player(0), tuning, Vec2::ZERO, 0.0);
    let bullet = world_setup::spawn_bullet(&mut world, PlayerId(0), Vec2::ZERO, 0.0, 100.0, 10.0, 0);

    let resolved = resolve(&mut world, &[hit(bullet, shooter)], true);
    assert_eq!(world.get::<&Player>(shooter).unwrap().health, FULL_HEALTH);
    assert!(resolved.despawned.is_empty(), "own pellet is not consumed");
    assert!(resolved.events.is_empty());
}

#[test]
fn test_resolver_kills_once_on_repeated_hits() {
    let mut world = World::new();
    let tuning = PlayerTuning::default();
    let shooter = world_setup::spawn_player(&mut world, make_player(0), tuning.clone(), Vec2::ZERO, 0.0);
    let target = world_setup::spawn_player(&mut world, make_player(1), tuning, Vec2::X * 100.0, 0.0);
    let bullets: Vec<Entity> = (0..4)
        .map(|_| world_setup::spawn_bullet(&mut world, PlayerId(0), Vec2::X * 80.0, 0.0, 100.0, 10.0, 0))
        .collect();
    let contacts: Vec<Contact> = bullets.iter().map(|b| hit(*b, target)).collect();

    let resolved = resolve(&mut world, &contacts, true);
    assert_eq!(world.get::<&Player>(target).unwrap().health, 0.0);
    assert_eq!(world.get::<&Player>(shooter).unwrap().kills, 1);
    assert_eq!(resolved.audio.iter().filter(|a| a.sound == Sound::Death).count(), 1);
    assert_eq!(resolved.despawned.len(), 4, "every pellet that struck is consumed");

    // A second batch of hits on the corpse changes nothing.
    let late = world_setup::spawn_bullet(&mut world, PlayerId(0), Vec2::X * 80.0, 0.0, 100.0, 10.0, 0);
    let resolved = resolve(&mut world, &[hit(late, target)], true);
    assert_eq!(world.get::<&Player>(shooter).unwrap().kills, 1);
    assert!(resolved.audio.iter().all(|a| a.sound != Sound::Death));
}

#[test]
fn test_resolver_damage_falls_off() {
    let mut world = World::new();
    let target = world_setup::spawn_player(&mut world, make_player(1), PlayerTuning::default(), Vec2::ZERO, 0.0);
    // 0.3 * 10 * 10 * (1 - 0) = 30
    let bullet = world_setup::spawn_bullet(&mut world, PlayerId(0), Vec2::ZERO, 0.0, 10.0, 10.0, 0);
    resolve(&mut world, &[hit(bullet, target)], true);
    let health = world.get::<&Player>(target).unwrap().health;
    assert!((health - 70.0).abs() < 1e-3, "health {health}");
}

#[test]
fn test_resolver_without_damage_still_consumes() {
    let mut world = World::new();
    let target = world_setup::spawn_player(&mut world, make_player(1), PlayerTuning::default(), Vec2::ZERO, 0.0);
    let bullet = world_setup::spawn_bullet(&mut world, PlayerId(0), Vec2::ZERO, 0.0, 100.0, 10.0, 0);
    let effects_before = world.query::<&Effect>().iter().count();
    let resolved = resolve(&mut world, &[hit(bullet, target)], false);
    assert_eq!(world.get::<&Player>(target).unwrap().health, FULL_HEALTH);
    assert_eq!(resolved.despawned, vec![bullet]);
    assert!(world.query::<&Effect>().iter().count() > effects_before);
}

#[test]
fn test_resolver_missing_killer_is_harmless() {
    let mut world = World::new();
    let target = world_setup::spawn_player(&mut world, make_player(1), PlayerTuning::default(), Vec2::ZERO, 0.0);
    let bullet = world_setup::spawn_bullet(&mut world, PlayerId(42), Vec2::ZERO, 0.0, 100.0, 10.0, 0);
    let resolved = resolve(&mut world, &[hit(bullet, target)], true);
    assert!(world.get::<&Player>(target).unwrap().is_dead());
    assert_eq!(
        resolved.events,
        vec![MatchEvent::PlayerKilled {
            victim: PlayerId(1),
            killer: Some(PlayerId(42)),
        }]
    );
}

// ---- Collision ----

#[test]
fn test_segment_circle() {
    let (t, normal) = segment_circle(Vec2::ZERO, Vec2::new(100.0, 0.0), Vec2::new(50.0, 0.0), 10.0).unwrap();
    assert!((t - 0.4).abs() < 1e-5);
    assert!((normal - Vec2::new(-1.0, 0.0)).length() < 1e-5);
    assert!(segment_circle(Vec2::ZERO, Vec2::new(100.0, 0.0), Vec2::new(50.0, 30.0), 10.0).is_none());
    assert!(segment_circle(Vec2::ZERO, Vec2::new(30.0, 0.0), Vec2::new(50.0, 0.0), 10.0).is_none());
}

#[test]
fn test_segment_aabb() {
    let (t, normal) = segment_aabb(
        Vec2::ZERO,
        Vec2::new(0.0, 100.0),
        Vec2::new(-10.0, 40.0),
        Vec2::new(10.0, 60.0),
    )
    .unwrap();
    assert!((t - 0.4).abs() < 1e-5);
    assert_eq!(normal, Vec2::new(0.0, -1.0));
    assert!(segment_aabb(Vec2::ZERO, Vec2::new(0.0, 100.0), Vec2::new(20.0, 40.0), Vec2::new(30.0, 60.0)).is_none());
}

#[test]
fn test_bullet_passes_through_spawner() {
    let mut world = World::new();
    world_setup::spawn_player(&mut world, make_player(0), PlayerTuning::default(), Vec2::ZERO, 0.0);
    world_setup::spawn_bullet(&mut world, PlayerId(0), Vec2::new(40.0, 0.0), 0.0, 100.0, 10.0, 0);
    assert!(collision::run(&mut world).is_empty());
}

#[test]
fn test_first_obstacle_consumes_bullet() {
    let mut world = World::new();
    let wall = WallSpec::new(Vec2::new(30.0, 0.0), Vec2::new(10.0, 100.0)).to_wall();
    world.spawn((wall,));
    world_setup::spawn_player(&mut world, make_player(1), PlayerTuning::default(), Vec2::new(80.0, 0.0), 0.0);
    let bullet = world_setup::spawn_bullet(&mut world, PlayerId(0), Vec2::ZERO, 0.0, 100.0, 10.0, 0);
    movement::run(&mut world);

    let contacts = collision::run(&mut world);
    let bullet_contacts: Vec<&Contact> = contacts
        .iter()
        .filter(|c| matches!(c, Contact::BulletWall { .. } | Contact::BulletPlayer { .. }))
        .collect();
    assert_eq!(bullet_contacts.len(), 1);
    assert!(matches!(bullet_contacts[0], Contact::BulletWall { bullet: b, .. } if *b == bullet));
}

#[test]
fn test_verlet_drag_and_acceleration() {
    let mut body = Body::launched(Vec2::ZERO, 0.0, 10.0);
    body.drag = 0.5;
    movement::integrate(&mut body);
    assert!((body.position.x - 5.0).abs() < 1e-5);
    assert!((body.velocity().x - 5.0).abs() < 1e-5);

    let mut resting = Body::at(Vec2::ZERO);
    resting.acceleration = Vec2::new(2500.0, 0.0);
    movement::integrate(&mut resting);
    assert!((resting.position.x - 1.0).abs() < 1e-5, "a * dt^2 = 2500 / 2500");
    assert_eq!(resting.acceleration, Vec2::ZERO);
}

#[test]
fn test_expired_bullets_are_cleaned_up() {
    let mut world = World::new();
    world_setup::spawn_bullet(&mut world, PlayerId(0), Vec2::ZERO, 0.0, 100.0, 10.0, 0);
    let mut buffer = Vec::new();
    cleanup::run(&mut world, BULLET_MAX_LIFETIME_MS, &mut buffer);
    assert_eq!(world.query::<&Projectile>().iter().count(), 1);
    cleanup::run(&mut world, BULLET_MAX_LIFETIME_MS + TICK_MS, &mut buffer);
    assert_eq!(world.query::<&Projectile>().iter().count(), 0);
}

// ---- Level catalog ----

#[test]
fn test_builtin_catalog_has_every_level() {
    let catalog = LevelCatalog::builtin(&PlayerTuning::default());
    assert_eq!(catalog.len(), LEVEL_NAMES.len() + 1);
    let lobby = catalog.get(LOBBY_LEVEL);
    assert_eq!(lobby.kind, SceneKind::Lobby);
    assert!(lobby.start_area.is_some());
    for name in LEVEL_NAMES {
        let layout = catalog.get(name);
        assert_eq!(layout.kind, SceneKind::Arena);
        assert!(layout.template.is_some());
        assert!(!layout.spawn_points.is_empty());
    }
}

#[test]
fn test_catalog_from_dir() {
    let dir = std::env::temp_dir().join(format!("shotgang-levels-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let json = serde_json::to_string(&arena("levels/custom.scn")).unwrap();
    std::fs::write(dir.join("custom.json"), json).unwrap();
    std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let catalog = LevelCatalog::from_dir(&dir).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.contains("levels/custom.scn"));

    std::fs::write(dir.join("broken.json"), "{").unwrap();
    assert!(LevelCatalog::from_dir(&dir).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_queue_follows_catalog_arenas() {
    let mut catalog = LevelCatalog::new();
    catalog.insert(lobby());
    catalog.insert(arena("levels/custom_a.scn"));
    catalog.insert(arena("levels/custom_b.scn"));
    assert_eq!(catalog.arena_names(), vec!["levels/custom_a.scn", "levels/custom_b.scn"]);

    let config = test_config();
    let repeats = config.level_repeat_count;
    let engine = MatchEngine::with_catalog(config, catalog);
    let queued = engine.context().level_queue.levels();
    assert_eq!(queued.len(), 2 * repeats);
    assert!(queued.iter().all(|name| name.starts_with("levels/custom_")));

    let builtin = MatchEngine::new(test_config());
    let queued = builtin.context().level_queue.levels();
    assert_eq!(queued.len(), LEVEL_NAMES.len() * repeats);
    assert!(queued.iter().all(|name| LEVEL_NAMES.contains(&name.as_str())));
}

#[test]
fn test_minimal_layout_json() {
    let layout: LevelLayout =
        serde_json::from_str(r#"{"name": "levels/bare.scn", "kind": "Arena", "spawn_points": [[10.0, 20.0]]}"#)
            .unwrap();
    assert_eq!(layout.spawn_points, vec![Vec2::new(10.0, 20.0)]);
    assert!(layout.template.is_none());
    assert!(layout.walls.is_empty());
}
