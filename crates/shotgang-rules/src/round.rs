//! Round lifecycle finite state machine.
//!
//! `Countdown -> Active -> RoundOver -> (Transition | Terminal)`.
//! All waiting is polled: the caller passes the current simulation time
//! every tick and the machine compares it against its recorded timestamps.

use shotgang_core::constants::*;
use shotgang_core::enums::RoundPhase;

/// Durations driving the round, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTimings {
    pub countdown_ms: u64,
    pub grace_ms: u64,
    pub fade_ms: u64,
    pub hold_ms: u64,
}

impl Default for RoundTimings {
    fn default() -> Self {
        Self {
            countdown_ms: COUNTDOWN_MS,
            grace_ms: ROUND_GRACE_MS,
            fade_ms: GAME_OVER_FADE_MS,
            hold_ms: NEXT_LEVEL_HOLD_MS,
        }
    }
}

/// Per-tick observation of the scene.
#[derive(Debug, Clone, Copy)]
pub struct RoundInput {
    pub now_ms: u64,
    pub total_players: usize,
    pub alive_players: usize,
    /// No further level can be queued after this one.
    pub is_last_level: bool,
}

/// Side effects the caller must carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAction {
    /// Whole-second countdown boundary. `go` marks the final cue.
    CountdownCue { go: bool },
    RoundStarted,
    RoundOver,
    /// Credit one win to the only living player.
    AwardWin,
    /// Grace window passed without a sole survivor.
    Draw,
    RequestTransition,
    MatchFinished,
}

/// Mutable round state, one per arena level.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub started_at_ms: u64,
    pub game_over_at_ms: Option<u64>,
    pub score_applied: bool,
    pub transition_requested: bool,
    last_countdown_second: Option<u64>,
}

impl RoundState {
    /// A new round whose countdown starts at `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            phase: RoundPhase::Countdown,
            started_at_ms: now_ms,
            game_over_at_ms: None,
            score_applied: false,
            transition_requested: false,
            last_countdown_second: None,
        }
    }

    /// Players may move and shoot.
    pub fn has_started(&self) -> bool {
        self.phase != RoundPhase::Countdown
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over_at_ms.is_some()
    }

    /// Milliseconds since the elimination condition was met.
    pub fn elapsed_since_game_over(&self, now_ms: u64) -> Option<u64> {
        self.game_over_at_ms.map(|t| now_ms.saturating_sub(t))
    }

    /// Advance the machine by one tick.
    pub fn step(&mut self, timings: &RoundTimings, input: &RoundInput) -> Vec<RoundAction> {
        let mut actions = Vec::new();

        match self.phase {
            RoundPhase::Countdown => self.step_countdown(timings, input, &mut actions),
            RoundPhase::Active => self.step_active(input, &mut actions),
            RoundPhase::RoundOver => self.step_round_over(timings, input, &mut actions),
            RoundPhase::Transition | RoundPhase::Terminal => {}
        }

        actions
    }

    fn step_countdown(
        &mut self,
        timings: &RoundTimings,
        input: &RoundInput,
        actions: &mut Vec<RoundAction>,
    ) {
        let elapsed = input.now_ms.saturating_sub(self.started_at_ms);
        let second = elapsed / 1000;
        let finished = elapsed >= timings.countdown_ms;

        if self.last_countdown_second != Some(second) {
            actions.push(RoundAction::CountdownCue { go: finished });
            self.last_countdown_second = Some(second);
        }

        if finished {
            self.phase = RoundPhase::Active;
            actions.push(RoundAction::RoundStarted);
        }
    }

    fn step_active(&mut self, input: &RoundInput, actions: &mut Vec<RoundAction>) {
        if is_eliminated(input.total_players, input.alive_players) {
            self.phase = RoundPhase::RoundOver;
            self.game_over_at_ms = Some(input.now_ms);
            actions.push(RoundAction::RoundOver);
        }
    }

    fn step_round_over(
        &mut self,
        timings: &RoundTimings,
        input: &RoundInput,
        actions: &mut Vec<RoundAction>,
    ) {
        let Some(elapsed) = self.elapsed_since_game_over(input.now_ms) else {
            return;
        };

        if !self.score_applied && elapsed > timings.grace_ms {
            self.score_applied = true;
            if input.alive_players == 1 {
                actions.push(RoundAction::AwardWin);
            } else {
                actions.push(RoundAction::Draw);
            }
        }

        // The round is scored before it is left, however short fade and hold are.
        if self.score_applied
            && !self.transition_requested
            && elapsed > timings.fade_ms + timings.hold_ms
        {
            if input.is_last_level {
                self.phase = RoundPhase::Terminal;
                actions.push(RoundAction::MatchFinished);
            } else {
                self.transition_requested = true;
                self.phase = RoundPhase::Transition;
                actions.push(RoundAction::RequestTransition);
            }
        }
    }
}

/// Elimination end condition: a multiplayer round ends with fewer than two
/// players standing, a solo round when the lone player dies.
pub fn is_eliminated(total_players: usize, alive_players: usize) -> bool {
    (total_players > 1 && alive_players < 2) || (total_players == 1 && alive_players == 0)
}

/// Overlay countdown text: whole seconds left, then "GO" for `GO_DISPLAY_MS`.
pub fn countdown_text(timings: &RoundTimings, elapsed_ms: u64) -> Option<String> {
    if elapsed_ms >= timings.countdown_ms + GO_DISPLAY_MS {
        return None;
    }
    if elapsed_ms >= timings.countdown_ms {
        return Some("GO".to_string());
    }
    let seconds_left = (timings.countdown_ms / 1000).saturating_sub(elapsed_ms / 1000);
    Some(seconds_left.to_string())
}

/// Results-screen fade alpha, 0..1.
pub fn game_over_alpha(timings: &RoundTimings, elapsed_ms: u64) -> f32 {
    if timings.fade_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f32 / timings.fade_ms as f32).clamp(0.0, 1.0)
}
