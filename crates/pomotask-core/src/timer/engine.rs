//! Timer cycle engine.
//!
//! A tick-driven state machine. It owns no clock and no threads: the host
//! calls `tick()` once per elapsed second while the engine is running (see
//! [`Ticker`](super::Ticker)).
//!
//! ## Cycle
//!
//! ```text
//! Focus -> ShortBreak -> Focus -> ... -> Focus -> LongBreak -> Focus (session 1)
//! ```
//!
//! The engine stops itself at every phase boundary; whether the next phase
//! starts right away is the host's decision.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerConfig::default());
//! engine.start();
//! // once per second:
//! if let Some(Event::PhaseCompleted { alert, .. }) = engine.tick() { /* announce */ }
//! ```

use chrono::Utc;
use tracing::debug;

use super::phase::{Phase, TimerConfig};
use crate::events::Event;

/// Core timer engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    pub(super) config: TimerConfig,
    pub(super) phase: Phase,
    pub(super) seconds_remaining: u32,
    /// Duration of the current phase, for progress display.
    pub(super) total_seconds: u32,
    pub(super) session_index: u32,
    pub(super) is_running: bool,
}

impl TimerEngine {
    /// Create an idle engine at the start of a focus phase, session 1.
    pub fn new(config: TimerConfig) -> Self {
        let total = config.seconds_for(Phase::Focus);
        Self {
            config,
            phase: Phase::Focus,
            seconds_remaining: total,
            total_seconds: total,
            session_index: 1,
            is_running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn session_index(&self) -> u32 {
        self.session_index
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        1.0 - (f64::from(self.seconds_remaining) / f64::from(self.total_seconds))
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            total_seconds: self.total_seconds,
            session_index: self.session_index,
            sessions_before_long_break: self.config.sessions_before_long_break,
            is_running: self.is_running,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.is_running {
            return None;
        }
        self.is_running = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Pause. The remaining time is kept as is.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        Some(Event::TimerStopped {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Event {
        self.is_running = false;
        self.phase = Phase::Focus;
        self.session_index = 1;
        self.total_seconds = self.config.seconds_for(Phase::Focus);
        self.seconds_remaining = self.total_seconds;
        Event::TimerReset { at: Utc::now() }
    }

    /// Consume one elapsed second. Ignored while stopped.
    ///
    /// Returns `Some(Event::PhaseCompleted)` when the phase runs out; the
    /// engine is stopped at that point.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        if self.seconds_remaining > 1 {
            self.seconds_remaining -= 1;
            return None;
        }
        Some(self.complete_phase())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Event {
        let from = self.phase;
        let completed_secs = self.total_seconds;
        let last_session = self.session_index >= self.config.sessions_before_long_break;

        let to = match from {
            Phase::ShortBreak => {
                self.session_index = (self.session_index + 1)
                    .min(self.config.sessions_before_long_break.max(1));
                Phase::Focus
            }
            Phase::LongBreak => {
                self.session_index = 1;
                Phase::Focus
            }
            Phase::Focus if last_session => Phase::LongBreak,
            Phase::Focus => Phase::ShortBreak,
        };

        self.phase = to;
        self.total_seconds = self.config.seconds_for(to);
        self.seconds_remaining = self.total_seconds;
        self.is_running = false;

        debug!(
            from = %from,
            to = %to,
            session = self.session_index,
            "phase completed"
        );

        Event::PhaseCompleted {
            from,
            to,
            completed_secs,
            session_index: self.session_index,
            alert: to.entry_alert(),
            at: Utc::now(),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(focus: u32, short: u32, long: u32, sessions: u32) -> TimerConfig {
        TimerConfig {
            focus_minutes: focus,
            short_break_minutes: short,
            long_break_minutes: long,
            sessions_before_long_break: sessions,
        }
    }

    /// Start and tick until the phase boundary, returning the completion event.
    fn run_phase(engine: &mut TimerEngine) -> Event {
        engine.start();
        loop {
            if let Some(event) = engine.tick() {
                return event;
            }
        }
    }

    fn alert_title(event: &Event) -> String {
        match event {
            Event::PhaseCompleted { alert, .. } => alert.title.clone(),
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
    }

    #[test]
    fn new_engine_is_idle_focus_session_one() {
        let engine = TimerEngine::default();
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.session_index(), 1);
        assert_eq!(engine.seconds_remaining(), 25 * 60);
        assert_eq!(engine.total_seconds(), 25 * 60);
        assert!(!engine.is_running());
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut engine = TimerEngine::default();
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
        assert!(engine.is_running());

        assert!(engine.stop().is_some());
        assert!(engine.stop().is_none());
        assert!(!engine.is_running());
    }

    #[test]
    fn tick_decrements_while_running() {
        let mut engine = TimerEngine::default();
        engine.start();
        assert!(engine.tick().is_none());
        assert!(engine.tick().is_none());
        assert_eq!(engine.seconds_remaining(), 25 * 60 - 2);
    }

    #[test]
    fn stop_preserves_remaining_and_ignores_ticks() {
        let mut engine = TimerEngine::default();
        engine.start();
        for _ in 0..10 {
            engine.tick();
        }
        engine.stop();
        let remaining = engine.seconds_remaining();
        for _ in 0..100 {
            assert!(engine.tick().is_none());
        }
        assert_eq!(engine.seconds_remaining(), remaining);
    }

    #[test]
    fn focus_ticks_yield_one_break_transition() {
        let mut engine = TimerEngine::new(config(1, 1, 2, 4));
        engine.start();
        let mut events = Vec::new();
        for _ in 0..60 {
            if let Some(e) = engine.tick() {
                events.push(e);
            }
        }
        assert_eq!(events.len(), 1);
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.session_index(), 1);
        assert!(!engine.is_running());
        assert_eq!(engine.seconds_remaining(), 60);
    }

    #[test]
    fn documented_cycle_with_two_sessions() {
        let mut engine = TimerEngine::new(config(25, 5, 15, 2));

        let e = run_phase(&mut engine);
        assert_eq!(alert_title(&e), "Break Time!");
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.total_seconds(), 5 * 60);
        assert_eq!(engine.session_index(), 1);

        let e = run_phase(&mut engine);
        assert_eq!(alert_title(&e), "Focus Time!");
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.session_index(), 2);

        let e = run_phase(&mut engine);
        assert_eq!(alert_title(&e), "Long Break!");
        assert_eq!(engine.phase(), Phase::LongBreak);
        assert_eq!(engine.total_seconds(), 15 * 60);

        let e = run_phase(&mut engine);
        assert_eq!(alert_title(&e), "Focus Time!");
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.session_index(), 1);
        assert_eq!(engine.seconds_remaining(), 25 * 60);
    }

    #[test]
    fn single_session_cycle_always_takes_long_break() {
        let mut engine = TimerEngine::new(config(1, 1, 3, 1));
        for _ in 0..3 {
            run_phase(&mut engine);
            assert_eq!(engine.phase(), Phase::LongBreak);
            run_phase(&mut engine);
            assert_eq!(engine.phase(), Phase::Focus);
            assert_eq!(engine.session_index(), 1);
        }
    }

    #[test]
    fn completion_event_reports_finished_phase() {
        let mut engine = TimerEngine::new(config(2, 1, 1, 3));
        match run_phase(&mut engine) {
            Event::PhaseCompleted {
                from,
                to,
                completed_secs,
                session_index,
                ..
            } => {
                assert_eq!(from, Phase::Focus);
                assert_eq!(to, Phase::ShortBreak);
                assert_eq!(completed_secs, 120);
                assert_eq!(session_index, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn reset_restores_initial_state_from_anywhere() {
        let mut engine = TimerEngine::new(config(1, 1, 1, 2));
        run_phase(&mut engine);
        run_phase(&mut engine);
        engine.start();
        engine.tick();

        engine.reset();
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.session_index(), 1);
        assert_eq!(engine.seconds_remaining(), 60);
        assert_eq!(engine.total_seconds(), 60);
        assert!(!engine.is_running());
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut engine = TimerEngine::new(config(1, 1, 1, 1));
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        for _ in 0..30 {
            engine.tick();
        }
        assert!((engine.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = TimerEngine::default();
        match engine.snapshot() {
            Event::StateSnapshot {
                phase,
                seconds_remaining,
                session_index,
                is_running,
                ..
            } => {
                assert_eq!(phase, Phase::Focus);
                assert_eq!(seconds_remaining, 25 * 60);
                assert_eq!(session_index, 1);
                assert!(!is_running);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
