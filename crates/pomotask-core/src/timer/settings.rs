//! Settings reconciliation.
//!
//! Applies edited durations to a live engine without corrupting the
//! countdown in flight, and hydrates the engine from a remote profile at
//! sign-in.

use chrono::Utc;
use tracing::{debug, info};

use super::engine::TimerEngine;
use super::phase::TimerConfig;
use crate::error::ValidationError;
use crate::events::Event;

impl TimerEngine {
    /// Apply a settings edit.
    ///
    /// Invalid edits are rejected as a whole and the previous config stays
    /// in force. Only the active phase's duration touches the countdown;
    /// the others take effect at their next transition. `is_running` is
    /// never changed.
    pub fn apply_settings(&mut self, config: TimerConfig) -> Result<Event, ValidationError> {
        config.validate()?;

        let new_total = config.seconds_for(self.phase);
        let untouched = !self.is_running && self.seconds_remaining == self.total_seconds;

        if new_total != self.total_seconds {
            self.total_seconds = new_total;
            self.seconds_remaining = if untouched {
                new_total
            } else {
                self.seconds_remaining.min(new_total)
            };
        }

        if self.session_index > config.sessions_before_long_break {
            self.session_index = config.sessions_before_long_break;
        }

        self.config = config;
        debug!(
            phase = %self.phase,
            remaining = self.seconds_remaining,
            total = self.total_seconds,
            "settings applied"
        );

        Ok(Event::SettingsApplied {
            config,
            at: Utc::now(),
        })
    }

    /// Overwrite the config from the signed-in user's stored preferences and
    /// restart the cycle. Any countdown in flight is discarded.
    pub fn hydrate_from_remote_profile(&mut self, remote: TimerConfig) -> Event {
        self.config = remote;
        self.reset();
        info!(
            focus = remote.focus_minutes,
            short_break = remote.short_break_minutes,
            long_break = remote.long_break_minutes,
            sessions = remote.sessions_before_long_break,
            "timer settings hydrated from profile"
        );
        Event::ProfileHydrated {
            config: remote,
            at: Utc::now(),
        }
    }
}
