use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::Alert;
use crate::timer::{Phase, TimerConfig};

/// Every state change of the timer produces an Event.
/// The host renders them; alerts and XP hang off `PhaseCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerStopped {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A phase ran out and the cycle moved on. The engine is stopped.
    PhaseCompleted {
        from: Phase,
        to: Phase,
        /// Length of the phase that just finished.
        completed_secs: u32,
        session_index: u32,
        alert: Alert,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        config: TimerConfig,
        at: DateTime<Utc>,
    },
    /// Config overwritten from the remote profile at sign-in; the cycle restarted.
    ProfileHydrated {
        config: TimerConfig,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        seconds_remaining: u32,
        total_seconds: u32,
        session_index: u32,
        sessions_before_long_break: u32,
        is_running: bool,
        progress: f64,
        at: DateTime<Utc>,
    },
}
