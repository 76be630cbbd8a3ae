use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::notify::Alert;

/// The current mode of the timer cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    /// Alert shown when the cycle enters this phase.
    pub fn entry_alert(self) -> Alert {
        let (title, body) = match self {
            Phase::Focus => ("Focus Time!", "Time to get back to work."),
            Phase::ShortBreak => ("Break Time!", "Take a short rest."),
            Phase::LongBreak => ("Long Break!", "Enjoy your long break."),
        };
        Alert::new(title, body)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Durations (minutes) and cycle length driving the timer.
///
/// Stored as the `[timer]` section of `config.toml` and mirrored to the
/// remote `pomodoro_settings` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    2
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

impl TimerConfig {
    pub fn minutes_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_minutes,
            Phase::ShortBreak => self.short_break_minutes,
            Phase::LongBreak => self.long_break_minutes,
        }
    }

    /// Phase duration in seconds. Saturates instead of overflowing.
    pub fn seconds_for(&self, phase: Phase) -> u32 {
        self.minutes_for(phase).saturating_mul(60)
    }

    /// Every field must be at least one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("focus_minutes", self.focus_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
            ("sessions_before_long_break", self.sessions_before_long_break),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ValidationError::NotPositive {
                    field,
                    value: i64::from(value),
                });
            }
        }
        Ok(())
    }

    /// Parse a user-typed settings field ("25", " 5 ").
    pub fn parse_field(field: &'static str, input: &str) -> Result<u32, ValidationError> {
        let trimmed = input.trim();
        let value: i64 = trimmed.parse().map_err(|_| ValidationError::NotNumeric {
            field,
            input: input.to_string(),
        })?;
        if value < 1 || value > i64::from(u32::MAX) {
            return Err(ValidationError::NotPositive { field, value });
        }
        Ok(value as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_25_5_15_2() {
        let c = TimerConfig::default();
        assert_eq!(c.focus_minutes, 25);
        assert_eq!(c.short_break_minutes, 5);
        assert_eq!(c.long_break_minutes, 15);
        assert_eq!(c.sessions_before_long_break, 2);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_fields() {
        let c = TimerConfig {
            long_break_minutes: 0,
            ..TimerConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ValidationError::NotPositive {
                field: "long_break_minutes",
                value: 0
            })
        );
    }

    #[test]
    fn parse_field_accepts_padded_numbers() {
        assert_eq!(TimerConfig::parse_field("focus_minutes", " 30 "), Ok(30));
    }

    #[test]
    fn parse_field_rejects_garbage_and_non_positive() {
        assert!(matches!(
            TimerConfig::parse_field("focus_minutes", "abc"),
            Err(ValidationError::NotNumeric { .. })
        ));
        assert_eq!(
            TimerConfig::parse_field("focus_minutes", "-3"),
            Err(ValidationError::NotPositive {
                field: "focus_minutes",
                value: -3
            })
        );
        assert!(TimerConfig::parse_field("focus_minutes", "0").is_err());
    }

    #[test]
    fn entry_alerts_have_expected_titles() {
        assert_eq!(Phase::Focus.entry_alert().title, "Focus Time!");
        assert_eq!(Phase::ShortBreak.entry_alert().title, "Break Time!");
        assert_eq!(Phase::LongBreak.entry_alert().title, "Long Break!");
    }

    #[test]
    fn seconds_for_uses_phase_duration() {
        let c = TimerConfig::default();
        assert_eq!(c.seconds_for(Phase::Focus), 1500);
        assert_eq!(c.seconds_for(Phase::ShortBreak), 300);
        assert_eq!(c.seconds_for(Phase::LongBreak), 900);
    }
}
