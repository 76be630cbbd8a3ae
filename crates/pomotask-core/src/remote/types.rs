//! Row shapes of the remote tables and their conversions.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::task::{Task, DEFAULT_TAG};
use crate::timer::TimerConfig;

/// `pomodoro_settings` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRow {
    pub user_id: String,
    pub pomo_duration: i64,
    pub break_duration: i64,
    pub long_break_duration: i64,
    pub max_sessions: i64,
}

impl SettingsRow {
    pub fn from_config(user_id: &str, config: &TimerConfig) -> Self {
        Self {
            user_id: user_id.to_string(),
            pomo_duration: i64::from(config.focus_minutes),
            break_duration: i64::from(config.short_break_minutes),
            long_break_duration: i64::from(config.long_break_minutes),
            max_sessions: i64::from(config.sessions_before_long_break),
        }
    }

    /// Convert to a timer config. Out-of-range columns fall back to the
    /// default for that field.
    pub fn to_config(&self) -> TimerConfig {
        let defaults = TimerConfig::default();
        let pick = |field: &str, value: i64, fallback: u32| -> u32 {
            match u32::try_from(value) {
                Ok(v) if v >= 1 => v,
                _ => {
                    warn!(field, value, fallback, "remote setting out of range");
                    fallback
                }
            }
        };
        TimerConfig {
            focus_minutes: pick("pomo_duration", self.pomo_duration, defaults.focus_minutes),
            short_break_minutes: pick(
                "break_duration",
                self.break_duration,
                defaults.short_break_minutes,
            ),
            long_break_minutes: pick(
                "long_break_duration",
                self.long_break_duration,
                defaults.long_break_minutes,
            ),
            sessions_before_long_break: pick(
                "max_sessions",
                self.max_sessions,
                defaults.sessions_before_long_break,
            ),
        }
    }
}

/// `profiles` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub xp: u64,
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

impl Profile {
    pub fn new_for(id: &str, email: Option<&str>, username: Option<&str>) -> Self {
        let username = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or("unknown");
        Self {
            id: id.to_string(),
            email: email.map(str::to_string),
            username: Some(username.to_string()),
            xp: 0,
            level: 1,
        }
    }

    /// Username for display; "Unknown" when unset or blank.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or("Unknown")
    }
}

/// `tasks` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: String,
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl TaskRow {
    pub fn from_task(task: &Task, user_id: &str) -> Self {
        Self {
            id: task.id.clone(),
            user_id: user_id.to_string(),
            content: task.title.clone(),
            is_complete: task.completed,
            description: Some(task.description.clone()),
            tag: Some(task.tag.clone()),
        }
    }

    pub fn into_task(self) -> Task {
        Task {
            id: self.id,
            title: self.content,
            description: self.description.unwrap_or_default(),
            tag: self
                .tag
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TAG.to_string()),
            completed: self.is_complete,
            image: None,
            owner: Some(self.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_row_maps_columns() {
        let row: SettingsRow = serde_json::from_str(
            r#"{"user_id":"u1","pomo_duration":50,"break_duration":10,"long_break_duration":30,"max_sessions":4}"#,
        )
        .unwrap();
        let config = row.to_config();
        assert_eq!(config.focus_minutes, 50);
        assert_eq!(config.short_break_minutes, 10);
        assert_eq!(config.long_break_minutes, 30);
        assert_eq!(config.sessions_before_long_break, 4);
    }

    #[test]
    fn out_of_range_columns_fall_back_to_defaults() {
        let row = SettingsRow {
            user_id: "u1".into(),
            pomo_duration: 0,
            break_duration: -2,
            long_break_duration: 20,
            max_sessions: 3,
        };
        let config = row.to_config();
        assert_eq!(config.focus_minutes, 25);
        assert_eq!(config.short_break_minutes, 5);
        assert_eq!(config.long_break_minutes, 20);
    }

    #[test]
    fn task_row_conversion_sets_owner_and_default_tag() {
        let row: TaskRow =
            serde_json::from_str(r#"{"id":"t1","user_id":"u1","content":"Read","is_complete":true}"#)
                .unwrap();
        let task = row.into_task();
        assert_eq!(task.title, "Read");
        assert!(task.completed);
        assert_eq!(task.tag, "personal");
        assert_eq!(task.owner.as_deref(), Some("u1"));
    }

    #[test]
    fn new_profile_defaults_username() {
        let p = Profile::new_for("u1", Some("a@b.c"), Some("  "));
        assert_eq!(p.username.as_deref(), Some("unknown"));
        assert_eq!(p.level, 1);
        let p = Profile::new_for("u1", None, Some("ada"));
        assert_eq!(p.username.as_deref(), Some("ada"));
    }

    #[test]
    fn display_name_falls_back_to_unknown() {
        let mut p = Profile::new_for("u1", None, Some("ada"));
        assert_eq!(p.display_name(), "ada");
        p.username = None;
        assert_eq!(p.display_name(), "Unknown");
        p.username = Some(" ".into());
        assert_eq!(p.display_name(), "Unknown");
    }
}
