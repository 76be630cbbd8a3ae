//! Shared plumbing for command handlers.

use pomotask_core::auth::{self, Session};
use pomotask_core::notify::{CommandSound, Silent, TerminalBell};
use pomotask_core::storage::NotificationsConfig;
use pomotask_core::{
    Alert, Config, KeyringStore, Notifier, PhaseAlerts, SoundPlayer, SupabaseClient,
};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Credential store for the signed-in session.
pub fn credentials() -> KeyringStore {
    KeyringStore::new()
}

/// The signed-in session, if any. An unreadable credential store counts
/// as signed out.
pub fn current_session() -> Option<Session> {
    match auth::load_session(&credentials()) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "credential store unavailable");
            None
        }
    }
}

pub fn remote(config: &Config) -> Result<SupabaseClient, pomotask_core::CoreError> {
    SupabaseClient::new(&config.remote)
}

/// Prints phase alerts to stdout.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), pomotask_core::notify::NotifyError> {
        println!("\n{}: {}", alert.title, alert.body);
        Ok(())
    }
}

pub fn phase_alerts(config: &NotificationsConfig) -> PhaseAlerts {
    if !config.enabled {
        return PhaseAlerts::silent();
    }
    let sound: Box<dyn SoundPlayer> = if !config.sound {
        Box::new(Silent)
    } else {
        match config
            .sound_command
            .as_deref()
            .and_then(CommandSound::from_command_line)
        {
            Some(cmd) => Box::new(cmd),
            None => Box::new(TerminalBell),
        }
    };
    PhaseAlerts::new(Box::new(ConsoleNotifier), sound)
}

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_minutes_and_seconds() {
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
    }
}
