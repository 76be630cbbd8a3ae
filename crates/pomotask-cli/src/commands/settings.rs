//! Timer settings. Edits are validated as a whole, saved to the config
//! file and, when signed in, mirrored to the remote profile.

use clap::Subcommand;
use pomotask_core::{Config, RemoteBackend, TimerConfig, TimerEngine};

use super::context::{self, CmdResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the timer settings as JSON
    Show,
    /// Change one or more durations (minutes) or the cycle length
    Set {
        #[arg(long)]
        focus: Option<String>,
        #[arg(long)]
        short_break: Option<String>,
        #[arg(long)]
        long_break: Option<String>,
        /// Focus sessions before a long break
        #[arg(long)]
        sessions: Option<String>,
    },
    /// Restore 25/5/15/2
    Reset,
}

pub async fn run(action: SettingsAction) -> CmdResult {
    let mut config = Config::load()?;

    let updated = match action {
        SettingsAction::Show => return context::print_json(&config.timer),
        SettingsAction::Set {
            focus,
            short_break,
            long_break,
            sessions,
        } => {
            let mut timer = config.timer;
            if let Some(v) = focus {
                timer.focus_minutes = TimerConfig::parse_field("focus_minutes", &v)?;
            }
            if let Some(v) = short_break {
                timer.short_break_minutes = TimerConfig::parse_field("short_break_minutes", &v)?;
            }
            if let Some(v) = long_break {
                timer.long_break_minutes = TimerConfig::parse_field("long_break_minutes", &v)?;
            }
            if let Some(v) = sessions {
                timer.sessions_before_long_break =
                    TimerConfig::parse_field("sessions_before_long_break", &v)?;
            }
            timer
        }
        SettingsAction::Reset => TimerConfig::default(),
    };

    // Reconciled against a fresh timer; a running `timer run` picks the
    // file up at its next pause.
    let event = TimerEngine::new(config.timer).apply_settings(updated)?;

    config.timer = updated;
    config.save()?;
    context::print_json(&event)?;

    mirror_to_remote(&config).await
}

/// Upsert the saved timer settings when signed in.
pub async fn mirror_to_remote(config: &Config) -> CmdResult {
    if !config.remote.is_configured() {
        return Ok(());
    }
    if let Some(session) = context::current_session() {
        let client = context::remote(config)?;
        if let Err(e) = client.save_timer_settings(&session, &config.timer).await {
            eprintln!("warning: settings saved locally only: {e}");
        }
    }
    Ok(())
}
