//! Phase-boundary alerts: a user-facing message plus a one-shot sound.
//!
//! Both are fire-and-forget. A failing notifier or sound player is logged
//! and otherwise ignored; by the time an alert is announced the engine has
//! already committed the new phase.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::warn;

pub type NotifyError = Box<dyn std::error::Error + Send + Sync>;

/// Title and body shown at a phase boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Displays an alert to the user.
pub trait Notifier: Send {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError>;
}

/// Plays the audible cue.
pub trait SoundPlayer: Send {
    fn play(&self) -> Result<(), NotifyError>;
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play(&self) -> Result<(), NotifyError> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}

/// Spawns an external player, e.g. `paplay /usr/share/sounds/bell.oga`.
///
/// The process is not waited on.
#[derive(Debug, Clone)]
pub struct CommandSound {
    program: String,
    args: Vec<String>,
}

impl CommandSound {
    /// Split a shell-like command line on whitespace. Returns `None` if empty.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl SoundPlayer for CommandSound {
    fn play(&self) -> Result<(), NotifyError> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundPlayer for Silent {
    fn play(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

impl Notifier for Silent {
    fn notify(&self, _alert: &Alert) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Notifier and sound player pair used at every phase boundary.
pub struct PhaseAlerts {
    notifier: Box<dyn Notifier>,
    sound: Box<dyn SoundPlayer>,
}

impl PhaseAlerts {
    pub fn new(notifier: Box<dyn Notifier>, sound: Box<dyn SoundPlayer>) -> Self {
        Self { notifier, sound }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(Silent), Box::new(Silent))
    }

    /// Play the cue, then show the alert. Never fails.
    pub fn announce(&self, alert: &Alert) {
        if let Err(e) = self.sound.play() {
            warn!(error = %e, "alert sound failed");
        }
        if let Err(e) = self.notifier.notify(alert) {
            warn!(error = %e, title = %alert.title, "alert notification failed");
        }
    }
}

impl std::fmt::Debug for PhaseAlerts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseAlerts").finish_non_exhaustive()
    }
}
