//! Work done once per sign-in.
//!
//! 1. Make sure a `profiles` row exists (created with the username given
//!    at sign-up, if any).
//! 2. Hydrate the timer from the stored `pomodoro_settings` row, or from
//!    the defaults when the user never saved any.
//! 3. Merge the remote task list into the local one.
//!
//! Every step is independent: a failing step is recorded as a warning and
//! the others still run. When the settings fetch fails the local config is
//! kept.

use tracing::{info, warn};

use super::task_sync::pull_and_merge;
use crate::auth::{self, Session};
use crate::error::Result;
use crate::remote::{Profile, RemoteBackend};
use crate::storage::KeyValueStore;
use crate::task::TaskStore;
use crate::timer::{TimerConfig, TimerEngine};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignInReport {
    pub profile_created: bool,
    /// Config the engine was hydrated with. `None` if the fetch failed.
    pub hydrated: Option<TimerConfig>,
    /// The remote had no settings row and the defaults were used.
    pub used_defaults: bool,
    pub tasks_merged: usize,
    pub warnings: Vec<String>,
}

pub async fn complete_sign_in<B, C, S>(
    backend: &B,
    session: &Session,
    credentials: &C,
    engine: &mut TimerEngine,
    tasks: &mut TaskStore<S>,
) -> SignInReport
where
    B: RemoteBackend,
    C: KeyValueStore + ?Sized,
    S: KeyValueStore,
{
    let mut report = SignInReport::default();

    match ensure_profile(backend, session, credentials).await {
        Ok(created) => report.profile_created = created,
        Err(e) => {
            warn!(error = %e, "profile check failed");
            report.warnings.push(format!("profile: {e}"));
        }
    }

    match backend.fetch_timer_settings(session).await {
        Ok(remote) => {
            report.used_defaults = remote.is_none();
            let config = remote.unwrap_or_default();
            engine.hydrate_from_remote_profile(config);
            report.hydrated = Some(config);
        }
        Err(e) => {
            warn!(error = %e, "settings fetch failed, keeping local config");
            report.warnings.push(format!("settings: {e}"));
        }
    }

    match pull_and_merge(backend, session, tasks).await {
        Ok(added) => report.tasks_merged = added,
        Err(e) => {
            warn!(error = %e, "task pull failed");
            report.warnings.push(format!("tasks: {e}"));
        }
    }

    info!(
        user = %session.user_id,
        profile_created = report.profile_created,
        merged = report.tasks_merged,
        warnings = report.warnings.len(),
        "sign-in sync finished"
    );
    report
}

/// Create the profile row if missing. Returns whether it was created.
async fn ensure_profile<B, C>(backend: &B, session: &Session, credentials: &C) -> Result<bool>
where
    B: RemoteBackend,
    C: KeyValueStore + ?Sized,
{
    if backend.fetch_profile(session).await?.is_some() {
        return Ok(false);
    }
    let username = auth::take_pending_username(credentials)?;
    let profile = Profile::new_for(
        &session.user_id,
        session.email.as_deref(),
        username.as_deref(),
    );
    backend.create_profile(session, &profile).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{session, FakeBackend};
    use super::*;
    use crate::storage::MemoryStore;
    use crate::task::NewTask;
    use crate::timer::Phase;

    fn custom() -> TimerConfig {
        TimerConfig {
            focus_minutes: 50,
            short_break_minutes: 10,
            long_break_minutes: 30,
            sessions_before_long_break: 3,
        }
    }

    #[tokio::test]
    async fn first_sign_in_creates_profile_and_hydrates() {
        let backend = FakeBackend::default();
        *backend.settings.lock().unwrap() = Some(custom());
        let creds = MemoryStore::new();
        auth::remember_username(&creds, "ada").unwrap();
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        let mut tasks = TaskStore::load(MemoryStore::new()).unwrap();

        let report = complete_sign_in(&backend, &session(), &creds, &mut engine, &mut tasks).await;

        assert!(report.profile_created);
        assert!(report.warnings.is_empty());
        assert_eq!(report.hydrated, Some(custom()));
        assert!(!report.used_defaults);
        let profile = backend.profile.lock().unwrap().clone().unwrap();
        assert_eq!(profile.username.as_deref(), Some("ada"));
        assert!(auth::take_pending_username(&creds).unwrap().is_none());

        assert_eq!(engine.config(), &custom());
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.seconds_remaining(), 50 * 60);
        assert!(!engine.is_running());
    }

    #[tokio::test]
    async fn missing_settings_row_hydrates_defaults() {
        let backend = FakeBackend::default();
        *backend.profile.lock().unwrap() = Some(Profile::new_for("u1", None, Some("ada")));
        let mut engine = TimerEngine::new(custom());
        let mut tasks = TaskStore::load(MemoryStore::new()).unwrap();

        let report =
            complete_sign_in(&backend, &session(), &MemoryStore::new(), &mut engine, &mut tasks)
                .await;

        assert!(!report.profile_created);
        assert!(report.used_defaults);
        assert_eq!(engine.config(), &TimerConfig::default());
    }

    #[tokio::test]
    async fn offline_backend_keeps_local_state() {
        let backend = FakeBackend {
            offline: true,
            ..FakeBackend::default()
        };
        let mut engine = TimerEngine::new(custom());
        let mut tasks = TaskStore::load(MemoryStore::new()).unwrap();
        tasks.add(NewTask::titled("local")).unwrap();

        let report =
            complete_sign_in(&backend, &session(), &MemoryStore::new(), &mut engine, &mut tasks)
                .await;

        assert_eq!(report.warnings.len(), 3);
        assert!(report.hydrated.is_none());
        assert_eq!(engine.config(), &custom());
        assert_eq!(tasks.len(), 1);
    }
}
