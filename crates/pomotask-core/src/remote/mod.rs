//! Remote account, profile and task-mirror backend.
//!
//! The backend is treated as an opaque CRUD service. [`RemoteBackend`] is
//! the seam the sync code depends on; [`SupabaseClient`] implements it over
//! HTTP against a PostgREST + GoTrue deployment.

mod client;
pub mod types;

pub use client::SupabaseClient;
pub use types::{Profile, SettingsRow, TaskRow};

use crate::auth::Session;
use crate::error::Result;
use crate::task::Task;
use crate::timer::TimerConfig;
use crate::xp::XpProgress;

/// Outcome of a sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account is active and a session was issued.
    SignedIn(Session),
    /// The backend wants the e-mail address confirmed first.
    ConfirmationPending { user_id: Option<String> },
}

#[allow(async_fn_in_trait)]
pub trait RemoteBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> Result<SignUpOutcome>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_out(&self, session: &Session) -> Result<()>;

    /// Stored timer preferences. `None` when the user never saved any.
    async fn fetch_timer_settings(&self, session: &Session) -> Result<Option<TimerConfig>>;

    async fn save_timer_settings(&self, session: &Session, config: &TimerConfig) -> Result<()>;

    async fn fetch_profile(&self, session: &Session) -> Result<Option<Profile>>;

    async fn create_profile(&self, session: &Session, profile: &Profile) -> Result<()>;

    async fn update_profile_progress(&self, session: &Session, progress: &XpProgress)
        -> Result<()>;

    async fn list_tasks(&self, session: &Session) -> Result<Vec<Task>>;

    async fn insert_task(&self, session: &Session, task: &Task) -> Result<()>;

    async fn update_task(&self, session: &Session, task: &Task) -> Result<()>;

    async fn delete_task(&self, session: &Session, id: &str) -> Result<()>;
}
