//! In-memory remote backend for sync tests.

use std::sync::Mutex;

use crate::auth::Session;
use crate::error::{RemoteError, Result};
use crate::remote::{Profile, RemoteBackend, SignUpOutcome};
use crate::task::Task;
use crate::timer::TimerConfig;
use crate::xp::XpProgress;

#[derive(Default)]
pub struct FakeBackend {
    pub settings: Mutex<Option<TimerConfig>>,
    pub profile: Mutex<Option<Profile>>,
    pub tasks: Mutex<Vec<Task>>,
    pub deleted: Mutex<Vec<String>>,
    /// Titles whose insert is rejected.
    pub reject_titles: Vec<String>,
    pub offline: bool,
}

pub fn session() -> Session {
    Session {
        user_id: "u1".into(),
        email: Some("ada@example.com".into()),
        access_token: "tok".into(),
        refresh_token: None,
    }
}

impl FakeBackend {
    fn reachable(&self) -> Result<()> {
        if self.offline {
            return Err(RemoteError::Status {
                status: 503,
                message: "service unavailable".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl RemoteBackend for FakeBackend {
    async fn sign_up(&self, _: &str, _: &str, _: Option<&str>) -> Result<SignUpOutcome> {
        self.reachable()?;
        Ok(SignUpOutcome::SignedIn(session()))
    }

    async fn sign_in(&self, _: &str, _: &str) -> Result<Session> {
        self.reachable()?;
        Ok(session())
    }

    async fn sign_out(&self, _: &Session) -> Result<()> {
        self.reachable()
    }

    async fn fetch_timer_settings(&self, _: &Session) -> Result<Option<TimerConfig>> {
        self.reachable()?;
        Ok(*self.settings.lock().unwrap())
    }

    async fn save_timer_settings(&self, _: &Session, config: &TimerConfig) -> Result<()> {
        self.reachable()?;
        *self.settings.lock().unwrap() = Some(*config);
        Ok(())
    }

    async fn fetch_profile(&self, _: &Session) -> Result<Option<Profile>> {
        self.reachable()?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn create_profile(&self, _: &Session, profile: &Profile) -> Result<()> {
        self.reachable()?;
        *self.profile.lock().unwrap() = Some(profile.clone());
        Ok(())
    }

    async fn update_profile_progress(&self, _: &Session, progress: &XpProgress) -> Result<()> {
        self.reachable()?;
        if let Some(profile) = self.profile.lock().unwrap().as_mut() {
            profile.xp = progress.xp;
            profile.level = progress.level;
        }
        Ok(())
    }

    async fn list_tasks(&self, _: &Session) -> Result<Vec<Task>> {
        self.reachable()?;
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn insert_task(&self, session: &Session, task: &Task) -> Result<()> {
        self.reachable()?;
        if self.reject_titles.contains(&task.title) {
            return Err(RemoteError::Status {
                status: 400,
                message: "rejected".into(),
            }
            .into());
        }
        let mut row = task.clone();
        row.owner = Some(session.user_id.clone());
        self.tasks.lock().unwrap().push(row);
        Ok(())
    }

    async fn update_task(&self, _: &Session, task: &Task) -> Result<()> {
        self.reachable()?;
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(row) = tasks.iter_mut().find(|t| t.id == task.id) {
            row.title = task.title.clone();
            row.completed = task.completed;
            row.description = task.description.clone();
            row.tag = task.tag.clone();
        }
        Ok(())
    }

    async fn delete_task(&self, _: &Session, id: &str) -> Result<()> {
        self.reachable()?;
        self.tasks.lock().unwrap().retain(|t| t.id != id);
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }
}
