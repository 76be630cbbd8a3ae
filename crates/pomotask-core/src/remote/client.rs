//! HTTP client for a Supabase-style backend.
//!
//! Auth goes to `/auth/v1/*` (GoTrue), table access to `/rest/v1/<table>`
//! (PostgREST). Every request carries the project's anon key; table
//! requests also carry the user's access token.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::types::{Profile, SettingsRow, TaskRow};
use super::{RemoteBackend, SignUpOutcome};
use crate::auth::Session;
use crate::error::{AuthError, ConfigError, RemoteError, Result};
use crate::storage::RemoteConfig;
use crate::task::Task;
use crate::timer::TimerConfig;
use crate::xp::XpProgress;

const SETTINGS_TABLE: &str = "pomodoro_settings";
const PROFILES_TABLE: &str = "profiles";
const TASKS_TABLE: &str = "tasks";

pub struct SupabaseClient {
    http: Client,
    base: Url,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: AuthUser,
}

/// Sign-up answers with a session when confirmation is off and with the
/// bare user otherwise.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<String>,
}

impl SupabaseClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(ConfigError::RemoteNotConfigured.into());
        }
        let mut raw = config.url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(RemoteError::from)?;
        Ok(Self {
            http: Client::new(),
            base,
            anon_key: config.anon_key.trim().to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        Ok(self.base.join(path)?)
    }

    fn auth_request(&self, method: Method, path: &str) -> Result<RequestBuilder, RemoteError> {
        let url = self.endpoint(&format!("auth/v1/{path}"))?;
        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.anon_key))
    }

    fn table_request(
        &self,
        method: Method,
        table: &str,
        session: &Session,
    ) -> Result<RequestBuilder, RemoteError> {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token))
    }

    /// Turn a non-success response into `RemoteError::Status`.
    async fn check(resp: Response) -> Result<Response, RemoteError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    async fn send(builder: RequestBuilder) -> Result<Response, RemoteError> {
        let resp = builder.send().await?;
        Self::check(resp).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, RemoteError> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
}

/// Pull a human-readable message out of a GoTrue/PostgREST error body.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

impl RemoteBackend for SupabaseClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> Result<SignUpOutcome> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "username": username },
        });
        let resp = self
            .auth_request(Method::POST, "signup")?
            .json(&body)
            .send()
            .await
            .map_err(RemoteError::from)?;
        let resp = match Self::check(resp).await {
            Ok(resp) => resp,
            Err(RemoteError::Status { status, message }) if (400..500).contains(&status) => {
                return Err(AuthError::SignUpFailed(message).into());
            }
            Err(e) => return Err(e.into()),
        };
        let parsed: SignUpResponse = decode(resp).await?;

        match (parsed.access_token, parsed.user) {
            (Some(access_token), Some(user)) => Ok(SignUpOutcome::SignedIn(Session {
                user_id: user.id,
                email: user.email,
                access_token,
                refresh_token: parsed.refresh_token,
            })),
            (_, user) => Ok(SignUpOutcome::ConfirmationPending {
                user_id: user.map(|u| u.id).or(parsed.id),
            }),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let resp = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(RemoteError::from)?;
        let resp = match Self::check(resp).await {
            Ok(resp) => resp,
            Err(RemoteError::Status { status, message }) if (400..500).contains(&status) => {
                return Err(AuthError::SignInFailed(message).into());
            }
            Err(e) => return Err(e.into()),
        };
        let token: TokenResponse = decode(resp).await?;
        debug!(user = %token.user.id, "signed in");
        Ok(Session {
            user_id: token.user.id,
            email: token.user.email,
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        Self::send(
            self.auth_request(Method::POST, "logout")?
                .bearer_auth(&session.access_token),
        )
        .await?;
        Ok(())
    }

    async fn fetch_timer_settings(&self, session: &Session) -> Result<Option<TimerConfig>> {
        let resp = Self::send(
            self.table_request(Method::GET, SETTINGS_TABLE, session)?
                .query(&[
                    ("user_id", format!("eq.{}", session.user_id)),
                    ("select", "*".to_string()),
                ]),
        )
        .await?;
        let rows: Vec<SettingsRow> = decode(resp).await?;
        Ok(rows.first().map(SettingsRow::to_config))
    }

    async fn save_timer_settings(&self, session: &Session, config: &TimerConfig) -> Result<()> {
        let row = SettingsRow::from_config(&session.user_id, config);
        Self::send(
            self.table_request(Method::POST, SETTINGS_TABLE, session)?
                .query(&[("on_conflict", "user_id")])
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&row),
        )
        .await?;
        Ok(())
    }

    async fn fetch_profile(&self, session: &Session) -> Result<Option<Profile>> {
        let resp = Self::send(
            self.table_request(Method::GET, PROFILES_TABLE, session)?
                .query(&[
                    ("id", format!("eq.{}", session.user_id)),
                    ("select", "*".to_string()),
                ]),
        )
        .await?;
        let rows: Vec<Profile> = decode(resp).await?;
        Ok(rows.into_iter().next())
    }

    async fn create_profile(&self, session: &Session, profile: &Profile) -> Result<()> {
        Self::send(
            self.table_request(Method::POST, PROFILES_TABLE, session)?
                .header("Prefer", "return=minimal")
                .json(&[profile]),
        )
        .await?;
        Ok(())
    }

    async fn update_profile_progress(
        &self,
        session: &Session,
        progress: &XpProgress,
    ) -> Result<()> {
        Self::send(
            self.table_request(Method::PATCH, PROFILES_TABLE, session)?
                .query(&[("id", format!("eq.{}", session.user_id))])
                .header("Prefer", "return=minimal")
                .json(&json!({ "xp": progress.xp, "level": progress.level })),
        )
        .await?;
        Ok(())
    }

    async fn list_tasks(&self, session: &Session) -> Result<Vec<Task>> {
        let resp = Self::send(
            self.table_request(Method::GET, TASKS_TABLE, session)?
                .query(&[
                    ("user_id", format!("eq.{}", session.user_id)),
                    ("select", "*".to_string()),
                ]),
        )
        .await?;
        let rows: Vec<TaskRow> = decode(resp).await?;
        Ok(rows.into_iter().map(TaskRow::into_task).collect())
    }

    async fn insert_task(&self, session: &Session, task: &Task) -> Result<()> {
        let row = TaskRow::from_task(task, &session.user_id);
        Self::send(
            self.table_request(Method::POST, TASKS_TABLE, session)?
                .header("Prefer", "return=minimal")
                .json(&[row]),
        )
        .await?;
        Ok(())
    }

    async fn update_task(&self, session: &Session, task: &Task) -> Result<()> {
        Self::send(
            self.table_request(Method::PATCH, TASKS_TABLE, session)?
                .query(&[("id", format!("eq.{}", task.id))])
                .header("Prefer", "return=minimal")
                .json(&json!({
                    "content": task.title,
                    "is_complete": task.completed,
                    "description": task.description,
                    "tag": task.tag,
                })),
        )
        .await?;
        Ok(())
    }

    async fn delete_task(&self, session: &Session, id: &str) -> Result<()> {
        Self::send(
            self.table_request(Method::DELETE, TASKS_TABLE, session)?
                .query(&[("id", format!("eq.{id}"))]),
        )
        .await?;
        Ok(())
    }
}
