//! Signed-in session bookkeeping.
//!
//! The backend does the actual authentication; this module only keeps the
//! resulting session (and the username typed at sign-up, until the profile
//! row is created) in a credential store.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};
use crate::storage::{load_json, save_json, KeyValueStore};

pub const SESSION_KEY: &str = "session";
pub const PENDING_USERNAME_KEY: &str = "pending_username";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

pub fn load_session<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<Session>> {
    load_json(store, SESSION_KEY)
}

/// The current session, or `AuthError::NotSignedIn`.
pub fn require_session<S: KeyValueStore + ?Sized>(store: &S) -> Result<Session> {
    load_session(store)?.ok_or_else(|| AuthError::NotSignedIn.into())
}

pub fn save_session<S: KeyValueStore + ?Sized>(store: &S, session: &Session) -> Result<()> {
    save_json(store, SESSION_KEY, session)
}

pub fn clear_session<S: KeyValueStore + ?Sized>(store: &S) -> Result<()> {
    store.remove(SESSION_KEY)?;
    Ok(())
}

pub fn remember_username<S: KeyValueStore + ?Sized>(store: &S, username: &str) -> Result<()> {
    store.set(PENDING_USERNAME_KEY, username.trim())?;
    Ok(())
}

/// Return and forget the username remembered at sign-up.
pub fn take_pending_username<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<String>> {
    let name = store.get(PENDING_USERNAME_KEY)?;
    if name.is_some() {
        store.remove(PENDING_USERNAME_KEY)?;
    }
    Ok(name)
}
