//! Experience points earned from focus time.
//!
//! 25 XP per 10 minutes of focus, floored. Level 1 starts at 0 XP, level 2
//! needs 100 XP, and every further level needs 150 XP more than the last
//! threshold (100, 250, 400, ...).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::storage::{load_json, save_json, KeyValueStore};

pub const XP_KEY: &str = "user_xp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpProgress {
    pub xp: u64,
    pub level: u32,
}

impl Default for XpProgress {
    fn default() -> Self {
        Self { xp: 0, level: 1 }
    }
}

pub fn xp_for_duration(minutes: u32) -> u64 {
    u64::from(minutes) * 25 / 10
}

pub fn level_for_xp(xp: u64) -> u32 {
    let mut level = 1;
    let mut needed = 100;
    while xp >= needed {
        level += 1;
        needed += 150;
    }
    level
}

/// Load the local XP record. A missing or unreadable record counts as zero.
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> XpProgress {
    match load_json::<XpProgress, _>(store, XP_KEY) {
        Ok(Some(progress)) => progress,
        Ok(None) => XpProgress::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load XP, starting from zero");
            XpProgress::default()
        }
    }
}

pub fn save<S: KeyValueStore + ?Sized>(store: &S, progress: &XpProgress) -> Result<()> {
    save_json(store, XP_KEY, progress)
}

/// Credit a completed focus phase and persist the new total.
///
/// An unreadable record is an error and is left untouched.
pub fn award_focus<S: KeyValueStore + ?Sized>(store: &S, minutes: u32) -> Result<XpProgress> {
    let mut progress = load_json::<XpProgress, _>(store, XP_KEY)?.unwrap_or_default();
    progress.xp += xp_for_duration(minutes);
    progress.level = level_for_xp(progress.xp);
    save(store, &progress)?;
    debug!(xp = progress.xp, level = progress.level, "focus XP awarded");
    Ok(progress)
}
