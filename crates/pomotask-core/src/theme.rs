use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ValidationError};
use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ValidationError::InvalidChoice {
                field: "theme",
                expected: "light, dark",
                input: other.to_string(),
            }),
        }
    }
}

/// Stored theme, or `fallback` when nothing valid is stored.
///
/// The value is kept as the bare string `light`/`dark`.
pub fn load<S: KeyValueStore + ?Sized>(store: &S, fallback: Theme) -> Result<Theme> {
    Ok(store
        .get(THEME_KEY)?
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(fallback))
}

pub fn save<S: KeyValueStore + ?Sized>(store: &S, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.as_str())?;
    Ok(())
}

/// Flip the stored theme and return the new one.
pub fn toggle<S: KeyValueStore + ?Sized>(store: &S, fallback: Theme) -> Result<Theme> {
    let next = load(store, fallback)?.toggled();
    save(store, next)?;
    Ok(next)
}
