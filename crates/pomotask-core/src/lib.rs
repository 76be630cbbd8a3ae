//! # Pomotask Core Library
//!
//! Core logic for the Pomotask focus timer and task list. Everything is
//! usable from the standalone `pomotask` CLI; the library owns no global
//! state.
//!
//! ## Architecture
//!
//! - **Timer**: a tick-driven Focus / ShortBreak / LongBreak state machine,
//!   settings reconciliation for live edits, and a one-second [`Ticker`]
//! - **Storage**: key-value persistence (SQLite, keyring, in-memory) and
//!   TOML configuration
//! - **Tasks**: a local to-do list persisted as one JSON blob
//! - **Remote**: account, profile, settings and task mirror over a
//!   PostgREST/GoTrue backend
//! - **Sync**: sign-in hydration, best-effort task push, debounced sync
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`CycleRunner`]: host loop with alerts and XP credit
//! - [`TaskStore`]: task collection
//! - [`Config`]: application configuration
//! - [`RemoteBackend`]: seam for the remote service

pub mod auth;
pub mod error;
pub mod events;
pub mod notify;
pub mod remote;
pub mod storage;
pub mod sync;
pub mod task;
pub mod theme;
pub mod timer;
pub mod xp;

pub use auth::Session;
pub use error::{AuthError, ConfigError, CoreError, RemoteError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{Alert, Notifier, PhaseAlerts, SoundPlayer};
pub use remote::{RemoteBackend, SignUpOutcome, SupabaseClient};
pub use storage::{Config, Database, KeyValueStore, KeyringStore, MemoryStore};
pub use sync::{Debouncer, SignInReport};
pub use task::{NewTask, Task, TaskPatch, TaskStore};
pub use theme::Theme;
pub use timer::{CycleRunner, Phase, Ticker, TimerConfig, TimerEngine};
pub use xp::XpProgress;
