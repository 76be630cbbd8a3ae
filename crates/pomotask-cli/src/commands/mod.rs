pub mod auth;
pub mod config;
pub mod context;
pub mod settings;
pub mod sync;
pub mod task;
pub mod theme;
pub mod timer;
pub mod xp;
