//! Remote synchronization.
//!
//! Local storage is the source of truth; the remote tables are a mirror.
//! The sign-in flow hydrates settings and pulls tasks, task mutations are
//! pushed best-effort, and a [`Debouncer`] lets a long-running host defer
//! the bulk push of unowned tasks until the delay has passed quietly.

mod debouncer;
mod sign_in;
mod task_sync;

#[cfg(test)]
mod testing;

pub use debouncer::{Debouncer, DEFAULT_SYNC_DELAY};
pub use sign_in::{complete_sign_in, SignInReport};
pub use task_sync::{pull_and_merge, push_delete, push_edit, push_unowned, PushReport};
