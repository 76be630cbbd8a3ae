//! Mirror the local task list to the remote `tasks` table.
//!
//! Local storage stays authoritative. Remote failures are reported to the
//! caller and never roll back a local change.

use tracing::{debug, info, warn};

use crate::auth::Session;
use crate::error::Result;
use crate::remote::RemoteBackend;
use crate::storage::KeyValueStore;
use crate::task::{Task, TaskStore};

/// Result of pushing unmirrored tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    pub pushed: usize,
    /// `(task id, error message)` for each insert that failed.
    pub failed: Vec<(String, String)>,
}

impl PushReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetch the user's remote tasks and add those whose title is new locally.
pub async fn pull_and_merge<B, S>(
    backend: &B,
    session: &Session,
    tasks: &mut TaskStore<S>,
) -> Result<usize>
where
    B: RemoteBackend,
    S: KeyValueStore,
{
    let remote = backend.list_tasks(session).await?;
    let fetched = remote.len();
    let added = tasks.merge_remote(remote)?;
    info!(fetched, added, "remote tasks pulled");
    Ok(added)
}

/// Insert every task that has no remote owner yet.
///
/// Each successful insert marks the task as owned by the session user.
/// A failing insert is logged and recorded; the rest are still attempted.
pub async fn push_unowned<B, S>(
    backend: &B,
    session: &Session,
    tasks: &mut TaskStore<S>,
) -> Result<PushReport>
where
    B: RemoteBackend,
    S: KeyValueStore,
{
    let pending: Vec<Task> = tasks.unowned().cloned().collect();
    let mut report = PushReport::default();

    for task in pending {
        match backend.insert_task(session, &task).await {
            Ok(()) => {
                tasks.mark_owned(&task.id, &session.user_id)?;
                report.pushed += 1;
            }
            Err(e) => {
                warn!(id = %task.id, error = %e, "task push failed");
                report.failed.push((task.id, e.to_string()));
            }
        }
    }

    debug!(pushed = report.pushed, failed = report.failed.len(), "push finished");
    Ok(report)
}

/// Send a local edit to the remote copy. Tasks never mirrored are skipped.
///
/// Returns whether a request was made.
pub async fn push_edit<B: RemoteBackend>(
    backend: &B,
    session: &Session,
    task: &Task,
) -> Result<bool> {
    if task.owner.is_none() {
        return Ok(false);
    }
    backend.update_task(session, task).await?;
    Ok(true)
}

/// Remove the remote copy of a deleted task. Tasks never mirrored are
/// skipped.
pub async fn push_delete<B: RemoteBackend>(
    backend: &B,
    session: &Session,
    task: &Task,
) -> Result<bool> {
    if task.owner.is_none() {
        return Ok(false);
    }
    backend.delete_task(session, &task.id).await?;
    Ok(true)
}
