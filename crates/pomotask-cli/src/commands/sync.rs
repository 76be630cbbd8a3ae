//! Manual task synchronization with the remote account.

use clap::Subcommand;
use pomotask_core::auth;
use pomotask_core::sync::{pull_and_merge, push_unowned};
use pomotask_core::{Config, Database, TaskStore};

use super::context::{self, CmdResult};

#[derive(Subcommand)]
pub enum SyncAction {
    /// Merge remote tasks into the local list
    Pull,
    /// Upload tasks that exist only locally
    Push,
}

pub async fn run(action: SyncAction) -> CmdResult {
    let config = Config::load()?;
    let client = context::remote(&config)?;
    let session = auth::require_session(&context::credentials())?;
    let db = Database::open()?;
    let mut tasks = TaskStore::load(&db)?;

    match action {
        SyncAction::Pull => {
            let added = pull_and_merge(&client, &session, &mut tasks).await?;
            println!("{added} task(s) added from remote");
        }
        SyncAction::Push => {
            let report = push_unowned(&client, &session, &mut tasks).await?;
            println!("{} task(s) pushed", report.pushed);
            for (id, error) in &report.failed {
                eprintln!("warning: {id}: {error}");
            }
            if !report.is_clean() {
                return Err(format!("{} task(s) failed to push", report.failed.len()).into());
            }
        }
    }
    Ok(())
}
