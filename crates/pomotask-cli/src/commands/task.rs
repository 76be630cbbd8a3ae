//! Task management commands for CLI.

use clap::Subcommand;
use pomotask_core::sync::{push_delete, push_edit};
use pomotask_core::{Config, Database, NewTask, Task, TaskPatch, TaskStore};

use super::context::{self, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task (a blank title is ignored)
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Tag (default: personal)
        #[arg(long, default_value = "")]
        tag: String,
    },
    /// List tasks
    List {
        /// Only tasks with this tag
        #[arg(long)]
        tag: Option<String>,
        /// Only unfinished tasks
        #[arg(long)]
        open: bool,
    },
    /// Print one task
    Show { id: String },
    /// Edit a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// Attach an image (path or URI)
        #[arg(long, conflicts_with = "clear_image")]
        image: Option<String>,
        #[arg(long)]
        clear_image: bool,
    },
    /// Flip the completed flag
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
}

pub async fn run(action: TaskAction) -> CmdResult {
    let db = Database::open()?;
    let mut tasks = TaskStore::load(&db)?;

    match action {
        TaskAction::Add {
            title,
            description,
            tag,
        } => match tasks.add(NewTask {
            title,
            description,
            tag,
        })? {
            Some(task) => context::print_json(task)?,
            None => eprintln!("empty title, nothing added"),
        },
        TaskAction::List { tag, open } => {
            let listed: Vec<&Task> = tasks
                .tasks()
                .iter()
                .filter(|t| tag.as_deref().map_or(true, |tag| t.tag == tag))
                .filter(|t| !open || !t.completed)
                .collect();
            context::print_json(&listed)?;
        }
        TaskAction::Show { id } => {
            let task = tasks.get(&id).ok_or(format!("Task not found: {id}"))?;
            context::print_json(task)?;
        }
        TaskAction::Edit {
            id,
            title,
            description,
            tag,
            image,
            clear_image,
        } => {
            let patch = TaskPatch {
                title,
                description,
                tag,
                image: if clear_image { Some(None) } else { image.map(Some) },
            };
            if patch.is_empty() {
                return Err("nothing to change".into());
            }
            let task = tasks.edit(&id, patch)?.clone();
            context::print_json(&task)?;
            mirror_edit(&task).await;
        }
        TaskAction::Toggle { id } => {
            let task = tasks.toggle(&id)?.clone();
            context::print_json(&task)?;
            mirror_edit(&task).await;
        }
        TaskAction::Delete { id } => {
            let task = tasks.delete(&id)?;
            println!("Task deleted: {id}");
            if let Some((client, session)) = task.owner.as_ref().and_then(|_| signed_in_remote()) {
                if let Err(e) = push_delete(&client, &session, &task).await {
                    eprintln!("warning: remote copy not deleted: {e}");
                }
            }
        }
    }
    Ok(())
}

fn signed_in_remote() -> Option<(pomotask_core::SupabaseClient, pomotask_core::Session)> {
    let config = Config::load_or_default();
    let session = context::current_session()?;
    match context::remote(&config) {
        Ok(client) => Some((client, session)),
        Err(e) => {
            tracing::debug!(error = %e, "remote not available");
            None
        }
    }
}

/// Best-effort update of the remote copy. Local state is already saved.
async fn mirror_edit(task: &Task) {
    if task.owner.is_none() {
        return;
    }
    if let Some((client, session)) = signed_in_remote() {
        if let Err(e) = push_edit(&client, &session, task).await {
            eprintln!("warning: remote copy not updated: {e}");
        }
    }
}
