//! Personal to-do list.
//!
//! The task collection is owned by the local store and persisted as one
//! JSON blob after every mutation. A remote copy, when present, is a
//! detached mirror reconciled by [`TaskStore::merge_remote`].

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::storage::{load_json, save_json, KeyValueStore};

pub const TASKS_KEY: &str = "task-storage";
pub const DEFAULT_TAG: &str = "personal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub completed: bool,
    /// Local image reference (path or URI).
    #[serde(default)]
    pub image: Option<String>,
    /// Remote owner. `None` until the task has been pushed to or pulled
    /// from the remote table.
    #[serde(default)]
    pub owner: Option<String>,
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim();
    if tag.is_empty() {
        default_tag()
    } else {
        tag.to_string()
    }
}

/// Fields supplied when adding a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub tag: String,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial edit. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    /// `Some(None)` clears the image.
    pub image: Option<Option<String>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tag.is_none()
            && self.image.is_none()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedTasks {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Task collection backed by a key-value store.
pub struct TaskStore<S> {
    store: S,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the persisted collection (empty if nothing is stored yet).
    pub fn load(store: S) -> Result<Self> {
        let persisted: PersistedTasks = load_json(&store, TASKS_KEY)?.unwrap_or_default();
        Ok(Self {
            store,
            tasks: persisted.tasks,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks that have never been mirrored remotely.
    pub fn unowned(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.owner.is_none())
    }

    /// Append a task. A blank title is ignored and returns `None`.
    pub fn add(&mut self, new: NewTask) -> Result<Option<&Task>> {
        let title = new.title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: new.description.trim().to_string(),
            tag: normalize_tag(&new.tag),
            completed: false,
            image: None,
            owner: None,
        };
        debug!(id = %task.id, "task added");
        self.tasks.push(task);
        self.persist()?;
        Ok(self.tasks.last())
    }

    /// Apply a partial edit. A blank title in the patch is ignored.
    pub fn edit(&mut self, id: &str, patch: TaskPatch) -> Result<&Task> {
        let idx = self.index_of(id)?;
        let task = &mut self.tasks[idx];
        if let Some(title) = patch.title {
            let title = title.trim();
            if !title.is_empty() {
                task.title = title.to_string();
            }
        }
        if let Some(description) = patch.description {
            task.description = description.trim().to_string();
        }
        if let Some(tag) = patch.tag {
            task.tag = normalize_tag(&tag);
        }
        if let Some(image) = patch.image {
            task.image = image;
        }
        self.persist()?;
        Ok(&self.tasks[idx])
    }

    pub fn toggle(&mut self, id: &str) -> Result<&Task> {
        let idx = self.index_of(id)?;
        self.tasks[idx].completed = !self.tasks[idx].completed;
        self.persist()?;
        Ok(&self.tasks[idx])
    }

    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let idx = self.index_of(id)?;
        let removed = self.tasks.remove(idx);
        self.persist()?;
        debug!(id = %removed.id, "task deleted");
        Ok(removed)
    }

    /// Replace the whole collection.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.tasks = tasks;
        self.persist()
    }

    /// Record that a task now exists remotely under `owner`.
    pub fn mark_owned(&mut self, id: &str, owner: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        self.tasks[idx].owner = Some(owner.to_string());
        self.persist()
    }

    /// Add every remote task whose title no local task already has.
    ///
    /// Title equality is the de-duplication signal, so two distinct tasks
    /// sharing a title collapse into the local one. A remote row whose id is
    /// already held locally (retitled since the last pull) is skipped too,
    /// keeping ids unique.
    pub fn merge_remote(&mut self, remote: Vec<Task>) -> Result<usize> {
        let mut added = 0;
        for task in remote {
            let exists = self
                .tasks
                .iter()
                .any(|t| t.id == task.id || t.title == task.title);
            if !exists {
                self.tasks.push(task);
                added += 1;
            }
        }
        if added > 0 {
            self.persist()?;
        }
        debug!(added, "remote tasks merged");
        Ok(added)
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ValidationError::TaskNotFound(id.to_string()).into())
    }

    fn persist(&self) -> Result<()> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            tasks: &'a [Task],
        }
        save_json(&self.store, TASKS_KEY, &Borrowed { tasks: &self.tasks })
    }
}
