//! Records exchanged with the host's task-list platform

use serde::{Deserialize, Serialize};

use crate::item::ListItem;
use crate::note::KeepList;

/// Whether a task still has to be done.
///
/// This maps to the `checked` flag of a Keep item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NeedsAction,
    Completed,
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::NeedsAction
    }
}

impl From<bool> for TaskStatus {
    fn from(checked: bool) -> Self {
        if checked { TaskStatus::Completed } else { TaskStatus::NeedsAction }
    }
}


/// A task list, as seen by the host.
///
/// Keep lists expose no stable identifier to this crate, so `id` is the list title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListRecord {
    pub id: String,
    pub title: String,
}

impl From<&KeepList> for TaskListRecord {
    fn from(list: &KeepList) -> Self {
        Self { id: list.title().to_string(), title: list.title().to_string() }
    }
}


/// A task, as seen by the host. Its `id` is the item text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
}

impl From<&ListItem> for TaskRecord {
    fn from(item: &ListItem) -> Self {
        Self {
            id: item.text().to_string(),
            title: item.text().to_string(),
            status: TaskStatus::from(item.checked()),
        }
    }
}


/// The fields of a task the host may create or overwrite
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskUpdate {
    pub fn new<S: ToString>(title: S, status: TaskStatus) -> Self {
        Self { title: title.to_string(), status }
    }
}
