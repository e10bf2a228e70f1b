use async_trait::async_trait;

use crate::error::Error;
use crate::note::{Note, KeepList};
use crate::task::{TaskListRecord, TaskRecord, TaskUpdate};

/// A client of the Keep service.
///
/// Calls are blocking (they may perform network requests), so they must not be made from an async context.
/// A [`Session`](crate::Session) takes care of running them on a worker thread.
pub trait KeepService: Send {
    /// Log in with an email and a (usually app-specific) password
    fn login(&mut self, email: &str, password: &str) -> Result<(), Error>;
    /// Returns the master token obtained by the last successful login, if any
    fn master_token(&self) -> Option<String>;
    /// Resume a session with a master token, without sending the password again
    fn resume(&mut self, email: &str, master_token: &str) -> Result<(), Error>;

    /// Push the local changes to the server, and pull the remote ones
    fn sync(&mut self) -> Result<(), Error>;

    /// Every note (text notes and lists) known since the last sync
    fn notes(&self) -> &[Note];
    /// Every note (text notes and lists) known since the last sync
    fn notes_mut(&mut self) -> &mut [Note];
    /// Create a new, empty list. It will be pushed to the server at the next sync
    fn create_list(&mut self, title: &str) -> Result<&mut KeepList, Error>;
}

/// The task-list operations a host expects from a task-list platform
#[async_trait]
pub trait TaskListApi: Send + Sync {
    /// Returns every task list
    async fn list_task_lists(&self) -> Result<Vec<TaskListRecord>, Error>;
    /// Returns every task of a task list.
    /// This may create the list in case it does not exist yet
    async fn list_tasks(&self, task_list_id: &str) -> Result<Vec<TaskRecord>, Error>;
    /// Add a task to a task list, or uncheck it in case it already exists
    async fn insert(&self, task_list_id: &str, task: &TaskUpdate) -> Result<(), Error>;
    /// Overwrite the task identified by `task_id`
    async fn patch(&self, task_list_id: &str, task_id: &str, task: &TaskUpdate) -> Result<(), Error>;
}
