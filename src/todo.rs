//! The host-facing task list of a config entry

use std::sync::Arc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::coordinator::TaskUpdateCoordinator;
use crate::error::Error;
use crate::task::{TaskRecord, TaskStatus, TaskUpdate};
use crate::traits::TaskListApi;

bitflags! {
    /// What a task-list entity allows the host to do
    pub struct TodoListEntityFeature: u32 {
        const CREATE_TODO_ITEM = 1;
        const DELETE_TODO_ITEM = 2;
        const UPDATE_TODO_ITEM = 4;
        const MOVE_TODO_ITEM = 8;
    }
}

/// A task, as displayed by the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// `None` for items that have not been created yet
    pub uid: Option<String>,
    pub summary: String,
    pub status: TaskStatus,
}

impl From<TaskRecord> for TodoItem {
    fn from(record: TaskRecord) -> Self {
        Self { uid: Some(record.id), summary: record.title, status: record.status }
    }
}

impl From<&TodoItem> for TaskUpdate {
    fn from(item: &TodoItem) -> Self {
        TaskUpdate { title: item.summary.clone(), status: item.status }
    }
}


/// A task list backed by a [`TaskUpdateCoordinator`].
///
/// Reads come from the coordinator's latest data, writes go to the api and are followed by a refresh.
pub struct TodoListEntity<A: TaskListApi + ?Sized> {
    unique_id: String,
    coordinator: Arc<TaskUpdateCoordinator<A>>,
}

impl<A: TaskListApi + ?Sized> TodoListEntity<A> {
    pub fn new(entry_id: &str, coordinator: Arc<TaskUpdateCoordinator<A>>) -> Self {
        let unique_id = format!("{}-{}", entry_id, coordinator.task_list_id());
        Self { unique_id, coordinator }
    }

    pub fn name(&self) -> &str { self.coordinator.task_list_id() }
    pub fn unique_id(&self) -> &str { &self.unique_id }
    pub fn coordinator(&self) -> &Arc<TaskUpdateCoordinator<A>> { &self.coordinator }

    pub fn supported_features(&self) -> TodoListEntityFeature {
        TodoListEntityFeature::CREATE_TODO_ITEM | TodoListEntityFeature::UPDATE_TODO_ITEM
    }

    /// Whether the latest update succeeded
    pub fn available(&self) -> bool {
        self.coordinator.last_update_success()
    }

    /// The items of this list, or `None` until the first successful update
    pub fn todo_items(&self) -> Option<Vec<TodoItem>> {
        self.coordinator.data()
            .map(|records| records.into_iter().map(TodoItem::from).collect())
    }

    /// Add an item to the list (or uncheck the existing item that has the same text)
    pub async fn create_todo_item(&self, item: &TodoItem) -> Result<(), Error> {
        self.coordinator.api()
            .insert(self.coordinator.task_list_id(), &TaskUpdate::from(item))
            .await?;
        self.refresh_after_write().await;
        Ok(())
    }

    /// Overwrite the item whose text is `item.uid`
    pub async fn update_todo_item(&self, item: &TodoItem) -> Result<(), Error> {
        let uid = item.uid.as_deref().ok_or(Error::MissingItemId)?;
        self.coordinator.api()
            .patch(self.coordinator.task_list_id(), uid, &TaskUpdate::from(item))
            .await?;
        self.refresh_after_write().await;
        Ok(())
    }

    async fn refresh_after_write(&self) {
        if let Err(err) = self.coordinator.refresh().await {
            log::debug!("{} will show stale data until the next update ({})", self.unique_id, err);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::mock::MockServer;
    use crate::Session;

    async fn entity() -> (MockServer, TodoListEntity<Session<crate::mock::MockKeep>>) {
        let server = MockServer::new();
        server.add_account("me@example.com", "secret");
        let session = Arc::new(Session::new(server.client(), "me@example.com", Some("secret".to_string()), None));
        let coordinator = Arc::new(TaskUpdateCoordinator::new(session, "Groceries"));
        (server, TodoListEntity::new("entry", coordinator))
    }

    #[tokio::test]
    async fn create_and_update() {
        let (server, entity) = entity().await;
        assert_eq!(entity.unique_id(), "entry-Groceries");
        assert_eq!(entity.name(), "Groceries");
        assert!(entity.supported_features().contains(TodoListEntityFeature::CREATE_TODO_ITEM));
        assert!(entity.supported_features().contains(TodoListEntityFeature::DELETE_TODO_ITEM) == false);
        assert!(entity.todo_items().is_none());

        let milk = TodoItem{ uid: None, summary: "Milk".to_string(), status: TaskStatus::NeedsAction };
        entity.create_todo_item(&milk).await.unwrap();
        assert!(entity.available());
        assert_eq!(entity.todo_items().unwrap(), vec![
            TodoItem{ uid: Some("Milk".to_string()), summary: "Milk".to_string(), status: TaskStatus::NeedsAction },
        ]);

        let oat_milk = TodoItem{ uid: Some("milk".to_string()), summary: "Oat Milk".to_string(), status: TaskStatus::Completed };
        entity.update_todo_item(&oat_milk).await.unwrap();
        assert_eq!(entity.todo_items().unwrap(), vec![
            TodoItem{ uid: Some("Oat Milk".to_string()), summary: "Oat Milk".to_string(), status: TaskStatus::Completed },
        ]);

        let remote = server.list("Groceries").unwrap();
        assert_eq!(remote.items().len(), 1);
        assert_eq!(remote.items()[0].text(), "Oat Milk");
    }

    #[tokio::test]
    async fn update_requires_a_uid() {
        let (_server, entity) = entity().await;
        let item = TodoItem{ uid: None, summary: "Bread".to_string(), status: TaskStatus::Completed };
        assert!(matches!(entity.update_todo_item(&item).await, Err(Error::MissingItemId)));
    }
}
