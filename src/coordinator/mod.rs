//! Periodic polling of a task list
//!
//! Keep offers no push notifications, so the tasks of a list are fetched on a fixed interval.
//! A failed or timed out update is not fatal: the previous data is kept, and the next interval tries again.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::config::{UPDATE_INTERVAL, UPDATE_TIMEOUT};
use crate::error::Error;
use crate::task::TaskRecord;
use crate::traits::TaskListApi;
use crate::utils::lock;

pub mod update_event;
use update_event::{FeedbackReceiver, FeedbackSender, UpdateEvent};


#[derive(Debug, Default)]
struct CoordinatorState {
    data: Option<Vec<TaskRecord>>,
    last_update_success: bool,
    last_updated: Option<DateTime<Utc>>,
}

/// Fetches the tasks of a single task list, on a fixed interval and with a bounded timeout
pub struct TaskUpdateCoordinator<A: TaskListApi + ?Sized> {
    name: String,
    api: Arc<A>,
    task_list_id: String,
    update_interval: Duration,
    timeout: Duration,

    state: Mutex<CoordinatorState>,
    feedback: FeedbackSender,
    // Keeps the channel open even when nobody subscribed yet
    _feedback_receiver: FeedbackReceiver,
}

impl<A: TaskListApi + ?Sized> TaskUpdateCoordinator<A> {
    /// Create a coordinator. This does not fetch anything yet
    pub fn new(api: Arc<A>, task_list_id: &str) -> Self {
        let (feedback, receiver) = update_event::feedback_channel();
        Self {
            name: format!("{} ({})", crate::config::display_name(), task_list_id),
            api,
            task_list_id: task_list_id.to_string(),
            update_interval: UPDATE_INTERVAL,
            timeout: UPDATE_TIMEOUT,
            state: Mutex::new(CoordinatorState::default()),
            feedback,
            _feedback_receiver: receiver,
        }
    }

    /// Override the default polling interval and timeout
    pub fn with_timing(mut self, update_interval: Duration, timeout: Duration) -> Self {
        self.update_interval = update_interval;
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn task_list_id(&self) -> &str { &self.task_list_id }
    pub fn api(&self) -> &Arc<A> { &self.api }
    pub fn update_interval(&self) -> Duration { self.update_interval }
    pub fn timeout(&self) -> Duration { self.timeout }

    /// The tasks fetched by the last successful update (or `None` if no update has succeeded yet)
    pub fn data(&self) -> Option<Vec<TaskRecord>> {
        lock(&self.state).data.clone()
    }

    /// Whether the last update succeeded
    pub fn last_update_success(&self) -> bool {
        lock(&self.state).last_update_success
    }

    /// The last time an update succeeded
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        lock(&self.state).last_updated
    }

    /// Subscribe to the events of this coordinator
    pub fn subscribe(&self) -> FeedbackReceiver {
        self.feedback.subscribe()
    }

    fn feedback(&self, event: UpdateEvent) {
        self.feedback.send_replace(event);
    }

    /// Fetch the tasks now.
    ///
    /// In case of failure, the previous data is kept and the error is returned
    pub async fn refresh(&self) -> Result<(), Error> {
        log::debug!("Updating {}", self.name);
        self.feedback(UpdateEvent::Started);

        let outcome = match tokio::time::timeout(self.timeout, self.api.list_tasks(&self.task_list_id)).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => Err(Error::Timeout(self.timeout)),
        };

        match outcome {
            Ok(tasks) => {
                let n_items = tasks.len();
                {
                    let mut state = lock(&self.state);
                    state.data = Some(tasks);
                    state.last_update_success = true;
                    state.last_updated = Some(Utc::now());
                }
                log::debug!("Finished fetching {} data ({} tasks)", self.name, n_items);
                self.feedback(UpdateEvent::Updated{ items: n_items });
                Ok(())
            },
            Err(err) => {
                lock(&self.state).last_update_success = false;
                log::warn!("Error fetching {} data: {}", self.name, err);
                self.feedback(UpdateEvent::Failed{ reason: err.to_string() });
                Err(err)
            },
        }
    }
}

impl<A: TaskListApi + ?Sized + 'static> TaskUpdateCoordinator<A> {
    /// Start polling on a tokio task. The first update happens after one interval.
    ///
    /// Failed updates do not stop the polling. Abort the returned handle to stop it.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + coordinator.update_interval;
            let mut ticker = tokio::time::interval_at(start, coordinator.update_interval);
            loop {
                ticker.tick().await;
                // Errors have already been logged and reported
                let _ = coordinator.refresh().await;
            }
        })
    }
}
