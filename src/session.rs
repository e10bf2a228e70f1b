//! An authenticated connection to Keep, owned by a single config entry

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::Error;
use crate::reconcile;
use crate::task::{TaskListRecord, TaskRecord, TaskUpdate};
use crate::traits::{KeepService, TaskListApi};
use crate::utils::lock;


#[derive(Debug, Default)]
struct AuthState {
    /// Only kept until a master token has been obtained
    password: Option<String>,
    master_token: Option<String>,
    initialised: bool,
    closed: bool,
}

/// A [`KeepService`] together with the credentials it is authenticated with.
///
/// A session is created when a config entry is set up, and closed when it is unloaded. \
/// `KeepService` calls are blocking, so they are all run on tokio's blocking thread pool.
pub struct Session<K: KeepService + 'static> {
    keep: Arc<Mutex<K>>,
    email: String,
    auth: Mutex<AuthState>,
}

impl<K: KeepService + 'static> Session<K> {
    /// Create a session. This does not start a connection.
    ///
    /// At least one of `password` and `master_token` is needed. The master token is preferred when both are given.
    pub fn new<S: ToString>(keep: K, email: S, password: Option<String>, master_token: Option<String>) -> Self {
        let auth = AuthState {
            password: password.filter(|p| p.is_empty() == false),
            master_token: master_token.filter(|t| t.is_empty() == false),
            initialised: false,
            closed: false,
        };
        Self {
            keep: Arc::new(Mutex::new(keep)),
            email: email.to_string(),
            auth: Mutex::new(auth),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the master token, logging in or resuming the session if this has not been done yet.
    ///
    /// After a password login, the password is forgotten and only the master token is kept.
    pub async fn access_token(&self) -> Result<String, Error> {
        let (password, master_token) = {
            let auth = lock(&self.auth);
            if auth.closed {
                return Err(Error::SessionClosed);
            }
            if auth.initialised {
                if let Some(token) = &auth.master_token {
                    return Ok(token.clone());
                }
            }
            (auth.password.clone(), auth.master_token.clone())
        };

        let keep = Arc::clone(&self.keep);
        let email = self.email.clone();
        let token = tokio::task::spawn_blocking(move || -> Result<String, Error> {
            let mut keep = lock(&keep);
            match (master_token, password) {
                (Some(token), _) => {
                    log::debug!("Resuming Keep session for {}", email);
                    keep.resume(&email, &token)?;
                    Ok(token)
                },
                (None, Some(password)) => {
                    log::debug!("Logging in to Keep as {}", email);
                    keep.login(&email, &password)?;
                    keep.master_token()
                        .filter(|token| token.is_empty() == false)
                        .ok_or(Error::MissingMasterToken)
                },
                (None, None) => Err(Error::InvalidConfig("neither a password nor a master token is available".to_string())),
            }
        }).await??;

        let mut auth = lock(&self.auth);
        auth.master_token = Some(token.clone());
        auth.password = None;
        auth.initialised = true;
        Ok(token)
    }

    /// Tear this session down. Every later call will fail with [`Error::SessionClosed`]
    pub fn close(&self) {
        let mut auth = lock(&self.auth);
        auth.closed = true;
        auth.password = None;
        log::debug!("Closed Keep session for {}", self.email);
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.auth).closed
    }

    /// Run `f` on the (authenticated) Keep client, on a worker thread
    async fn run_blocking<T, F>(&self, f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&mut K) -> Result<T, Error> + Send + 'static,
    {
        self.access_token().await?;

        let keep = Arc::clone(&self.keep);
        tokio::task::spawn_blocking(move || {
            let mut keep = lock(&keep);
            f(&mut *keep)
        }).await?
    }

    /// Add items to a list (creating it if needed). Items that are already on the list are unchecked instead
    pub async fn add_to_list(&self, list_name: &str, items: Vec<String>) -> Result<(), Error> {
        let list_name = list_name.to_string();
        self.run_blocking(move |keep| {
            keep.sync()?;
            let list = reconcile::get_or_create_list(keep, &list_name)?;
            reconcile::reconcile(list, &items);
            keep.sync()
        }).await
    }
}

#[async_trait]
impl<K: KeepService + 'static> TaskListApi for Session<K> {
    async fn list_task_lists(&self) -> Result<Vec<TaskListRecord>, Error> {
        self.run_blocking(|keep| {
            keep.sync()?;
            Ok(keep.notes().iter()
                .filter_map(|note| note.as_list())
                .map(TaskListRecord::from)
                .collect())
        }).await
    }

    async fn list_tasks(&self, task_list_id: &str) -> Result<Vec<TaskRecord>, Error> {
        let task_list_id = task_list_id.to_string();
        self.run_blocking(move |keep| {
            keep.sync()?;
            let n_notes = keep.notes().len();
            let tasks: Vec<TaskRecord> = reconcile::get_or_create_list(keep, &task_list_id)?
                .items().iter()
                .map(TaskRecord::from)
                .collect();
            if keep.notes().len() != n_notes {
                // The list has just been created
                keep.sync()?;
            }
            Ok(tasks)
        }).await
    }

    async fn insert(&self, task_list_id: &str, task: &TaskUpdate) -> Result<(), Error> {
        self.add_to_list(task_list_id, vec![task.title.clone()]).await
    }

    async fn patch(&self, task_list_id: &str, task_id: &str, task: &TaskUpdate) -> Result<(), Error> {
        let task_list_id = task_list_id.to_string();
        let task_id = task_id.to_string();
        let task = task.clone();
        self.run_blocking(move |keep| {
            keep.sync()?;
            let list = reconcile::get_or_create_list(keep, &task_list_id)?;
            reconcile::patch(list, &task_id, &task);
            keep.sync()
        }).await
    }
}
