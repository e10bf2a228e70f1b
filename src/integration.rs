//! Lifecycle of the loaded config entries
//!
//! Every loaded entry owns its [`Session`]. It is created by [`Integration::setup_entry`], and torn down by [`Integration::unload_entry`].

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::ConfigEntry;
use crate::coordinator::TaskUpdateCoordinator;
use crate::error::Error;
use crate::session::Session;
use crate::todo::TodoListEntity;
use crate::traits::KeepService;


/// A config entry that has been set up
pub struct LoadedEntry<K: KeepService + 'static> {
    entry: ConfigEntry,
    session: Arc<Session<K>>,
    entity: TodoListEntity<Session<K>>,
    poller: JoinHandle<()>,
}

impl<K: KeepService + 'static> LoadedEntry<K> {
    /// The entry, as it should now be stored (i.e. with a master token instead of a password)
    pub fn entry(&self) -> &ConfigEntry { &self.entry }
    pub fn session(&self) -> &Arc<Session<K>> { &self.session }
    pub fn entity(&self) -> &TodoListEntity<Session<K>> { &self.entity }
}


/// Every loaded config entry of this integration, by entry ID
pub struct Integration<K: KeepService + 'static> {
    loaded: HashMap<String, LoadedEntry<K>>,
}

impl<K: KeepService + 'static> Default for Integration<K> {
    fn default() -> Self {
        Self { loaded: HashMap::new() }
    }
}

impl<K: KeepService + 'static> Integration<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set up a config entry: authenticate, fetch its list once, then keep polling it.
    ///
    /// Authentication errors are returned as is. Other failures of the first fetch are returned as [`Error::NotReady`],
    /// so that the host can try again later.
    pub async fn setup_entry(&mut self, mut entry: ConfigEntry, keep: K) -> Result<(), Error> {
        entry.data.validate()?;
        if self.loaded.contains_key(&entry.entry_id) {
            return Err(Error::InvalidConfig(format!("entry {} is already loaded", entry.entry_id)));
        }

        let session = Arc::new(Session::new(
            keep,
            &entry.data.email,
            entry.data.password.clone(),
            entry.data.master_token.clone(),
        ));

        let token = session.access_token().await?;
        entry.data.master_token = Some(token);
        entry.data.password = None;

        let coordinator = Arc::new(TaskUpdateCoordinator::new(Arc::clone(&session), &entry.data.list_name));
        if let Err(err) = coordinator.refresh().await {
            session.close();
            return Err(Error::NotReady(err.to_string()));
        }

        let poller = coordinator.spawn();
        let entity = TodoListEntity::new(&entry.entry_id, coordinator);
        log::info!("Set up {}", entry.title);

        self.loaded.insert(entry.entry_id.clone(), LoadedEntry { entry, session, entity, poller });
        Ok(())
    }

    /// Stop polling and close the session of an entry.
    ///
    /// Returns whether this entry was loaded
    pub fn unload_entry(&mut self, entry_id: &str) -> bool {
        match self.loaded.remove(entry_id) {
            None => false,
            Some(loaded) => {
                loaded.poller.abort();
                loaded.session.close();
                log::info!("Unloaded {}", loaded.entry.title);
                true
            },
        }
    }

    pub fn get(&self, entry_id: &str) -> Option<&LoadedEntry<K>> {
        self.loaded.get(entry_id)
    }

    pub fn loaded_entries(&self) -> impl Iterator<Item = &LoadedEntry<K>> {
        self.loaded.values()
    }
}

impl<K: KeepService + 'static> Drop for Integration<K> {
    fn drop(&mut self) {
        for loaded in self.loaded.values() {
            loaded.poller.abort();
        }
    }
}
