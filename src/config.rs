//! Support for configuration options and config entries

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::utils::lock;

/// The domain this integration registers with the host
pub const DOMAIN: &str = "gkeep_sync";
/// The list that is used when none is configured
pub const DEFAULT_LIST_NAME: &str = "Shopping List";
/// The list that is used by the legacy `add_to_list` service when none is configured
pub const LEGACY_DEFAULT_LIST_NAME: &str = "Food Shopping";

/// How often a task list is fetched again
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(30 * 60);
/// How long a single fetch may take
pub const UPDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Prefix of the names shown to the user (e.g. `Google Keep (Shopping List)`).
/// Feel free to override it when initing this library.
pub static DISPLAY_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Google Keep".to_string())));

pub fn display_name() -> String {
    lock(&DISPLAY_NAME).clone()
}

pub(crate) fn default_list_name() -> String {
    DEFAULT_LIST_NAME.to_string()
}

/// The unique ID of the entry that manages `list_name`. There cannot be two entries for the same list
pub fn unique_id_for(list_name: &str) -> String {
    format!("{}_{}", DOMAIN, list_name)
}

/// The title shown for the entry that manages `list_name`
pub fn entry_title_for(list_name: &str) -> String {
    format!("{} ({})", display_name(), list_name)
}


/// What a config entry stores
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryData {
    pub email: String,
    /// Only needed until a master token has been obtained
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_token: Option<String>,
    #[serde(default = "default_list_name")]
    pub list_name: String,
}

impl EntryData {
    /// Check this entry is usable
    pub fn validate(&self) -> Result<(), Error> {
        if self.email.trim().is_empty() {
            return Err(Error::InvalidConfig("email is required".to_string()));
        }
        if self.list_name.trim().is_empty() {
            return Err(Error::InvalidConfig("list name is required".to_string()));
        }
        let has_password = self.password.as_ref().map(|p| p.is_empty() == false).unwrap_or(false);
        let has_token = self.master_token.as_ref().map(|t| t.is_empty() == false).unwrap_or(false);
        if has_password == false && has_token == false {
            return Err(Error::InvalidConfig("either a password or a master token is required".to_string()));
        }
        Ok(())
    }
}


/// A configured instance of this integration, that manages a single list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub unique_id: String,
    pub title: String,
    pub data: EntryData,
}

impl ConfigEntry {
    /// Create a brand new entry. This will pick a new (random) entry ID
    pub fn new(data: EntryData) -> Self {
        let entry_id = uuid::Uuid::new_v4().to_simple().to_string();
        Self {
            entry_id,
            unique_id: unique_id_for(&data.list_name),
            title: entry_title_for(&data.list_name),
            data,
        }
    }
}


/// Config entries, stored as JSON files in a folder
#[derive(Debug, PartialEq)]
pub struct EntryStore {
    backing_folder: PathBuf,
    entries: HashMap<String, ConfigEntry>,
}

impl EntryStore {
    /// Initialize a store from the content of a valid backing folder if it exists.
    /// Returns an error otherwise
    pub fn from_folder(folder: &Path) -> Result<Self, Error> {
        let mut entries = HashMap::new();
        for dir_entry in std::fs::read_dir(folder)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let file = std::fs::File::open(&path)?;
            let entry: ConfigEntry = match serde_json::from_reader(file) {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Ignoring invalid config entry file {:?}: {}", path, err);
                    continue;
                },
            };
            entries.insert(entry.entry_id.clone(), entry);
        }

        Ok(Self {
            backing_folder: PathBuf::from(folder),
            entries,
        })
    }

    /// Initialize an empty store
    pub fn new(folder: &Path) -> Self {
        Self {
            backing_folder: PathBuf::from(folder),
            entries: HashMap::new(),
        }
    }

    fn entry_path(&self, entry: &ConfigEntry) -> PathBuf {
        let file_name = sanitize_filename::sanitize(format!("{}.json", entry.unique_id));
        self.backing_folder.join(file_name)
    }

    /// Store the current entries to the backing folder
    pub fn save_to_folder(&self) -> Result<(), Error> {
        std::fs::create_dir_all(&self.backing_folder)?;
        for entry in self.entries.values() {
            let file = std::fs::File::create(self.entry_path(entry))?;
            serde_json::to_writer_pretty(file, entry)?;
        }
        Ok(())
    }

    /// Add an entry, or replace the entry that has the same entry ID
    pub fn add(&mut self, entry: ConfigEntry) {
        self.entries.insert(entry.entry_id.clone(), entry);
    }

    /// Remove an entry, and its backing file if it has been saved already
    pub fn remove(&mut self, entry_id: &str) -> Option<ConfigEntry> {
        let entry = self.entries.remove(entry_id)?;
        let path = self.entry_path(&entry);
        if path.exists() {
            if let Err(err) = std::fs::remove_file(&path) {
                log::warn!("Unable to remove {:?}: {}", path, err);
            }
        }
        Some(entry)
    }

    pub fn get(&self, entry_id: &str) -> Option<&ConfigEntry> {
        self.entries.get(entry_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.values()
    }

    /// The unique IDs that are already configured
    pub fn unique_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.unique_id.as_str())
    }
}
