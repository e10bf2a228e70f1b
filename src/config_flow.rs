//! The setup of a new config entry, from what the user typed in
//!
//! The password is only used once, to obtain a master token. The created entry stores the token instead.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigEntry, EntryData};
use crate::error::Error;
use crate::traits::KeepService;

/// The only step of this flow
pub const STEP_USER: &str = "user";

pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_LIST_NAME: &str = "list_name";
/// Errors that are not tied to a specific field
pub const FIELD_BASE: &str = "base";

pub const ERROR_REQUIRED: &str = "required";
pub const ERROR_INVALID_CREDENTIALS: &str = "invalid_credentials";
pub const ERROR_UNKNOWN: &str = "unknown_error";
pub const ABORT_ALREADY_CONFIGURED: &str = "already_configured";


/// What the user submitted in the setup form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    pub email: String,
    pub password: String,
    #[serde(default = "config::default_list_name")]
    pub list_name: String,
}

/// What the host should do next
#[derive(Clone, Debug, PartialEq)]
pub enum FlowResult {
    /// (Re-)display the form, with an error code per field
    ShowForm { step_id: &'static str, errors: BTreeMap<&'static str, &'static str> },
    /// Setup is complete
    CreateEntry(ConfigEntry),
    /// Setup cannot happen
    Abort { reason: &'static str },
}

impl FlowResult {
    fn form(errors: BTreeMap<&'static str, &'static str>) -> Self {
        FlowResult::ShowForm { step_id: STEP_USER, errors }
    }
}


/// Sets up new config entries.
///
/// `F` creates a fresh [`KeepService`] for every attempt.
pub struct ConfigFlow<K, F>
where
    K: KeepService + 'static,
    F: Fn() -> K,
{
    new_client: F,
    configured: HashSet<String>,
}

impl<K, F> ConfigFlow<K, F>
where
    K: KeepService + 'static,
    F: Fn() -> K,
{
    pub fn new(new_client: F) -> Self {
        Self { new_client, configured: HashSet::new() }
    }

    /// Unique IDs of the entries that already exist, so that the same list is not configured twice
    pub fn with_configured<I, S>(mut self, unique_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.configured.extend(unique_ids.into_iter().map(|id| id.to_string()));
        self
    }

    /// Handle the user step. `None` means the form has not been submitted yet
    pub async fn step_user(&self, user_input: Option<UserInput>) -> FlowResult {
        let input = match user_input {
            None => return FlowResult::form(BTreeMap::new()),
            Some(input) => input,
        };

        let errors = missing_fields(&input);
        if errors.is_empty() == false {
            return FlowResult::form(errors);
        }

        let mut keep = (self.new_client)();
        let email = input.email.clone();
        let password = input.password.clone();
        let login = tokio::task::spawn_blocking(move || -> Result<Option<String>, Error> {
            keep.login(&email, &password)?;
            Ok(keep.master_token())
        }).await;

        let mut errors = BTreeMap::new();
        match login.map_err(Error::from).and_then(|res| res) {
            Ok(Some(master_token)) if master_token.is_empty() == false => {
                let unique_id = config::unique_id_for(&input.list_name);
                if self.configured.contains(&unique_id) {
                    return FlowResult::Abort { reason: ABORT_ALREADY_CONFIGURED };
                }

                let data = EntryData {
                    email: input.email,
                    password: None,
                    master_token: Some(master_token),
                    list_name: input.list_name,
                };
                return FlowResult::CreateEntry(ConfigEntry::new(data));
            },
            Ok(_) => {
                log::error!("Login succeeded, but Keep did not hand out a master token");
                errors.insert(FIELD_BASE, ERROR_UNKNOWN);
            },
            Err(err) if err.is_auth_error() => {
                errors.insert(FIELD_PASSWORD, ERROR_INVALID_CREDENTIALS);
            },
            Err(err) => {
                log::error!("Unexpected error while logging in to Keep: {}", err);
                errors.insert(FIELD_BASE, ERROR_UNKNOWN);
            },
        }
        FlowResult::form(errors)
    }
}

fn missing_fields(input: &UserInput) -> BTreeMap<&'static str, &'static str> {
    let mut errors = BTreeMap::new();
    if input.email.trim().is_empty() {
        errors.insert(FIELD_EMAIL, ERROR_REQUIRED);
    }
    if input.password.is_empty() {
        errors.insert(FIELD_PASSWORD, ERROR_REQUIRED);
    }
    if input.list_name.trim().is_empty() {
        errors.insert(FIELD_LIST_NAME, ERROR_REQUIRED);
    }
    errors
}
