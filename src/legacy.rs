//! The earliest revision of this integration: a single `add_to_list` service
//!
//! It is configured with a username and password, and adds items to a list given by name (or to a default list).
//! Items may be given as a list, or as a single string such as `"bread, milk and eggs"`.

use serde::{Deserialize, Serialize};

use crate::config::LEGACY_DEFAULT_LIST_NAME;
use crate::error::Error;
use crate::reconcile;
use crate::session::Session;
use crate::traits::KeepService;

/// The name this service is registered with
pub const SERVICE_ADD_TO_LIST: &str = "add_to_list";

fn legacy_default_list_name() -> String {
    LEGACY_DEFAULT_LIST_NAME.to_string()
}

/// Configuration of the legacy integration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyConfig {
    pub username: String,
    pub password: String,
    #[serde(default = "legacy_default_list_name")]
    pub list_name: String,
}

impl LegacyConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.trim().is_empty() {
            return Err(Error::InvalidConfig("username is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(Error::InvalidConfig("password is required".to_string()));
        }
        Ok(())
    }
}


/// Items of an `add_to_list` call: either a list, or a comma-separated string
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsField {
    One(String),
    Many(Vec<String>),
}

impl ItemsField {
    /// Turn these items into a list. A single string is split on commas
    pub fn into_list(self) -> Vec<String> {
        match self {
            ItemsField::Many(items) => items,
            ItemsField::One(csv) => csv.split(',')
                .map(|part| part.trim())
                .filter(|part| part.is_empty() == false)
                .map(|part| part.to_string())
                .collect(),
        }
    }
}

/// The data of an `add_to_list` call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddToListCall {
    /// The list to add to. Defaults to the configured list
    #[serde(default)]
    pub name: Option<String>,
    pub items: ItemsField,
}


/// The legacy integration, once set up
pub struct LegacyService<K: KeepService + 'static> {
    session: Session<K>,
    default_list_name: String,
}

impl<K: KeepService + 'static> LegacyService<K> {
    /// Log in. The service is only available if this succeeds
    pub async fn setup(config: LegacyConfig, keep: K) -> Result<Self, Error> {
        config.validate()?;

        let session = Session::new(keep, &config.username, Some(config.password), None);
        if let Err(err) = session.access_token().await {
            log::error!("Google Keep login failed: {}", err);
            return Err(err);
        }

        Ok(Self {
            session,
            default_list_name: config.list_name,
        })
    }

    pub fn default_list_name(&self) -> &str {
        &self.default_list_name
    }

    /// Add items to a Keep list
    pub async fn add_to_list(&self, call: AddToListCall) -> Result<(), Error> {
        let list_name = call.name.unwrap_or_else(|| self.default_list_name.clone());
        let items = reconcile::split_items(&call.items.into_list());

        log::info!("items to add: {:?}", items);
        self.session.add_to_list(&list_name, items).await
    }

    /// Dispatch a raw service call, as the host sends it
    pub async fn handle_call(&self, service: &str, data: serde_json::Value) -> Result<(), Error> {
        if service != SERVICE_ADD_TO_LIST {
            return Err(Error::InvalidConfig(format!("unknown service {:?}", service)));
        }
        let call: AddToListCall = serde_json::from_value(data)?;
        self.add_to_list(call).await
    }

    /// Log out
    pub fn teardown(self) {
        self.session.close();
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_field() {
        let call: AddToListCall = serde_json::from_str(r#"{"items": "bread and butter"}"#).unwrap();
        assert_eq!(call.name, None);
        assert_eq!(call.items.into_list(), vec!["bread and butter"]);

        let call: AddToListCall = serde_json::from_str(r#"{"name": "Party", "items": "chips, dip ,, soda"}"#).unwrap();
        assert_eq!(call.name.as_deref(), Some("Party"));
        assert_eq!(call.items.into_list(), vec!["chips", "dip", "soda"]);

        let call: AddToListCall = serde_json::from_str(r#"{"items": ["milk, eggs", "jam"]}"#).unwrap();
        assert_eq!(call.items.into_list(), vec!["milk, eggs", "jam"]);

        assert!(serde_json::from_str::<AddToListCall>(r#"{"name": "Party"}"#).is_err());
    }

    #[test]
    fn config_defaults() {
        let config: LegacyConfig = serde_json::from_str(r#"{"username": "me@example.com", "password": "secret"}"#).unwrap();
        assert_eq!(config.list_name, "Food Shopping");
        assert!(config.validate().is_ok());

        let config = LegacyConfig{ username: "me@example.com".to_string(), password: String::new(), list_name: "x".to_string() };
        assert!(config.validate().is_err());
    }
}
