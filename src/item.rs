//! Items of a Keep list

use serde::{Deserialize, Serialize};

/// A line of a Keep list: some text, and whether it has been checked
///
/// Items have a server-side `id`, but this crate never uses it as a lookup key: items are addressed by their text,
/// which is the only thing the host knows about them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// The identifier given by the remote service
    id: String,
    text: String,
    checked: bool,

    /// Whether this item has been modified since the last sync
    dirty: bool,
}

impl ListItem {
    /// Create a brand new item that is not on the server yet.
    /// This will pick a new (random) ID.
    pub fn new(text: String, checked: bool) -> Self {
        let new_id = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self {
            id: new_id,
            text,
            checked,
            dirty: true,
        }
    }

    /// Create an item that already exists on the server
    pub fn new_with_parameters(id: String, text: String, checked: bool) -> Self {
        Self { id, text, checked, dirty: false }
    }

    pub fn id(&self) -> &str       { &self.id      }
    pub fn text(&self) -> &str     { &self.text    }
    pub fn checked(&self) -> bool  { self.checked  }
    pub fn is_dirty(&self) -> bool { self.dirty    }

    /// Whether this item's text is `text`, regardless of case
    pub fn matches(&self, text: &str) -> bool {
        crate::utils::texts_match(&self.text, text)
    }

    /// Change the text of this item
    pub fn set_text(&mut self, new_text: String) {
        if self.text == new_text {
            return;
        }
        self.dirty = true;
        self.text = new_text;
    }

    /// Check or uncheck this item. This is a no-op in case it already has the requested status
    pub fn set_checked(&mut self, checked: bool) {
        if self.checked == checked {
            return;
        }
        self.dirty = true;
        self.checked = checked;
    }

    /// Mark this item as being the same as its server counterpart
    pub fn mark_synced(&mut self) {
        self.dirty = false;
    }
}
