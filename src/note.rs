//! Keep notes (either text notes or lists)

use serde::{Deserialize, Serialize};

use crate::item::ListItem;


/// A node of a Keep account, as returned by [`KeepService::notes`](crate::traits::KeepService::notes)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Note {
    Text(TextNote),
    List(KeepList),
}

/// Returns `text_note.$property_name` or `list.$property_name`, depending on whether self is a text note or a list
macro_rules! synthetise_common_getter {
    ($property_name:ident, $return_type:ty) => {
        pub fn $property_name(&self) -> $return_type {
            match self {
                Note::Text(n) => n.$property_name(),
                Note::List(l) => l.$property_name(),
            }
        }
    }
}

impl Note {
    synthetise_common_getter!(id, &str);
    synthetise_common_getter!(title, &str);
    synthetise_common_getter!(is_dirty, bool);

    pub fn is_list(&self) -> bool {
        matches!(self, Note::List(_))
    }

    pub fn as_list(&self) -> Option<&KeepList> {
        match self {
            Note::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut KeepList> {
        match self {
            Note::List(l) => Some(l),
            _ => None,
        }
    }

    /// Mark this note (and every item it contains) as being the same as its server counterpart
    pub fn mark_synced(&mut self) {
        match self {
            Note::Text(n) => n.dirty = false,
            Note::List(l) => l.mark_synced(),
        }
    }
}


/// A plain text note. These are never exposed as task lists
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextNote {
    id: String,
    title: String,
    text: String,
    dirty: bool,
}

impl TextNote {
    pub fn new(title: String, text: String) -> Self {
        let id = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { id, title, text, dirty: true }
    }

    pub fn id(&self) -> &str      { &self.id    }
    pub fn title(&self) -> &str   { &self.title }
    pub fn text(&self) -> &str    { &self.text  }
    pub fn is_dirty(&self) -> bool { self.dirty }
}


/// A Keep list.
///
/// Its title is both its display name and the only key this crate looks it up with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeepList {
    id: String,
    title: String,
    items: Vec<ListItem>,
    dirty: bool,
}

impl KeepList {
    /// Create a new, empty list that is not on the server yet
    pub fn new(title: String) -> Self {
        let id = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { id, title, items: Vec::new(), dirty: true }
    }

    /// Create a list that already exists on the server
    pub fn new_with_items(id: String, title: String, items: Vec<ListItem>) -> Self {
        Self { id, title, items, dirty: false }
    }

    pub fn id(&self) -> &str           { &self.id    }
    pub fn title(&self) -> &str        { &self.title }
    pub fn items(&self) -> &[ListItem] { &self.items }
    pub fn items_mut(&mut self) -> &mut [ListItem] { &mut self.items }

    /// Whether this list or any of its items has been modified since the last sync
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.items.iter().any(|item| item.is_dirty())
    }

    /// Append a new item at the end of this list
    pub fn add(&mut self, text: String, checked: bool) -> &mut ListItem {
        self.dirty = true;
        self.items.push(ListItem::new(text, checked));
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn mark_synced(&mut self) {
        self.dirty = false;
        for item in self.items.iter_mut() {
            item.mark_synced();
        }
    }
}
