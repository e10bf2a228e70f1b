//! Merging requested items into Keep lists
//!
//! Keep has no "upsert" primitive, and no case-insensitive index.
//! Before adding an item, we thus scan the whole list for an item that has the same text regardless of case, and re-use it.
//!
//! Lists and items are looked up by their title or text, because that is all the host knows about them.
//! A consequence is that renaming an item and then addressing it by its former text does nothing.

use crate::error::Error;
use crate::note::KeepList;
use crate::task::TaskUpdate;
use crate::traits::KeepService;

/// The token that separates several items in a single spoken/typed string
pub const ITEM_SEPARATOR: &str = " and ";


/// Merge `requested` item texts into `list`, in input order.
///
/// For every requested text, the first item that has the same text (regardless of case) is unchecked.
/// If there is no such item, a new unchecked item is appended. \
/// Duplicates that already exist on the list are left untouched.
pub fn reconcile<S: AsRef<str>>(list: &mut KeepList, requested: &[S]) {
    for text in requested {
        let text = text.as_ref();
        match list.items_mut().iter_mut().find(|item| item.matches(text)) {
            Some(existing) => {
                log::debug!("{:?} is already on the list, unchecking it", existing.text());
                existing.set_checked(false);
            },
            None => {
                log::debug!("Adding {:?}", text);
                list.add(text.to_string(), false);
            },
        }
    }
}

/// Overwrite the first item whose text matches `task_id` (regardless of case).
///
/// Returns whether an item has been found
pub fn patch(list: &mut KeepList, task_id: &str, task: &TaskUpdate) -> bool {
    match list.items_mut().iter_mut().find(|item| item.matches(task_id)) {
        None => {
            log::debug!("No item {:?} on list {:?}, nothing to update", task_id, list.title());
            false
        },
        Some(item) => {
            item.set_text(task.title.clone());
            item.set_checked(task.status.is_completed());
            true
        },
    }
}

/// Split every item that contains [`ITEM_SEPARATOR`], e.g. `"bread and butter"` becomes `["bread", "butter"]`.
///
/// Empty parts are dropped.
pub fn split_items<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter()
        .flat_map(|item| item.as_ref().split(ITEM_SEPARATOR))
        .filter(|part| part.is_empty() == false)
        .map(|part| part.to_string())
        .collect()
}

/// Find the list whose title is exactly `title`.
///
/// Text notes are never considered, even if they have the same title.
pub fn find_list<'a>(keep: &'a dyn KeepService, title: &str) -> Option<&'a KeepList> {
    keep.notes().iter()
        .filter_map(|note| note.as_list())
        .find(|list| list.title() == title)
}

/// Find the list whose title is exactly `title`, or create it if there is none
pub fn get_or_create_list<'a, K>(keep: &'a mut K, title: &str) -> Result<&'a mut KeepList, Error>
where
    K: KeepService + ?Sized,
{
    let position = keep.notes().iter()
        .position(|note| note.as_list().map(|list| list.title() == title).unwrap_or(false));

    match position {
        Some(index) => keep.notes_mut()[index]
            .as_list_mut()
            .ok_or_else(|| Error::Inconsistent(format!("note {:?} is not a list anymore", title))),
        None => {
            log::info!("List with name {} not found on Keep. Creating new list.", title);
            keep.create_list(title)
        },
    }
}
