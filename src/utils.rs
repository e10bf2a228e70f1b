//! Some utility functions

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::item::ListItem;
use crate::note::{KeepList, Note};

/// Whether two item texts are the same, regardless of case
pub fn texts_match(left: &str, right: &str) -> bool {
    left == right || left.to_lowercase() == right.to_lowercase()
}

/// Lock a mutex, even if a previous holder panicked.
///
/// The data behind our mutexes stays consistent across panics (they only hold plain values), so poisoning is ignored.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A debug utility that pretty-prints notes
pub fn print_notes(notes: &[Note]) {
    for note in notes {
        match note {
            Note::List(list) => print_list(list),
            Note::Text(text) => println!("NOTE {} ({})", text.title(), text.id()),
        }
    }
}

/// A debug utility that pretty-prints a list
pub fn print_list(list: &KeepList) {
    println!("LIST {} ({})", list.title(), list.id());
    for item in list.items() {
        print_item(item);
    }
}

pub fn print_item(item: &ListItem) {
    let completion = if item.checked() { "✓" } else { " " };
    let sync = if item.is_dirty() { "~" } else { "=" };
    println!("    {}{} {}\t{}", completion, sync, item.text(), item.id());
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texts_match_ignores_case_only() {
        assert!(texts_match("Milk", "milk"));
        assert!(texts_match("ÉCLAIR", "éclair"));
        assert!(texts_match("Milk", "Milk"));
        assert!(texts_match("Milk", "Milky") == false);
        assert!(texts_match(" Milk", "Milk") == false);
    }

    #[test]
    fn lock_survives_poisoning() {
        let mutex = std::sync::Arc::new(Mutex::new(1));
        let cloned = mutex.clone();
        let _ = std::thread::spawn(move || {
            let _guard = cloned.lock().unwrap();
            panic!("poisoning the mutex");
        }).join();

        assert!(mutex.is_poisoned());
        assert_eq!(*lock(&mutex), 1);
    }
}
