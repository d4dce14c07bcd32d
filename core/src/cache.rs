//! Reconcile the local item list with a successful API result.
//!
//! One function per operation. None of them touch the form or the messages;
//! `TodoView` decides that.

use crate::types::{TodoDraft, TodoId, TodoItem};

/// Replace the list with what the server returned.
pub fn apply_loaded(items: &mut Vec<TodoItem>, loaded: Vec<TodoItem>) {
    *items = loaded;
}

/// Append the server's copy of a new item.
pub fn apply_created(items: &mut Vec<TodoItem>, created: TodoItem) {
    items.push(created);
}

/// Patch the matching entry in place. Returns false when no entry has `id`.
pub fn apply_updated(items: &mut [TodoItem], id: &TodoId, draft: &TodoDraft) -> bool {
    match items.iter_mut().find(|item| &item.id == id) {
        Some(item) => {
            item.title.clone_from(&draft.title);
            item.description.clone_from(&draft.description);
            true
        }
        None => false,
    }
}

/// Drop the entry with `id`. Returns false when it was already gone.
pub fn apply_deleted(items: &mut Vec<TodoItem>, id: &TodoId) -> bool {
    let before = items.len();
    items.retain(|item| &item.id != id);
    items.len() != before
}
