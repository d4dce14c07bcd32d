//! A drawable snapshot of the todo page.
//!
//! UI shells read `ViewSnapshot` fields directly; the `Display` impl lays the
//! same content out as plain text for terminals and logs.

use std::fmt;

use crate::types::{TodoId, TodoItem};

pub const PAGE_TITLE: &str = "Todo app";
pub const LIST_HEADING: &str = "Tasks";

/// One list row with its edit/delete target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: TodoId,
    pub title: String,
    pub description: String,
}

impl From<&TodoItem> for ItemRow {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub editing: bool,
    pub title: String,
    pub description: String,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
    pub rows: Vec<ItemRow>,
}

impl ViewSnapshot {
    pub fn heading(&self) -> &'static str {
        if self.editing {
            "Edit Item"
        } else {
            "Add Item"
        }
    }

    pub fn action_label(&self) -> &'static str {
        if self.editing {
            "Update"
        } else {
            "Submit"
        }
    }
}

impl fmt::Display for ViewSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {PAGE_TITLE}")?;
        writeln!(f)?;
        writeln!(f, "## {}", self.heading())?;
        if let Some(status) = &self.status_message {
            writeln!(f, "{status}")?;
        }
        writeln!(f, "title: [{}]", self.title)?;
        writeln!(f, "description: [{}]", self.description)?;
        writeln!(f, "<{}>", self.action_label())?;
        if let Some(error) = &self.error_message {
            writeln!(f, "! {error}")?;
        }
        writeln!(f)?;
        writeln!(f, "### {LIST_HEADING}")?;
        for row in &self.rows {
            writeln!(f, "- {} | {} [Edit] [Delete]", row.title, row.description)?;
        }
        Ok(())
    }
}
