//! Error types for the todo view.
//!
//! # Design
//! `ApiError` keeps enough detail (status, body, decode message) for
//! diagnostics. Users never see it: the view maps every `ApiError` to one
//! generic message per operation, so a 404 and a 500 read the same.

use thiserror::Error;

use crate::types::TodoId;

/// Failures while building a request or interpreting its outcome.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered outside the 2xx range.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The host could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// The four calls the view makes against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Inline message shown when this operation fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Load => "Failed to load todo items",
            Operation::Create => "Unable to create todo item",
            Operation::Update => "Unable to update todo item",
            Operation::Delete => "Unable to delete todo item",
        }
    }

    /// Transient status shown when this operation succeeds, if any.
    pub fn success_message(self) -> Option<&'static str> {
        match self {
            Operation::Load => None,
            Operation::Create => Some("Item added successfully"),
            Operation::Update => Some("Item updated successfully"),
            Operation::Delete => Some("Item deleted successfully"),
        }
    }
}

pub const VALIDATION_MESSAGE: &str = "Title and description cannot be empty";

/// Errors surfaced by `TodoView` actions.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Title or description is empty after trimming. No request was built.
    #[error("Title and description cannot be empty")]
    Validation,

    /// The request for `operation` failed.
    #[error("{}", .operation.failure_message())]
    RequestFailure {
        operation: Operation,
        #[source]
        source: ApiError,
    },

    #[error("no todo item with id {0}")]
    UnknownItem(TodoId),

    #[error("the form is not editing an item")]
    NotEditing,
}

impl ViewError {
    pub(crate) fn request(operation: Operation, source: ApiError) -> Self {
        ViewError::RequestFailure { operation, source }
    }
}
