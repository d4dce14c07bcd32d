//! Todo list view core: form state, list cache and the todo API contract.
//!
//! # Overview
//! `TodoView` holds everything the todo page shows: the item list, the
//! title/description draft, the form mode, and the inline error and status
//! lines. Each user action turns into at most one `HttpRequest`; the host
//! executes it and feeds the `HttpResponse` back (host-does-IO pattern), so
//! the view stays deterministic and testable without a network.
//!
//! # Design
//! - `TodoClient` builds requests and parses responses, nothing more.
//! - `cache` holds the pure "apply server result to the local list" steps.
//! - `StatusSlot` hands out a token per status message so a stale clear
//!   timer never wipes a newer message.
//! - `render` turns the view into a `ViewSnapshot` a UI shell can draw.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod render;
pub mod status;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use config::ViewConfig;
pub use error::{ApiError, Operation, ViewError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use render::{ItemRow, ViewSnapshot};
pub use status::{StatusTicket, StatusToken};
pub use types::{TodoDraft, TodoId, TodoItem};
pub use view::{FormMode, PendingOperation, PendingRequest, TodoView};
