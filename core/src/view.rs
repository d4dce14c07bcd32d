//! The todo page: list cache, form, and inline messages.
//!
//! # Design
//! Every action that talks to the API returns a `PendingRequest`. The host
//! executes `PendingRequest::request` and later passes the operation and its
//! outcome to `TodoView::apply`. Nothing is coordinated between requests in
//! flight; outcomes are applied in whatever order the host delivers them.
//! Update carries the title/description captured at dispatch, so edits typed
//! while the request is in flight do not leak into the list.
//!
//! # Invariants
//! - `FormMode::Editing(id)` always names an item present in `items`.
//! - No create or update request is built while either draft field is blank.
//! - Failed requests never change `items` or the form mode.

use std::time::Duration;

use tracing::{debug, warn};

use crate::cache;
use crate::client::TodoClient;
use crate::config::ViewConfig;
use crate::error::{ApiError, Operation, ViewError, VALIDATION_MESSAGE};
use crate::http::{HttpRequest, HttpResponse};
use crate::render::{ItemRow, ViewSnapshot};
use crate::status::{StatusSlot, StatusTicket, StatusToken};
use crate::types::{TodoDraft, TodoId, TodoItem};

/// Whether the form's primary action creates a new item or updates one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Creating,
    Editing(TodoId),
}

/// What a request in flight will do to the view once it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOperation {
    Load,
    Create,
    Update { id: TodoId, draft: TodoDraft },
    Delete { id: TodoId },
}

impl PendingOperation {
    pub fn operation(&self) -> Operation {
        match self {
            PendingOperation::Load => Operation::Load,
            PendingOperation::Create => Operation::Create,
            PendingOperation::Update { .. } => Operation::Update,
            PendingOperation::Delete { .. } => Operation::Delete,
        }
    }
}

/// A request for the host to execute, plus what to do with its outcome.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub operation: PendingOperation,
    pub request: HttpRequest,
}

#[derive(Debug)]
pub struct TodoView {
    client: TodoClient,
    status_clear_delay: Duration,
    items: Vec<TodoItem>,
    draft: TodoDraft,
    mode: FormMode,
    error_message: Option<String>,
    status: StatusSlot,
}

impl Default for TodoView {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}

impl TodoView {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            client: TodoClient::new(&config.base_url),
            status_clear_delay: config.status_clear_delay,
            items: Vec::new(),
            draft: TodoDraft::default(),
            mode: FormMode::Creating,
            error_message: None,
            status: StatusSlot::default(),
        }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn draft(&self) -> &TodoDraft {
        &self.draft
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn editing_id(&self) -> Option<&TodoId> {
        match &self.mode {
            FormMode::Creating => None,
            FormMode::Editing(id) => Some(id),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status.message()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Initial fetch of the whole list.
    pub fn mount(&mut self) -> PendingRequest {
        self.dispatch(PendingOperation::Load, self.client.build_list())
    }

    /// The form's primary action: create or update depending on the mode.
    pub fn submit(&mut self) -> Result<PendingRequest, ViewError> {
        match self.mode {
            FormMode::Creating => self.create(),
            FormMode::Editing(_) => self.update(),
        }
    }

    pub fn create(&mut self) -> Result<PendingRequest, ViewError> {
        self.error_message = None;
        self.validate_draft()?;
        match self.client.build_create(&self.draft) {
            Ok(request) => Ok(self.dispatch(PendingOperation::Create, request)),
            Err(source) => Err(self.fail(Operation::Create, source)),
        }
    }

    pub fn update(&mut self) -> Result<PendingRequest, ViewError> {
        self.error_message = None;
        let FormMode::Editing(id) = &self.mode else {
            return Err(ViewError::NotEditing);
        };
        let id = id.clone();
        self.validate_draft()?;
        match self.client.build_update(&id, &self.draft) {
            Ok(request) => {
                let draft = self.draft.clone();
                Ok(self.dispatch(PendingOperation::Update { id, draft }, request))
            }
            Err(source) => Err(self.fail(Operation::Update, source)),
        }
    }

    /// Switch the form to editing `id`, loading its fields into the draft.
    pub fn begin_edit(&mut self, id: &TodoId) -> Result<(), ViewError> {
        let item = self
            .items
            .iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| ViewError::UnknownItem(id.clone()))?;
        self.draft = TodoDraft::new(item.title.clone(), item.description.clone());
        self.mode = FormMode::Editing(id.clone());
        Ok(())
    }

    /// Leave edit mode without saving.
    pub fn cancel_edit(&mut self) {
        if self.mode != FormMode::Creating {
            self.mode = FormMode::Creating;
            self.draft.clear();
        }
    }

    pub fn delete(&mut self, id: &TodoId) -> PendingRequest {
        self.error_message = None;
        let request = self.client.build_delete(id);
        self.dispatch(PendingOperation::Delete { id: id.clone() }, request)
    }

    /// Apply the outcome of a request built by this view.
    ///
    /// `outcome` is the response, or `ApiError::Transport` when the host
    /// could not complete the round-trip. On success with a visible status
    /// message, the returned ticket tells the host when to clear it.
    pub fn apply(
        &mut self,
        pending: PendingOperation,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<Option<StatusTicket>, ViewError> {
        let operation = pending.operation();
        let response = outcome.map_err(|source| self.fail(operation, source))?;
        debug!(?operation, status = response.status, "applying todo response");

        match pending {
            PendingOperation::Load => {
                let loaded = self
                    .client
                    .parse_list(response)
                    .map_err(|source| self.fail(operation, source))?;
                cache::apply_loaded(&mut self.items, loaded);
                self.drop_stale_edit();
                return Ok(None);
            }
            PendingOperation::Create => {
                let created = self
                    .client
                    .parse_create(response)
                    .map_err(|source| self.fail(operation, source))?;
                cache::apply_created(&mut self.items, created);
                if self.mode == FormMode::Creating {
                    self.draft.clear();
                }
            }
            PendingOperation::Update { id, draft } => {
                self.client
                    .parse_update(response)
                    .map_err(|source| self.fail(operation, source))?;
                if !cache::apply_updated(&mut self.items, &id, &draft) {
                    debug!(%id, "updated item no longer listed");
                }
                if self.mode == FormMode::Editing(id) {
                    self.mode = FormMode::Creating;
                    self.draft.clear();
                }
            }
            PendingOperation::Delete { id } => {
                self.client
                    .parse_delete(response)
                    .map_err(|source| self.fail(operation, source))?;
                cache::apply_deleted(&mut self.items, &id);
                self.drop_stale_edit();
            }
        }

        self.error_message = None;
        Ok(operation
            .success_message()
            .map(|message| self.status.show(message, self.status_clear_delay)))
    }

    /// Clear the status shown under `token`. A token from an older message
    /// is ignored.
    pub fn clear_status(&mut self, token: StatusToken) -> bool {
        self.status.clear(token)
    }

    pub fn render(&self) -> ViewSnapshot {
        ViewSnapshot {
            editing: self.editing_id().is_some(),
            title: self.draft.title.clone(),
            description: self.draft.description.clone(),
            status_message: self.status.message().map(str::to_string),
            error_message: self.error_message.clone(),
            rows: self.items.iter().map(ItemRow::from).collect(),
        }
    }

    fn dispatch(&self, operation: PendingOperation, request: HttpRequest) -> PendingRequest {
        debug!(method = %request.method, path = %request.path, "dispatching todo request");
        PendingRequest { operation, request }
    }

    fn validate_draft(&mut self) -> Result<(), ViewError> {
        if self.draft.is_complete() {
            return Ok(());
        }
        self.error_message = Some(VALIDATION_MESSAGE.to_string());
        Err(ViewError::Validation)
    }

    fn fail(&mut self, operation: Operation, source: ApiError) -> ViewError {
        warn!(?operation, error = %source, "todo request failed");
        self.error_message = Some(operation.failure_message().to_string());
        ViewError::request(operation, source)
    }

    fn drop_stale_edit(&mut self) {
        let FormMode::Editing(id) = &self.mode else {
            return;
        };
        if !self.items.iter().any(|item| &item.id == id) {
            self.mode = FormMode::Creating;
            self.draft.clear();
        }
    }
}
