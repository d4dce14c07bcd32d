//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::collections::HashMap;
use std::ffi::CString;
use std::os::raw::c_char;

use todo_view::http::HttpMethod;
use todo_view::{HttpRequest, PendingOperation, StatusTicket, TodoView, ViewError, ViewSnapshot};

/// Opaque handle to a `TodoView`. C callers receive a pointer to this and
/// pass it back into every FFI function.
///
/// Requests in flight are remembered here by ticket, so the C side only has
/// to hand back a number with the response.
pub struct FfiTodoView {
    pub(crate) inner: TodoView,
    pending: HashMap<u64, PendingOperation>,
    next_ticket: u64,
}

impl FfiTodoView {
    pub(crate) fn new(inner: TodoView) -> Self {
        Self {
            inner,
            pending: HashMap::new(),
            next_ticket: 1,
        }
    }

    /// Remember `operation` and return the ticket that identifies it.
    pub(crate) fn track(&mut self, operation: PendingOperation) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending.insert(ticket, operation);
        ticket
    }

    pub(crate) fn take(&mut self, ticket: u64) -> Option<PendingOperation> {
        self.pending.remove(&ticket)
    }
}

/// Copy `s` into a heap C string, dropping interior NULs.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

fn optional_c_string(s: Option<String>) -> *mut c_char {
    s.map(into_c_string).unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request the C caller must execute, tagged with the ticket to pass back
/// to `todo_view_apply_response` or `todo_view_apply_transport_error`.
#[repr(C)]
pub struct FfiPendingRequest {
    pub ticket: u64,
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiPendingRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiPendingRequest`.
    pub(crate) fn from_core(ticket: u64, req: HttpRequest) -> *mut Self {
        let path = into_c_string(req.path);
        let body = optional_c_string(req.body);

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiPendingRequest {
            ticket,
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to `todo_view_apply_response`. The FFI layer reads but
/// does not free these fields. A null `body` is treated as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome codes for view operations.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Validation = 1,
    RequestFailed = 2,
    UnknownItem = 3,
    NotEditing = 4,
    UnknownTicket = 5,
    NullArg = 6,
    Panic = 7,
}

impl From<&ViewError> for FfiErrorCode {
    fn from(err: &ViewError) -> Self {
        match err {
            ViewError::Validation => FfiErrorCode::Validation,
            ViewError::RequestFailure { .. } => FfiErrorCode::RequestFailed,
            ViewError::UnknownItem(_) => FfiErrorCode::UnknownItem,
            ViewError::NotEditing => FfiErrorCode::NotEditing,
        }
    }
}

/// Returned by value from the apply functions.
///
/// `status_token` is 0 when no status message was shown. Otherwise the
/// caller should call `todo_view_clear_status(view, status_token)` after
/// `status_delay_ms` milliseconds. The user-facing error text, if any, is in
/// the next snapshot.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfiApplyResult {
    pub error_code: FfiErrorCode,
    pub status_token: u64,
    pub status_delay_ms: u64,
}

impl FfiApplyResult {
    pub(crate) fn error(error_code: FfiErrorCode) -> Self {
        Self {
            error_code,
            status_token: 0,
            status_delay_ms: 0,
        }
    }

    pub(crate) fn from_core(result: Result<Option<StatusTicket>, ViewError>) -> Self {
        match result {
            Ok(Some(ticket)) => Self {
                error_code: FfiErrorCode::Ok,
                status_token: ticket.token.as_raw(),
                status_delay_ms: ticket.delay.as_millis() as u64,
            },
            Ok(None) => Self::error(FfiErrorCode::Ok),
            Err(err) => Self::error(FfiErrorCode::from(&err)),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One list row exposed to C.
#[repr(C)]
pub struct FfiItemRow {
    pub id: *mut c_char,
    pub title: *mut c_char,
    pub description: *mut c_char,
}

/// Everything a C UI needs to draw the page. `status_message` and
/// `error_message` are null when nothing is shown.
#[repr(C)]
pub struct FfiViewSnapshot {
    pub editing: bool,
    pub heading: *mut c_char,
    pub action_label: *mut c_char,
    pub title: *mut c_char,
    pub description: *mut c_char,
    pub status_message: *mut c_char,
    pub error_message: *mut c_char,
    pub rows: *mut FfiItemRow,
    pub rows_len: u32,
}

impl FfiViewSnapshot {
    pub(crate) fn from_core(snapshot: ViewSnapshot) -> *mut Self {
        let heading = into_c_string(snapshot.heading().to_string());
        let action_label = into_c_string(snapshot.action_label().to_string());

        let rows_len = snapshot.rows.len() as u32;
        let rows = if snapshot.rows.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_rows: Box<[FfiItemRow]> = snapshot
                .rows
                .into_iter()
                .map(|row| FfiItemRow {
                    id: into_c_string(row.id.to_string()),
                    title: into_c_string(row.title),
                    description: into_c_string(row.description),
                })
                .collect();
            Box::into_raw(ffi_rows) as *mut FfiItemRow
        };

        Box::into_raw(Box::new(FfiViewSnapshot {
            editing: snapshot.editing,
            heading,
            action_label,
            title: into_c_string(snapshot.title),
            description: into_c_string(snapshot.description),
            status_message: optional_c_string(snapshot.status_message),
            error_message: optional_c_string(snapshot.error_message),
            rows,
            rows_len,
        }))
    }
}
