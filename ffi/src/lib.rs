//! C-ABI wrapper around the `todo-view` core.
//!
//! # Overview
//! Lets a native UI shell drive the todo page: it forwards input and clicks
//! to `todo_view_*` functions, executes the requests they return, feeds the
//! responses back, and redraws from `todo_view_snapshot`.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Requests in flight are identified by a `ticket`; the view handle keeps
//!   the matching operation so C never sees Rust-side context.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_*_free` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use todo_view::{ApiError, HttpResponse, PendingRequest, StatusToken, TodoId, TodoView, ViewConfig};
use tracing::warn;

use types::*;

/// Read a caller-owned C string. Returns `None` for null; invalid UTF-8 is
/// replaced rather than rejected.
fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

fn hand_out(view: &mut FfiTodoView, pending: PendingRequest) -> *mut FfiPendingRequest {
    let ticket = view.track(pending.operation);
    FfiPendingRequest::from_core(ticket, pending.request)
}

// ---------------------------------------------------------------------------
// View lifecycle
// ---------------------------------------------------------------------------

/// Create a view bound to `base_url`, or to the hosted API when `base_url`
/// is null.
///
/// Returns null if an internal panic occurs.
/// The caller must free the returned pointer with `todo_view_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_new(base_url: *const c_char) -> *mut FfiTodoView {
    catch_unwind(|| {
        let mut config = ViewConfig::default();
        if let Some(url) = read_str(base_url) {
            config = config.with_base_url(url);
        }
        Box::into_raw(Box::new(FfiTodoView::new(TodoView::new(&config))))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a view created by `todo_view_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_free(view: *mut FfiTodoView) {
    if !view.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(view) });
        });
    }
}

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Replace the draft title. A null `title` clears it.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_set_title(view: *mut FfiTodoView, title: *const c_char) -> FfiErrorCode {
    catch_unwind(|| {
        if view.is_null() {
            return FfiErrorCode::NullArg;
        }
        let view = unsafe { &mut *view };
        view.inner.set_title(read_str(title).unwrap_or_default());
        FfiErrorCode::Ok
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// Replace the draft description. A null `description` clears it.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_set_description(
    view: *mut FfiTodoView,
    description: *const c_char,
) -> FfiErrorCode {
    catch_unwind(|| {
        if view.is_null() {
            return FfiErrorCode::NullArg;
        }
        let view = unsafe { &mut *view };
        view.inner.set_description(read_str(description).unwrap_or_default());
        FfiErrorCode::Ok
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// Put the form in edit mode for the item with `id`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_begin_edit(view: *mut FfiTodoView, id: *const c_char) -> FfiErrorCode {
    catch_unwind(|| {
        if view.is_null() {
            return FfiErrorCode::NullArg;
        }
        let Some(id) = read_str(id) else {
            return FfiErrorCode::NullArg;
        };
        let view = unsafe { &mut *view };
        match view.inner.begin_edit(&TodoId::new(id)) {
            Ok(()) => FfiErrorCode::Ok,
            Err(err) => FfiErrorCode::from(&err),
        }
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// Leave edit mode and clear the draft.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_cancel_edit(view: *mut FfiTodoView) -> FfiErrorCode {
    catch_unwind(|| {
        if view.is_null() {
            return FfiErrorCode::NullArg;
        }
        let view = unsafe { &mut *view };
        view.inner.cancel_edit();
        FfiErrorCode::Ok
    })
    .unwrap_or(FfiErrorCode::Panic)
}

// ---------------------------------------------------------------------------
// Actions that produce requests
// ---------------------------------------------------------------------------

/// Request for the initial list load.
///
/// Returns null if `view` is null.
/// The caller must free the returned pointer with `todo_pending_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_mount(view: *mut FfiTodoView) -> *mut FfiPendingRequest {
    catch_unwind(|| {
        if view.is_null() {
            return std::ptr::null_mut();
        }
        let view = unsafe { &mut *view };
        let pending = view.inner.mount();
        hand_out(view, pending)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Press the form's primary button (Submit or Update).
///
/// Returns null when the draft fails validation; the snapshot then carries
/// the inline error.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_submit(view: *mut FfiTodoView) -> *mut FfiPendingRequest {
    catch_unwind(|| {
        if view.is_null() {
            return std::ptr::null_mut();
        }
        let view = unsafe { &mut *view };
        match view.inner.submit() {
            Ok(pending) => hand_out(view, pending),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Request deleting the item with `id`.
///
/// Returns null if `view` or `id` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_delete(view: *mut FfiTodoView, id: *const c_char) -> *mut FfiPendingRequest {
    catch_unwind(|| {
        if view.is_null() {
            return std::ptr::null_mut();
        }
        let Some(id) = read_str(id) else {
            return std::ptr::null_mut();
        };
        let view = unsafe { &mut *view };
        let pending = view.inner.delete(&TodoId::new(id));
        hand_out(view, pending)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Applying outcomes
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, read_str(resp.body).unwrap_or_default())
}

/// Apply the response for the request identified by `ticket`.
///
/// Each ticket can be applied once; a second attempt reports `UnknownTicket`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_apply_response(
    view: *mut FfiTodoView,
    ticket: u64,
    response: *const FfiHttpResponse,
) -> FfiApplyResult {
    catch_unwind(|| {
        if view.is_null() || response.is_null() {
            return FfiApplyResult::error(FfiErrorCode::NullArg);
        }
        let view = unsafe { &mut *view };
        let resp = unsafe { &*response };
        let Some(operation) = view.take(ticket) else {
            warn!(ticket, "response for unknown ticket");
            return FfiApplyResult::error(FfiErrorCode::UnknownTicket);
        };
        let result = view.inner.apply(operation, Ok(ffi_response_to_core(resp)));
        FfiApplyResult::from_core(result)
    })
    .unwrap_or(FfiApplyResult::error(FfiErrorCode::Panic))
}

/// Report that the request identified by `ticket` never got a response.
/// `message` is optional and only used for diagnostics.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_apply_transport_error(
    view: *mut FfiTodoView,
    ticket: u64,
    message: *const c_char,
) -> FfiApplyResult {
    catch_unwind(|| {
        if view.is_null() {
            return FfiApplyResult::error(FfiErrorCode::NullArg);
        }
        let view = unsafe { &mut *view };
        let Some(operation) = view.take(ticket) else {
            warn!(ticket, "transport error for unknown ticket");
            return FfiApplyResult::error(FfiErrorCode::UnknownTicket);
        };
        let message = read_str(message).unwrap_or_else(|| "transport error".to_string());
        let result = view.inner.apply(operation, Err(ApiError::Transport(message)));
        FfiApplyResult::from_core(result)
    })
    .unwrap_or(FfiApplyResult::error(FfiErrorCode::Panic))
}

/// Drop the request identified by `ticket` without applying an outcome, for
/// hosts that abort a request. The view and its messages are left as they
/// are. Returns false when the ticket is unknown or was already applied.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_forget(view: *mut FfiTodoView, ticket: u64) -> bool {
    catch_unwind(|| {
        if view.is_null() {
            return false;
        }
        let view = unsafe { &mut *view };
        view.take(ticket).is_some()
    })
    .unwrap_or(false)
}

/// Clear the status message shown under `token`. Returns false when a newer
/// message has replaced it or it was already cleared.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_clear_status(view: *mut FfiTodoView, token: u64) -> bool {
    catch_unwind(|| {
        if view.is_null() {
            return false;
        }
        let view = unsafe { &mut *view };
        view.inner.clear_status(StatusToken::from_raw(token))
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Snapshot of everything on the page.
///
/// The caller must free the returned pointer with `todo_snapshot_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_snapshot(view: *const FfiTodoView) -> *mut FfiViewSnapshot {
    catch_unwind(|| {
        if view.is_null() {
            return std::ptr::null_mut();
        }
        let view = unsafe { &*view };
        FfiViewSnapshot::from_core(view.inner.render())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The page laid out as plain text.
///
/// The caller must free the returned string with `todo_string_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_render_text(view: *const FfiTodoView) -> *mut c_char {
    catch_unwind(|| {
        if view.is_null() {
            return std::ptr::null_mut();
        }
        let view = unsafe { &*view };
        into_c_string(view.inner.render().to_string())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by `todo_view_mount`, `todo_view_submit` or
/// `todo_view_delete`. Safe to call with null.
///
/// Freeing the request does not release its ticket. Every ticket must reach
/// `todo_view_apply_response`, `todo_view_apply_transport_error` or
/// `todo_view_forget`, otherwise the view keeps it until `todo_view_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_pending_free(req: *mut FfiPendingRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free a snapshot returned by `todo_view_snapshot`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_snapshot_free(snapshot: *mut FfiViewSnapshot) {
    if snapshot.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let snapshot = unsafe { Box::from_raw(snapshot) };
        free_c_string(snapshot.heading);
        free_c_string(snapshot.action_label);
        free_c_string(snapshot.title);
        free_c_string(snapshot.description);
        free_c_string(snapshot.status_message);
        free_c_string(snapshot.error_message);
        if !snapshot.rows.is_null() && snapshot.rows_len > 0 {
            let rows = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    snapshot.rows,
                    snapshot.rows_len as usize,
                ))
            };
            for row in rows.iter() {
                free_c_string(row.id);
                free_c_string(row.title);
                free_c_string(row.description);
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_string_free(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn new_view() -> *mut FfiTodoView {
        let url = CString::new("http://localhost:3000").unwrap();
        let view = todo_view_new(url.as_ptr());
        assert!(!view.is_null());
        view
    }

    fn c_str<'a>(ptr: *const c_char) -> &'a str {
        assert!(!ptr.is_null());
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    fn respond(view: *mut FfiTodoView, ticket: u64, status: u16, body: &str) -> FfiApplyResult {
        let body = CString::new(body).unwrap();
        let resp = FfiHttpResponse {
            status,
            body: body.as_ptr(),
        };
        todo_view_apply_response(view, ticket, &resp)
    }

    fn set_draft(view: *mut FfiTodoView, title: &str, description: &str) {
        let title = CString::new(title).unwrap();
        let description = CString::new(description).unwrap();
        assert_eq!(todo_view_set_title(view, title.as_ptr()), FfiErrorCode::Ok);
        assert_eq!(
            todo_view_set_description(view, description.as_ptr()),
            FfiErrorCode::Ok
        );
    }

    /// Mount and load `body` as the initial list.
    fn mounted(body: &str) -> *mut FfiTodoView {
        let view = new_view();
        let req = todo_view_mount(view);
        let ticket = unsafe { &*req }.ticket;
        todo_pending_free(req);
        assert_eq!(respond(view, ticket, 200, body).error_code, FfiErrorCode::Ok);
        view
    }

    #[test]
    fn view_new_and_free() {
        let view = new_view();
        todo_view_free(view);
    }

    #[test]
    fn view_new_null_url_uses_hosted_api() {
        let view = todo_view_new(std::ptr::null());
        assert!(!view.is_null());
        let req = todo_view_mount(view);
        let path = c_str(unsafe { &*req }.path);
        assert_eq!(
            path,
            "https://project-name-backend-todo-fetchapi.onrender.com/todo"
        );
        todo_pending_free(req);
        todo_view_free(view);
    }

    #[test]
    fn view_free_null_is_safe() {
        todo_view_free(std::ptr::null_mut());
    }

    #[test]
    fn mount_returns_get_request_with_ticket() {
        let view = new_view();
        let req = todo_view_mount(view);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_ne!(req_ref.ticket, 0);
        assert_eq!(req_ref.method, FfiHttpMethod::Get);
        assert_eq!(c_str(req_ref.path), "http://localhost:3000/todo");
        assert!(req_ref.body.is_null());
        assert_eq!(req_ref.headers_len, 0);

        todo_pending_free(req);
        todo_view_free(view);
    }

    #[test]
    fn mount_null_view_returns_null() {
        assert!(todo_view_mount(std::ptr::null_mut()).is_null());
    }

    #[test]
    fn submit_blank_draft_returns_null_and_sets_error() {
        let view = mounted("[]");
        set_draft(view, "  ", "description");
        assert!(todo_view_submit(view).is_null());

        let snapshot = todo_view_snapshot(view);
        let snap = unsafe { &*snapshot };
        assert_eq!(
            c_str(snap.error_message),
            "Title and description cannot be empty"
        );
        todo_snapshot_free(snapshot);
        todo_view_free(view);
    }

    #[test]
    fn submit_produces_post_with_json_body() {
        let view = mounted("[]");
        set_draft(view, "Buy milk", "2 litres");
        let req = todo_view_submit(view);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.method, FfiHttpMethod::Post);
        assert_eq!(req_ref.headers_len, 1);
        let header = unsafe { &*req_ref.headers };
        assert_eq!(c_str(header.key), "content-type");
        assert_eq!(c_str(header.value), "application/json");

        let body: serde_json::Value = serde_json::from_str(c_str(req_ref.body)).unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["description"], "2 litres");

        todo_pending_free(req);
        todo_view_free(view);
    }

    #[test]
    fn create_success_returns_status_token() {
        let view = mounted("[]");
        set_draft(view, "B", "b");
        let req = todo_view_submit(view);
        let ticket = unsafe { &*req }.ticket;
        todo_pending_free(req);

        let result = respond(view, ticket, 201, r#"{"_id":"2","title":"B","description":"b"}"#);
        assert_eq!(result.error_code, FfiErrorCode::Ok);
        assert_ne!(result.status_token, 0);
        assert_eq!(result.status_delay_ms, 2000);

        let snapshot = todo_view_snapshot(view);
        let snap = unsafe { &*snapshot };
        assert_eq!(snap.rows_len, 1);
        assert_eq!(c_str(snap.status_message), "Item added successfully");
        assert_eq!(c_str(snap.title), "");
        todo_snapshot_free(snapshot);

        assert!(todo_view_clear_status(view, result.status_token));
        assert!(!todo_view_clear_status(view, result.status_token));
        todo_view_free(view);
    }

    #[test]
    fn ticket_can_only_be_applied_once() {
        let view = new_view();
        let req = todo_view_mount(view);
        let ticket = unsafe { &*req }.ticket;
        todo_pending_free(req);

        assert_eq!(respond(view, ticket, 200, "[]").error_code, FfiErrorCode::Ok);
        assert_eq!(
            respond(view, ticket, 200, "[]").error_code,
            FfiErrorCode::UnknownTicket
        );
        todo_view_free(view);
    }

    #[test]
    fn begin_edit_switches_labels() {
        let view = mounted(r#"[{"_id":"1","title":"A","description":"a"}]"#);
        let id = CString::new("1").unwrap();
        assert_eq!(todo_view_begin_edit(view, id.as_ptr()), FfiErrorCode::Ok);

        let snapshot = todo_view_snapshot(view);
        let snap = unsafe { &*snapshot };
        assert!(snap.editing);
        assert_eq!(c_str(snap.heading), "Edit Item");
        assert_eq!(c_str(snap.action_label), "Update");
        assert_eq!(c_str(snap.title), "A");
        todo_snapshot_free(snapshot);

        assert_eq!(todo_view_cancel_edit(view), FfiErrorCode::Ok);
        let snapshot = todo_view_snapshot(view);
        assert_eq!(c_str(unsafe { &*snapshot }.action_label), "Submit");
        todo_snapshot_free(snapshot);
        todo_view_free(view);
    }

    #[test]
    fn begin_edit_unknown_id() {
        let view = mounted("[]");
        let id = CString::new("missing").unwrap();
        assert_eq!(
            todo_view_begin_edit(view, id.as_ptr()),
            FfiErrorCode::UnknownItem
        );
        assert_eq!(
            todo_view_begin_edit(view, std::ptr::null()),
            FfiErrorCode::NullArg
        );
        todo_view_free(view);
    }

    #[test]
    fn delete_failure_keeps_rows() {
        let view = mounted(
            r#"[{"_id":"1","title":"A","description":"a"},{"_id":"2","title":"B","description":"b"}]"#,
        );
        let id = CString::new("1").unwrap();
        let req = todo_view_delete(view, id.as_ptr());
        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.method, FfiHttpMethod::Delete);
        assert_eq!(c_str(req_ref.path), "http://localhost:3000/todo/1");
        let ticket = req_ref.ticket;
        todo_pending_free(req);

        let result = respond(view, ticket, 500, "");
        assert_eq!(result.error_code, FfiErrorCode::RequestFailed);
        assert_eq!(result.status_token, 0);

        let snapshot = todo_view_snapshot(view);
        let snap = unsafe { &*snapshot };
        assert_eq!(snap.rows_len, 2);
        assert_eq!(c_str(snap.error_message), "Unable to delete todo item");
        assert!(snap.status_message.is_null());
        todo_snapshot_free(snapshot);
        todo_view_free(view);
    }

    #[test]
    fn transport_error_fails_the_load() {
        let view = new_view();
        let req = todo_view_mount(view);
        let ticket = unsafe { &*req }.ticket;
        todo_pending_free(req);

        let result = todo_view_apply_transport_error(view, ticket, std::ptr::null());
        assert_eq!(result.error_code, FfiErrorCode::RequestFailed);

        let text = todo_view_render_text(view);
        assert!(c_str(text).contains("! Failed to load todo items"));
        todo_string_free(text);
        todo_view_free(view);
    }

    #[test]
    fn forgotten_ticket_cannot_be_applied() {
        let view = mounted(r#"[{"_id":"1","title":"A","description":"a"}]"#);
        let id = CString::new("1").unwrap();
        let req = todo_view_delete(view, id.as_ptr());
        let ticket = unsafe { &*req }.ticket;
        todo_pending_free(req);

        assert!(todo_view_forget(view, ticket));
        assert!(!todo_view_forget(view, ticket));
        assert_eq!(
            respond(view, ticket, 204, "").error_code,
            FfiErrorCode::UnknownTicket
        );

        let snapshot = todo_view_snapshot(view);
        let snap = unsafe { &*snapshot };
        assert_eq!(snap.rows_len, 1);
        assert!(snap.error_message.is_null());
        assert!(snap.status_message.is_null());
        todo_snapshot_free(snapshot);
        assert!(!todo_view_forget(std::ptr::null_mut(), ticket));
        todo_view_free(view);
    }

    #[test]
    fn snapshot_rows_carry_ids() {
        let view = mounted(r#"[{"_id":"65f1","title":"A","description":"a"}]"#);
        let snapshot = todo_view_snapshot(view);
        let snap = unsafe { &*snapshot };
        let rows = unsafe { std::slice::from_raw_parts(snap.rows, snap.rows_len as usize) };
        assert_eq!(c_str(rows[0].id), "65f1");
        assert_eq!(c_str(rows[0].title), "A");
        assert_eq!(c_str(rows[0].description), "a");
        todo_snapshot_free(snapshot);
        todo_view_free(view);
    }

    #[test]
    fn null_args_are_reported() {
        assert_eq!(
            todo_view_set_title(std::ptr::null_mut(), std::ptr::null()),
            FfiErrorCode::NullArg
        );
        let result = todo_view_apply_response(std::ptr::null_mut(), 1, std::ptr::null());
        assert_eq!(result.error_code, FfiErrorCode::NullArg);
        assert!(todo_view_snapshot(std::ptr::null()).is_null());
        assert!(!todo_view_clear_status(std::ptr::null_mut(), 1));
    }

    #[test]
    fn generated_header_lives_in_out_dir() {
        // Unset when cbindgen could not generate the header.
        let Some(header) = option_env!("TODO_VIEW_HEADER") else {
            return;
        };
        let header = std::path::Path::new(header);
        assert!(header.starts_with(env!("OUT_DIR")));
        assert!(!header.starts_with(env!("CARGO_MANIFEST_DIR").to_owned() + "/include"));

        let text = std::fs::read_to_string(header).unwrap();
        assert!(text.contains("TODO_VIEW_H"));
        assert!(text.contains("todo_view_forget"));
    }

    #[test]
    fn free_functions_accept_null() {
        todo_pending_free(std::ptr::null_mut());
        todo_snapshot_free(std::ptr::null_mut());
        todo_string_free(std::ptr::null_mut());
    }
}
