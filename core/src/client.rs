//! Stateless request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Success is any 2xx; every other status
//! becomes `ApiError::Status` without further distinction.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{TodoDraft, TodoId, TodoItem};

/// Builds requests for, and parses responses from, the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todo", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create(&self, draft: &TodoDraft) -> Result<HttpRequest, ApiError> {
        let body = encode(draft)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todo", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_update(&self, id: &TodoId, draft: &TodoDraft) -> Result<HttpRequest, ApiError> {
        let body = encode(draft)?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.item_path(id),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete(&self, id: &TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_path(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// The update response body is not read.
    pub fn parse_update(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn item_path(&self, id: &TodoId) -> String {
        format!("{}/todo/{}", self.base_url, urlencoding::encode(id.as_str()))
    }
}

fn encode(draft: &TodoDraft) -> Result<String, ApiError> {
    serde_json::to_string(draft).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
