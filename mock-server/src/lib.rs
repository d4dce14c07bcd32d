//! In-memory implementation of the todo API the view talks to.
//!
//! Items are kept in insertion order so list responses are stable. Ids are
//! uuid v4 strings serialized as `_id`, matching the hosted API's shape.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
}

/// Body of create and update requests.
#[derive(Debug, Deserialize)]
pub struct TodoInput {
    pub title: String,
    pub description: String,
}

impl TodoInput {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(AppError::MissingField);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("title and description are required")]
    MissingField,

    #[error("todo {0} not found")]
    NotFound(Uuid),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingField => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Db = Arc<RwLock<Vec<TodoItem>>>;

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing store, so callers can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/todo", get(list_todos).post(create_todo))
        .route("/todo/{id}", put(update_todo).delete(delete_todo))
        .layer(cors)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<TodoItem>> {
    Json(db.read().await.clone())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<TodoInput>,
) -> Result<(StatusCode, Json<TodoItem>), AppError> {
    input.validate()?;
    let item = TodoItem {
        id: Uuid::new_v4(),
        title: input.title,
        description: input.description,
    };
    db.write().await.push(item.clone());
    info!(id = %item.id, "created todo");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<TodoInput>,
) -> Result<Json<TodoItem>, AppError> {
    input.validate()?;
    let mut items = db.write().await;
    let item = items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or(AppError::NotFound(id))?;
    item.title = input.title;
    item.description = input.description;
    info!(%id, "updated todo");
    Ok(Json(item.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    let mut items = db.write().await;
    let index = items
        .iter()
        .position(|item| item.id == id)
        .ok_or(AppError::NotFound(id))?;
    items.remove(index);
    info!(%id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
