use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::crud::{BoardSnapshot, LoadParams, SyncRequest};
use crate::persistence::{self, BoardStore};

/// Shared server state: the authoritative snapshot, the seed used by reset
/// requests, and optional durable storage.
#[derive(Clone)]
pub struct AppState {
    board: Arc<RwLock<BoardSnapshot>>,
    seed: Arc<BoardSnapshot>,
    store: Option<Arc<dyn BoardStore + Send + Sync>>,
}

impl AppState {
    pub fn new(seed: BoardSnapshot) -> Self {
        Self {
            board: Arc::new(RwLock::new(seed.clone())),
            seed: Arc::new(seed),
            store: None,
        }
    }

    /// Resume from durable storage when it holds a board, otherwise start
    /// from the seed.
    pub fn with_store(seed: BoardSnapshot, store: Arc<dyn BoardStore + Send + Sync>) -> Self {
        let initial = match store.load_board() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => seed.clone(),
            Err(err) => {
                warn!("board store unreadable, starting from seed: {err}");
                seed.clone()
            }
        };
        Self {
            board: Arc::new(RwLock::new(initial)),
            seed: Arc::new(seed),
            store: Some(store),
        }
    }

    fn persist(&self, snapshot: &BoardSnapshot) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save_board(snapshot) {
                warn!("board store save failed: {err}");
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Conflict(message) => {
                let body = Json(ErrorBody {
                    error: "conflict",
                    message,
                });
                (StatusCode::CONFLICT, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/board", get(get_board))
        .route("/load", post(load_board))
        .route("/sync", post(sync_board))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_board(State(state): State<AppState>) -> Json<BoardSnapshot> {
    let snapshot = state.board.read().clone();
    Json(snapshot)
}

async fn load_board(
    State(state): State<AppState>,
    params: Option<Json<LoadParams>>,
) -> Json<BoardSnapshot> {
    let params = params.map(|Json(params)| params).unwrap_or_default();
    if params.reset {
        let mut guard = state.board.write();
        *guard = (*state.seed).clone();
        state.persist(&guard);
        return Json(guard.clone());
    }
    let snapshot = state.board.read().clone();
    Json(snapshot)
}

async fn sync_board(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut updated = state.board.read().clone();

    for task in &request.added {
        if updated.events.iter().any(|event| event.id == task.id) {
            return Err(ApiError::conflict(format!(
                "event {} already exists",
                task.id
            )));
        }
        updated.events.push(task.clone());
        // The transferred item left the client's pool; drop it server-side
        // too so a later load does not resurrect it.
        updated.unplanned.retain(|item| item.name != task.name);
    }
    for task in &request.updated {
        let Some(existing) = updated.events.iter_mut().find(|event| event.id == task.id) else {
            return Err(ApiError::not_found(format!("event {} not found", task.id)));
        };
        *existing = task.clone();
    }
    for id in &request.removed {
        let Some(position) = updated.events.iter().position(|event| event.id == *id) else {
            return Err(ApiError::not_found(format!("event {id} not found")));
        };
        updated.events.remove(position);
    }

    persistence::validate_snapshot(&updated)
        .map_err(|err| ApiError::Invalid(err.to_string()))?;

    let mut guard = state.board.write();
    *guard = updated;
    state.persist(&guard);
    Ok(Json(json!({ "success": true })))
}
