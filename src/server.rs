//! HTTP API for the browser client.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/maillots` | Full catalog, in stored order |
//! | `POST` | `/api/maillots/actualizar-etiquetas` | Replace one model's tags (password-gated) |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Update request
//!
//! ```json
//! { "modeloNo": "2A", "etiquetas": ["ROJO", "AZUL"], "password": "..." }
//! ```
//!
//! On success the response is
//! `{ "message": "...", "maillotActualizado": { ...entry... } }`.
//!
//! # Error Contract
//!
//! ```json
//! { "code": "not_found", "message": "model \"99Z\" not found" }
//! ```
//!
//! Error codes: `unauthorized` (401), `bad_request` (400), `not_found` (404),
//! `internal` (500). A missing or corrupt catalog file is not an error:
//! `GET /api/maillots` answers `[]`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the static front end
//! can be served from another origin.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use maillots_core::models::CatalogEntry;
use maillots_core::service::{CatalogService, ServiceError, UpdateTagsRequest};

use crate::auth::SecretVerifier;
use crate::config::Config;
use crate::json_store::JsonFileStore;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    service: Arc<CatalogService>,
}

/// Build the service the server runs on: the configured JSON file plus the
/// configured write secret.
pub fn catalog_service(config: &Config) -> anyhow::Result<CatalogService> {
    let backend = Arc::new(JsonFileStore::new(&config.catalog.path));
    let verifier = Arc::new(SecretVerifier::from_config(&config.auth)?);
    Ok(CatalogService::new(backend, verifier))
}

/// The API routes with CORS applied.
pub fn router(service: CatalogService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/maillots", get(handle_get_all))
        .route(
            "/api/maillots/actualizar-etiquetas",
            post(handle_update_tags),
        )
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server on `[server].host:[server].port`.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let app = router(catalog_service(config)?);
    let bind_addr = config.server.bind_addr();

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        catalog = %config.catalog.path.display(),
        "catalog API listening"
    );
    println!("Catalog API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    /// Machine-readable error code (e.g., `"unauthorized"`, `"not_found"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: message.into(),
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized => AppError {
                status: StatusCode::UNAUTHORIZED,
                code: "unauthorized",
                message: "Wrong password.".to_string(),
            },
            ServiceError::InvalidInput(msg) => bad_request(msg),
            ServiceError::NotFound(id) => AppError {
                status: StatusCode::NOT_FOUND,
                code: "not_found",
                message: format!("model \"{}\" not found", id),
            },
            ServiceError::Internal(e) => {
                tracing::error!(error = %format!("{:#}", e), "tag update failed");
                internal("Internal error while updating tags.")
            }
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/maillots ============

async fn handle_get_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    state.service.get_all().await.map(Json).map_err(|e| {
        tracing::error!(error = %format!("{:#}", e), "failed to read catalog");
        internal("Internal error while reading the catalog.")
    })
}

// ============ POST /api/maillots/actualizar-etiquetas ============

#[derive(Serialize)]
struct UpdateTagsResponse {
    message: String,
    #[serde(rename = "maillotActualizado")]
    updated: CatalogEntry,
}

/// Handler for `POST /api/maillots/actualizar-etiquetas`.
///
/// Returns `401` for a wrong password, `400` for a malformed body or
/// missing fields, `404` for an unknown model and `500` when the catalog
/// cannot be read or written.
async fn handle_update_tags(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<UpdateTagsResponse>, AppError> {
    let Json(body) = body.map_err(|e| bad_request(e.body_text()))?;
    let request = UpdateTagsRequest::from_json(body);

    let updated = state.service.update_tags(&request).await?;

    Ok(Json(UpdateTagsResponse {
        message: "Tags updated.".to_string(),
        updated,
    }))
}
