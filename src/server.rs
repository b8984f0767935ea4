//! HTTP server for uploads, search, and the sheet viewer.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/files` | Upload and index one workbook (multipart field `file`) |
//! | `GET`  | `/api/files` | List uploaded files |
//! | `GET`  | `/api/files/{id}` | Reconstructed per-sheet view |
//! | `GET`  | `/api/files/{id}/download` | Original workbook bytes |
//! | `DELETE` | `/api/files/{id}` | Delete a file and its rows |
//! | `GET`  | `/api/search?terms=…` | Conjunctive keyword search |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one JSON shape:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "file 7 not found" } }
//! ```
//!
//! Codes: `bad_request` (400), `duplicate_upload` (409), `not_found` (404),
//! `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! viewers.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::blob::BlobStore;
use crate::config::Config;
use crate::db;
use crate::error::SheetgrepError;
use crate::files;
use crate::ingest;
use crate::migrate;
use crate::reconstruct;
use crate::search;
use crate::sqlite_store::SqliteStore;
use crate::store::Store;

/// Workbook extensions accepted at the upload boundary. Anything else is
/// rejected before the parser ever sees the bytes.
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xltx", "xltm"];

/// Upper bound on one multipart upload body.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<dyn Store>,
    blobs: Arc<BlobStore>,
}

/// Starts the HTTP server on the configured bind address. Runs until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(SqliteStore::new(pool)),
        blobs: Arc::new(BlobStore::new(config.storage.dir.clone())),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/files", post(handle_upload).get(handle_list))
        .route("/api/files/{id}", get(handle_view).delete(handle_delete))
        .route("/api/files/{id}/download", get(handle_download))
        .route("/api/search", get(handle_search))
        .route("/health", get(handle_health))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state);

    println!("sheetgrep server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

impl From<SheetgrepError> for AppError {
    fn from(err: SheetgrepError) -> Self {
        let (status, code) = match &err {
            SheetgrepError::Parse(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            SheetgrepError::DuplicateUpload { .. } => (StatusCode::CONFLICT, "duplicate_upload"),
            SheetgrepError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            SheetgrepError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        AppError {
            status,
            code: code.to_string(),
            message: err.to_string(),
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

// ============ POST /api/files ============

#[derive(Serialize)]
struct UploadResponse {
    message: String,
    #[serde(rename = "fileId")]
    file_id: i64,
}

fn has_workbook_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        if field.name() == Some("file") {
            let name = field
                .file_name()
                .map(|n| n.to_string())
                .ok_or_else(|| bad_request("file field has no filename"))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(e.to_string()))?;
            upload = Some((name, bytes.to_vec()));
            break;
        }
    }

    let (original_name, bytes) = upload.ok_or_else(|| bad_request("No file uploaded"))?;
    if !has_workbook_extension(&original_name) {
        return Err(bad_request(format!(
            "unsupported file type: {}",
            original_name
        )));
    }

    let outcome = ingest::ingest_workbook(
        &state.config,
        state.store.as_ref(),
        &state.blobs,
        &original_name,
        &bytes,
    )
    .await?;

    Ok(Json(UploadResponse {
        message: "File uploaded and indexed successfully".to_string(),
        file_id: outcome.file_id,
    }))
}

// ============ GET /api/files ============

#[derive(Serialize)]
struct FileSummary {
    id: i64,
    #[serde(rename = "originalName")]
    original_name: String,
    #[serde(rename = "createdAt")]
    created_at: String,
}

async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<FileSummary>>, AppError> {
    let files = files::list_files(state.store.as_ref()).await?;
    let summaries = files
        .into_iter()
        .map(|f| FileSummary {
            id: f.id,
            original_name: f.original_name,
            created_at: chrono::DateTime::from_timestamp(f.created_at, 0)
                .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
                .unwrap_or_else(|| f.created_at.to_string()),
        })
        .collect();
    Ok(Json(summaries))
}

// ============ GET /api/search ============

#[derive(Deserialize)]
struct SearchParams {
    terms: Option<String>,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<crate::models::SearchHit>>, AppError> {
    let terms = match params.terms.as_deref() {
        Some(raw) => search::parse_raw_terms(raw),
        None => Vec::new(),
    };
    let hits = search::search_rows(
        state.store.as_ref(),
        &terms,
        state.config.search.result_limit,
    )
    .await?;
    Ok(Json(hits))
}

// ============ GET /api/files/{id} ============

#[derive(Serialize)]
struct ViewResponse {
    id: i64,
    #[serde(rename = "originalName")]
    original_name: String,
    sheets: Vec<reconstruct::SheetGrid>,
}

async fn handle_view(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ViewResponse>, AppError> {
    let file = files::get_file(state.store.as_ref(), id).await?;
    let sheets = reconstruct::reconstruct_sheets(state.store.as_ref(), id).await?;
    Ok(Json(ViewResponse {
        id: file.id,
        original_name: file.original_name,
        sheets,
    }))
}

// ============ GET /api/files/{id}/download ============

async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let (file, bytes) = files::download_file(state.store.as_ref(), &state.blobs, id).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.original_name.replace('"', "")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

// ============ DELETE /api/files/{id} ============

#[derive(Serialize)]
struct DeleteResponse {
    message: String,
}

async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    files::delete_file(state.store.as_ref(), &state.blobs, id).await?;
    Ok(Json(DeleteResponse {
        message: "File deleted successfully".to_string(),
    }))
}
