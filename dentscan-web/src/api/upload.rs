//! Photo upload and analysis
//!
//! Both the HTML form (`POST /upload`) and the JSON API (`POST /api/analyze`)
//! run the same steps:
//! 1. Extension allow-list on the client filename (before anything is written)
//! 2. Save under the upload directory as `<uuid>_<sanitised name>`
//! 3. Tooth-likeness gate; on rejection the file is deleted
//! 4. Severity estimation on the accepted image

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dentscan_common::analysis::{analyze_file, Outcome};
use dentscan_common::upload::{allowed_file, secure_filename};
use dentscan_common::{ClassificationResult, GateReport};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::ui;
use crate::error::ApiError;
use crate::AppState;

/// Message shown when the gate rejects an image
pub const NOT_A_TOOTH_MESSAGE: &str =
    "That doesn't look like a tooth. Please upload a clear tooth image.";

/// Multipart field carrying the photo
const FILE_FIELD: &str = "file";

/// Why an upload produced no result
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file selected")]
    NoFile,

    #[error("Type not allowed")]
    TypeNotAllowed(String),

    #[error("Invalid file name")]
    InvalidFilename,

    #[error("{}", NOT_A_TOOTH_MESSAGE)]
    NotATooth { report: Option<GateReport> },

    #[error("Upload failed: {message}")]
    Multipart { status: StatusCode, message: String },

    #[error("Could not store upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Analysis failed: {0}")]
    Internal(String),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::NoFile | UploadError::InvalidFilename => StatusCode::BAD_REQUEST,
            UploadError::TypeNotAllowed(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::NotATooth { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            UploadError::Multipart { status, .. } => *status,
            UploadError::Io(_) | UploadError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(e: MultipartError) -> Self {
        UploadError::Multipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        let message = e.to_string();
        match e {
            UploadError::NoFile | UploadError::InvalidFilename => ApiError::BadRequest(message),
            UploadError::TypeNotAllowed(_) => ApiError::UnsupportedType(message),
            UploadError::NotATooth { report } => ApiError::NotATooth {
                message,
                gate: report,
            },
            UploadError::Multipart { status, .. } if status == StatusCode::PAYLOAD_TOO_LARGE => {
                ApiError::PayloadTooLarge(message)
            }
            UploadError::Multipart { .. } => ApiError::BadRequest(message),
            UploadError::Io(err) => ApiError::Io(err),
            UploadError::Internal(_) => ApiError::Internal(message),
        }
    }
}

/// Accepted upload with its analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    /// Stored filename, served at `/uploads/<filename>`
    pub filename: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub gate: GateReport,
}

/// Upload form routes (session required, redirect otherwise)
pub fn upload_page_routes() -> Router<AppState> {
    Router::new().route("/upload", get(upload_form).post(upload))
}

/// JSON analysis routes (session required, 401 otherwise)
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/api/analyze", post(analyze))
}

/// GET /upload
pub async fn upload_form() -> Html<String> {
    Html(ui::upload_page(None))
}

/// POST /upload
pub async fn upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    match receive_and_analyze(&state, multipart).await {
        Ok(analysis) => Html(ui::result_page(&analysis.result, &analysis.filename)).into_response(),
        Err(e) => (e.status(), Html(ui::upload_page(Some(&e.to_string())))).into_response(),
    }
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let analysis = receive_and_analyze(&state, multipart).await?;
    Ok(Json(analysis))
}

/// Read the `file` field, check and store it, then run the heuristics
pub async fn receive_and_analyze(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<AnalyzeResponse, UploadError> {
    let (original_name, bytes) = read_file_field(&mut multipart).await?;

    let sanitised = secure_filename(&original_name);
    if sanitised.is_empty() {
        return Err(UploadError::InvalidFilename);
    }
    let filename = stored_filename(&sanitised);

    tokio::fs::create_dir_all(state.upload_dir.as_path()).await?;
    let path = state.upload_dir.join(&filename);
    tokio::fs::write(&path, &bytes).await?;
    info!("Stored upload {} ({} bytes)", path.display(), bytes.len());

    let table = state.recommendations.clone();
    let task_path = path.clone();
    let outcome = tokio::task::spawn_blocking(move || analyze_file(&task_path, &table))
        .await
        .map_err(|e| UploadError::Internal(e.to_string()))?;

    match outcome {
        Outcome::Classified { report, result } => {
            info!(
                "Classified {} as {} ({:.2}% damage)",
                filename, result.category, result.severity
            );
            Ok(AnalyzeResponse {
                filename,
                result,
                gate: report,
            })
        }
        Outcome::Rejected { report } => {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Failed to delete rejected upload {}: {}", path.display(), e);
            }
            info!("Rejected {}: not a tooth image", filename);
            Err(UploadError::NotATooth { report })
        }
    }
}

/// Unique on-disk name for an upload, keeping the sanitised client name
pub fn stored_filename(sanitised: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitised)
}

/// Find the file field and check its extension before reading its bytes
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        if original_name.is_empty() {
            return Err(UploadError::NoFile);
        }
        if !allowed_file(&original_name) {
            info!("Rejected upload '{}': extension not allowed", original_name);
            return Err(UploadError::TypeNotAllowed(original_name));
        }

        let bytes = field.bytes().await?;
        return Ok((original_name, bytes));
    }
    Err(UploadError::NoFile)
}
