//! dentscan-web library - tooth photo upload and analysis service
//!
//! Exposes the router and application state for the binary and for
//! integration tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use dentscan_common::config::{CredentialsConfig, TomlConfig};
use dentscan_common::dataset::ReferenceDataset;
use dentscan_common::RecommendationTable;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod session;

pub use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Recommendation table, read-only after startup
    pub recommendations: Arc<RecommendationTable>,
    /// Reference dataset, read-only after startup
    pub dataset: Arc<ReferenceDataset>,
    /// Logged-in sessions
    pub sessions: SessionStore,
    /// Accepted login
    pub credentials: Arc<CredentialsConfig>,
    /// Directory holding accepted uploads
    pub upload_dir: Arc<PathBuf>,
    /// Request body limit in bytes
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: &TomlConfig,
        recommendations: RecommendationTable,
        dataset: ReferenceDataset,
    ) -> Self {
        Self {
            recommendations: Arc::new(recommendations),
            dataset: Arc::new(dataset),
            sessions: SessionStore::new(Duration::from_secs(config.session_ttl_secs)),
            credentials: Arc::new(config.credentials.clone()),
            upload_dir: Arc::new(config.upload_dir.clone()),
            max_upload_bytes: config.max_upload_bytes,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Login, logout, health and retained uploads are public. The upload form
/// redirects to login without a session; the JSON API answers 401.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    // Protected HTML routes
    let pages = api::upload_page_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        api::require_session,
    ));

    // Protected JSON routes
    let json = api::analyze_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        api::require_session_api,
    ));

    let uploads = ServeDir::new(state.upload_dir.as_path());

    Router::new()
        .merge(pages)
        .merge(json)
        .merge(api::auth_routes())
        .merge(api::health_routes())
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
