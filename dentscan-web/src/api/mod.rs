//! HTTP handlers for dentscan-web

pub mod auth;
pub mod health;
pub mod ui;
pub mod upload;

pub use auth::{auth_routes, require_session, require_session_api};
pub use health::health_routes;
pub use upload::{analyze_routes, upload_page_routes};
