//! Login, logout and session middleware
//!
//! A single user configured in the TOML file logs in through the form at `/`.
//! Protected HTML routes redirect to the form without a session; protected
//! JSON routes answer 401.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::ui;
use crate::error::ApiError;
use crate::session::{expired_session_cookie, session_cookie, session_token};
use crate::AppState;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Build login/logout routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page).post(login))
        .route("/logout", get(logout))
}

/// GET /
pub async fn login_page() -> Html<String> {
    Html(ui::login_page(None))
}

/// POST /
///
/// On success starts a session and redirects to the upload form.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let credentials = &state.credentials;
    if form.username != credentials.username || form.password != credentials.password {
        warn!("Rejected login for user '{}'", form.username);
        return (
            StatusCode::UNAUTHORIZED,
            Html(ui::login_page(Some("Invalid credentials"))),
        )
            .into_response();
    }

    let token = state.sessions.create().await;
    info!("User '{}' logged in", form.username);
    (
        [(header::SET_COOKIE, session_cookie(&token))],
        Redirect::to("/upload"),
    )
        .into_response()
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if state.sessions.remove(&token).await {
            info!("Session ended");
        }
    }
    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

/// Session middleware for HTML routes: redirect to the login form
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.sessions.is_authenticated(request.headers()).await {
        next.run(request).await
    } else {
        Redirect::to("/").into_response()
    }
}

/// Session middleware for JSON routes: 401 without a live session
pub async fn require_session_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.sessions.is_authenticated(request.headers()).await {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::Unauthorized("Login required".to_string()))
    }
}
