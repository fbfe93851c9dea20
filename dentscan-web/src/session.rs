//! In-memory login sessions
//!
//! A session is a random UUID held in a shared map and carried by the
//! `dentscan_session` cookie. Sessions expire after a configured lifetime
//! and do not survive a restart. Expired tokens are dropped whenever a new
//! session starts, so the map holds at most the sessions started within one
//! lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "dentscan_session";

/// Session lifetime when none is configured
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Live session tokens with their start times
#[derive(Clone)]
pub struct SessionStore {
    tokens: Arc<RwLock<HashMap<Uuid, Instant>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Start a new session and return its token
    pub async fn create(&self) -> Uuid {
        let token = Uuid::new_v4();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, started| started.elapsed() < self.ttl);
        let expired = before - tokens.len();
        if expired > 0 {
            debug!("Dropped {} expired sessions", expired);
        }
        tokens.insert(token, Instant::now());
        token
    }

    /// True if `token` names a session that has not expired
    pub async fn contains(&self, token: &Uuid) -> bool {
        match self.tokens.read().await.get(token) {
            Some(started) => started.elapsed() < self.ttl,
            None => false,
        }
    }

    /// End a session; returns false if it was not live
    pub async fn remove(&self, token: &Uuid) -> bool {
        match self.tokens.write().await.remove(token) {
            Some(started) => started.elapsed() < self.ttl,
            None => false,
        }
    }

    /// Number of stored tokens, including expired ones not yet dropped
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// True if the request carries a live session cookie
    pub async fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        match session_token(headers) {
            Some(token) => self.contains(&token).await,
            None => false,
        }
    }
}

/// Extract the session token from the `Cookie` headers, if present and well-formed
pub fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value starting a session
pub fn session_cookie(token: &Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token)
}

/// `Set-Cookie` value clearing the session cookie
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
