//! Session cookie issuance.
//!
//! Every visitor gets a signed, random session id in a cookie. Nothing is
//! stored server side; the id only tags requests in the logs.

use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

pub const COOKIE_NAME: &str = "sentiscope_session";

/// Session id attached to request extensions by [`issue_session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

#[derive(Clone)]
pub struct SessionManager {
    secret: Arc<str>,
    max_age_seconds: u64,
}

impl SessionManager {
    pub fn new(secret: &str, lifetime_hours: u64) -> Self {
        Self {
            secret: Arc::from(secret),
            max_age_seconds: lifetime_hours.saturating_mul(3600),
        }
    }

    fn sign(&self, id: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(id.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Returns the session id if the cookie value carries a valid signature.
    pub fn verify(&self, value: &str) -> Option<String> {
        let (id, tag) = value.split_once('.')?;
        if Uuid::parse_str(id).is_err() || !ct_eq(self.sign(id).as_bytes(), tag.as_bytes()) {
            return None;
        }
        Some(id.to_string())
    }

    pub fn new_session(&self) -> (String, String) {
        let id = Uuid::new_v4().to_string();
        let value = format!("{}.{}", id, self.sign(&id));
        (id, value)
    }

    pub fn set_cookie_header(&self, value: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            COOKIE_NAME, value, self.max_age_seconds
        )
    }

    fn session_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == COOKIE_NAME)
            .find_map(|(_, value)| self.verify(value))
    }
}

/// Constant-time byte comparison.
fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Middleware that reuses a valid session cookie or issues a new one.
pub async fn issue_session(
    State(sessions): State<SessionManager>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(id) = sessions.session_from_headers(request.headers()) {
        request.extensions_mut().insert(SessionId(id));
        return next.run(request).await;
    }

    let (id, value) = sessions.new_session();
    debug!("Issuing new session {}", id);
    request.extensions_mut().insert(SessionId(id));

    let mut response = next.run(request).await;
    match HeaderValue::from_str(&sessions.set_cookie_header(&value)) {
        Ok(header) => {
            response.headers_mut().append(SET_COOKIE, header);
        }
        Err(e) => warn!("Failed to build session cookie: {}", e),
    }
    response
}
