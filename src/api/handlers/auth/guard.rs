//! Session middleware: gate configured path prefixes and refresh the cookie.
//!
//! The allow/redirect decision is a pure function over the decoded session
//! and the request path, so it is testable without a running server. The
//! axum wrapper only decodes, decides, and stamps the refreshed cookie.

use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::error;

use super::{
    codec::Session,
    session::{extract_session_cookie, session_cookie},
    state::{AuthState, GuardConfig},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(String),
}

/// Prefix match against the configured protected set.
#[must_use]
pub fn is_protected(guard: &GuardConfig, path: &str) -> bool {
    guard
        .protected_prefixes()
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
}

/// Decide whether a request may pass. Anonymous callers on protected paths
/// are sent to the login path; everything else is allowed through.
#[must_use]
pub fn authorize(session: &Session, guard: &GuardConfig, path: &str) -> Access {
    if session.is_authenticated() || !is_protected(guard, path) {
        Access::Allow
    } else {
        Access::Redirect(guard.login_path().to_string())
    }
}

/// Middleware gating protected paths and re-sealing the session cookie on
/// every pass-through (sliding expiry). Handlers that set their own session
/// cookie (login, logout) take precedence over the refresh.
pub async fn session_guard(
    State(auth_state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let cookie_value = extract_session_cookie(request.headers());
    let session = auth_state.codec().decode(cookie_value.as_deref());

    match authorize(&session, auth_state.config().guard(), request.uri().path()) {
        Access::Redirect(location) => return Redirect::temporary(&location).into_response(),
        Access::Allow => {}
    }

    let mut response = next.run(request).await;

    if !response.headers().contains_key(SET_COOKIE) {
        match session_cookie(&auth_state, &session) {
            Ok(cookie) => {
                response.headers_mut().insert(SET_COOKIE, cookie);
            }
            Err(err) => error!("Failed to refresh session cookie: {err}"),
        }
    }

    response
}
