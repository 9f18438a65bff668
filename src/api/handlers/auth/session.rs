//! Session cookie plumbing and the session/logout endpoints.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use super::{
    codec::Session,
    state::{AuthConfig, AuthState},
    types::{MessageResponse, SessionResponse},
};

const SESSION_COOKIE_NAME: &str = "propono_session";

/// Resolve the caller's identity from the session cookie, if any.
///
/// This is the one interface downstream handlers use to authorize requests;
/// none of them re-implement cookie decoding.
#[must_use]
pub fn current_user_id(headers: &HeaderMap, auth_state: &AuthState) -> Option<Uuid> {
    let cookie_value = extract_session_cookie(headers);
    auth_state.codec().decode(cookie_value.as_deref()).user_id
}

#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Missing or invalid cookies are treated as "no session", never an error.
    match current_user_id(&headers, &auth_state) {
        Some(user_id) => {
            let response = SessionResponse {
                user_id: user_id.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Always clear the cookie, whether or not a session was presented.
    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(auth_state.config()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }

    (
        StatusCode::OK,
        response_headers,
        Json(MessageResponse {
            message: "Logged out successfully.".to_string(),
        }),
    )
        .into_response()
}

/// Build the `HttpOnly` session cookie carrying a freshly sealed session.
pub(crate) fn session_cookie(
    auth_state: &AuthState,
    session: &Session,
) -> anyhow::Result<HeaderValue> {
    let value = auth_state.codec().encode(session)?;
    let ttl_seconds = auth_state.config().session_ttl_seconds();
    let secure = auth_state.config().session_cookie_secure();
    // Host-only on purpose: no Domain attribute.
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    Ok(HeaderValue::from_str(&cookie)?)
}

pub(super) fn clear_session_cookie(
    auth_config: &AuthConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure = auth_config.session_cookie_secure();
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(crate) fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}
