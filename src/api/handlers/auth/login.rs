//! Login endpoint: validate input, verify credentials, issue the cookie.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use regex::Regex;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::{
    codec::Session,
    session::session_cookie,
    state::AuthState,
    storage::{lookup_credentials, verify_password},
    types::{LoginRequest, LoginResponse, MessageResponse},
};

// One message for unknown email and wrong password alike, so accounts
// cannot be enumerated.
const INVALID_CREDENTIALS: &str = "Invalid credentials.";
const MISSING_FIELDS: &str = "Email and password are required.";

/// Normalize an email for lookup.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(super) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 500, description = "Credential store unavailable", body = MessageResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return message(StatusCode::BAD_REQUEST, MISSING_FIELDS),
    };

    // Validate before touching the store. One message for every validation
    // failure; which check failed is not the caller's business.
    let email = normalize_email(&request.email);
    if !valid_email(&email) || request.password.is_empty() {
        return message(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    }

    let record = match lookup_credentials(&pool, &email).await {
        Ok(record) => record,
        Err(err) => {
            error!("Failed to lookup credentials: {err}");
            return message(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.");
        }
    };

    let Some(record) = record else {
        debug!("Login rejected: unknown email");
        return message(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
    };

    if !verify_password(&record.password_hash, &request.password) {
        debug!("Login rejected: password mismatch");
        return message(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
    }

    let session = Session::authenticated(record.user_id);
    let cookie = match session_cookie(&auth_state, &session) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to seal session cookie: {err}");
            return message(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.");
        }
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(SET_COOKIE, cookie);

    (
        StatusCode::OK,
        response_headers,
        Json(LoginResponse {
            message: "Logged in successfully.".to_string(),
            user_id: record.user_id.to_string(),
        }),
    )
        .into_response()
}

fn message(status: StatusCode, text: &str) -> axum::response::Response {
    (
        status,
        Json(MessageResponse {
            message: text.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::state::AuthConfig;
    use anyhow::Result;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;

    fn auth_state() -> Arc<AuthState> {
        Arc::new(AuthState::new(
            AuthConfig::new("http://localhost:8080".to_string()),
            &SecretString::from("test-secret".to_string()),
        ))
    }

    #[tokio::test]
    async fn login_missing_payload_is_bad_request() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = login(Extension(pool), Extension(auth_state()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!response.headers().contains_key(SET_COOKIE));
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_blank_fields_before_store() -> Result<()> {
        // The lazy pool never connects; validation short-circuits first.
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        for (email, password) in [("", "pw"), ("not-an-email", "pw"), ("a@x.com", "")] {
            let payload = Json(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });
            let response = login(
                Extension(pool.clone()),
                Extension(auth_state()),
                Some(payload),
            )
            .await
            .into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(!response.headers().contains_key(SET_COOKIE));
        }
        Ok(())
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn normalize_email_of_blank_is_empty() {
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email(""));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn unknown_email_and_wrong_password_share_one_message() {
        // Both failure paths answer with this exact constant; a distinct
        // message for either would reintroduce account enumeration.
        assert_eq!(INVALID_CREDENTIALS, "Invalid credentials.");
    }
}
