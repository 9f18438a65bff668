//! Proposal gateway: forward validated submissions to the document webhook
//! and persist the outcome; list what the caller has submitted.
//!
//! These are JSON API routes, so they resolve the caller themselves via
//! [`current_user_id`] and answer `401` instead of redirecting.

mod storage;
pub(crate) mod types;
pub mod webhook;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, instrument};

use super::auth::{current_user_id, types::MessageResponse, AuthState};
use storage::{insert_proposal, proposals_for_user};
use types::{ProposalSubmission, ProposalSummary, SubmitProposalResponse};
use webhook::{DocumentWebhook, WebhookOutcome};

#[utoipa::path(
    post,
    path = "/api/submit-proposal",
    request_body = ProposalSubmission,
    responses(
        (status = 200, description = "Proposal persisted, document fields included when generated", body = SubmitProposalResponse),
        (status = 400, description = "Missing form fields", body = MessageResponse),
        (status = 401, description = "Not signed in", body = MessageResponse),
        (status = 500, description = "Webhook or database failure", body = MessageResponse)
    ),
    tag = "proposals"
)]
#[instrument(skip_all)]
pub async fn submit_proposal(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    document_webhook: Extension<Arc<DocumentWebhook>>,
    payload: Option<Json<ProposalSubmission>>,
) -> impl IntoResponse {
    let Some(user_id) = current_user_id(&headers, &auth_state) else {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized.");
    };

    let submission: ProposalSubmission = match payload {
        Some(Json(payload)) => payload,
        None => return message(StatusCode::BAD_REQUEST, "Missing payload"),
    };

    if submission.missing_required_fields() {
        return message(StatusCode::BAD_REQUEST, "All form fields are required.");
    }

    let outcome = match document_webhook.generate(&submission, user_id).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("Document webhook call failed: {err}");
            return message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Document webhook call failed.",
            );
        }
    };

    let (document, skipped) = match outcome {
        WebhookOutcome::Generated(document) => (document, false),
        WebhookOutcome::Skipped => (webhook::GeneratedDocument::default(), true),
    };

    let proposal_id =
        match insert_proposal(&pool, user_id, &submission, document.proposal_url.as_deref()).await {
            Ok(id) => id,
            Err(err) => {
                error!("Failed to persist proposal: {err}");
                return message(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong during proposal submission.",
                );
            }
        };

    let response_message = if skipped {
        "Proposal submitted, document generation skipped."
    } else {
        "Proposal submitted successfully."
    };

    (
        StatusCode::OK,
        Json(SubmitProposalResponse {
            message: response_message.to_string(),
            proposal_id: proposal_id.to_string(),
            pdf_base64: document.pdf_base64,
            proposal_url: document.proposal_url,
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/proposals",
    responses(
        (status = 200, description = "The caller's proposals, newest first", body = [ProposalSummary]),
        (status = 401, description = "Not signed in", body = MessageResponse),
        (status = 500, description = "Database failure", body = MessageResponse)
    ),
    tag = "proposals"
)]
pub async fn list_proposals(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let Some(user_id) = current_user_id(&headers, &auth_state) else {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized.");
    };

    match proposals_for_user(&pool, user_id).await {
        Ok(proposals) => (StatusCode::OK, Json(proposals)).into_response(),
        Err(err) => {
            error!("Failed to list proposals: {err}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
        }
    }
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
    use crate::api::handlers::auth::AuthConfig;
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
    async fn submit_without_session_is_unauthorized() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let webhook = Arc::new(DocumentWebhook::new(None)?);
        let response = submit_proposal(
            HeaderMap::new(),
            Extension(pool),
            Extension(auth_state()),
            Extension(webhook),
            None,
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn list_without_session_is_unauthorized() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = list_proposals(HeaderMap::new(), Extension(pool), Extension(auth_state()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
