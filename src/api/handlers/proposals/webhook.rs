//! Client for the external document-generation webhook.
//!
//! The webhook owns document generation entirely; this client forwards the
//! validated submission and shapes whatever comes back. No retries.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;
use url::Url;
use uuid::Uuid;

use super::types::ProposalSubmission;

const WEBHOOK_TIMEOUT_SECONDS: u64 = 30;

/// Document fields extracted from a webhook response.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub pdf_base64: Option<String>,
    pub proposal_url: Option<String>,
}

#[derive(Debug)]
pub enum WebhookOutcome {
    Generated(GeneratedDocument),
    /// No webhook URL configured; the submission is persisted without a document.
    Skipped,
}

pub struct DocumentWebhook {
    url: Option<Url>,
    client: Client,
}

impl DocumentWebhook {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: Option<Url>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECONDS))
            .build()
            .context("Failed to build document webhook client")?;

        Ok(Self { url, client })
    }

    /// Forward a submission to the webhook and shape its response.
    ///
    /// # Errors
    /// Returns an error if the request fails or the webhook answers with a
    /// non-success status.
    pub async fn generate(
        &self,
        submission: &ProposalSubmission,
        user_id: Uuid,
    ) -> Result<WebhookOutcome> {
        let Some(url) = &self.url else {
            warn!("Document webhook URL is not configured; skipping document generation");
            return Ok(WebhookOutcome::Skipped);
        };

        let payload = build_payload(submission, user_id)?;

        let response = self
            .client
            .post(url.clone())
            .json(&payload)
            .send()
            .await
            .context("Document webhook request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Document webhook returned {status}");
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .context("Failed to read document webhook response")?;

        Ok(WebhookOutcome::Generated(document_from_response(
            content_type.as_deref(),
            &body,
        )))
    }
}

/// The webhook receives the form as posted, plus the resolved user id.
fn build_payload(submission: &ProposalSubmission, user_id: Uuid) -> Result<Value> {
    let mut payload = serde_json::to_value(submission)?;
    if let Some(object) = payload.as_object_mut() {
        object.insert("userId".to_string(), Value::String(user_id.to_string()));
    }
    Ok(payload)
}

/// Shape a webhook response body into document fields.
///
/// JSON responses may carry `pdfBase64` and a `pdfUrl`/`pptxUrl`; a raw PDF
/// body is base64-encoded directly. Anything else yields no document.
fn document_from_response(content_type: Option<&str>, body: &[u8]) -> GeneratedDocument {
    match content_type {
        Some(content_type) if content_type.contains("application/json") => {
            let Ok(value) = serde_json::from_slice::<Value>(body) else {
                warn!("Document webhook returned unparseable JSON");
                return GeneratedDocument::default();
            };
            let pdf_base64 = value
                .get("pdfBase64")
                .and_then(Value::as_str)
                .map(str::to_string);
            let proposal_url = value
                .get("pdfUrl")
                .and_then(Value::as_str)
                .or_else(|| value.get("pptxUrl").and_then(Value::as_str))
                .map(str::to_string);
            GeneratedDocument {
                pdf_base64,
                proposal_url,
            }
        }
        Some(content_type) if content_type.contains("application/pdf") => GeneratedDocument {
            pdf_base64: Some(STANDARD.encode(body)),
            proposal_url: None,
        },
        other => {
            warn!("Document webhook returned unexpected content type: {other:?}");
            GeneratedDocument::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn submission() -> ProposalSubmission {
        ProposalSubmission {
            first_name: "Alice".to_string(),
            last_name: "Doe".to_string(),
            company_name: "Acme".to_string(),
            email: "alice@acme.test".to_string(),
            website: Some("https://acme.test".to_string()),
            problem: "Manual invoicing".to_string(),
            solution: "Automate it".to_string(),
            scope: "Invoicing only".to_string(),
            cost: "10k".to_string(),
            how_soon: "Q3".to_string(),
        }
    }

    #[test]
    fn payload_carries_form_fields_and_user_id() -> Result<()> {
        let user_id = Uuid::new_v4();
        let payload = build_payload(&submission(), user_id)?;

        assert_eq!(
            payload.get("userId").and_then(Value::as_str),
            Some(user_id.to_string().as_str())
        );
        assert_eq!(
            payload.get("companyName").and_then(Value::as_str),
            Some("Acme")
        );
        Ok(())
    }

    #[test]
    fn json_response_yields_pdf_and_url() {
        let body = serde_json::json!({
            "pdfBase64": "cGRm",
            "pdfUrl": "https://docs.example.com/proposal.pdf",
        });
        let document = document_from_response(
            Some("application/json; charset=utf-8"),
            body.to_string().as_bytes(),
        );
        assert_eq!(document.pdf_base64.as_deref(), Some("cGRm"));
        assert_eq!(
            document.proposal_url.as_deref(),
            Some("https://docs.example.com/proposal.pdf")
        );
    }

    #[test]
    fn json_response_falls_back_to_pptx_url() {
        let body = serde_json::json!({
            "pptxUrl": "https://docs.example.com/proposal.pptx",
        });
        let document =
            document_from_response(Some("application/json"), body.to_string().as_bytes());
        assert_eq!(
            document.proposal_url.as_deref(),
            Some("https://docs.example.com/proposal.pptx")
        );
        assert_eq!(document.pdf_base64, None);
    }

    #[test]
    fn pdf_response_is_base64_encoded() -> Result<()> {
        let document = document_from_response(Some("application/pdf"), b"%PDF-1.7 fake");
        let encoded = document.pdf_base64.context("pdf_base64 missing")?;
        assert_eq!(STANDARD.decode(encoded)?, b"%PDF-1.7 fake");
        assert_eq!(document.proposal_url, None);
        Ok(())
    }

    #[test]
    fn unexpected_content_type_yields_no_document() {
        assert_eq!(
            document_from_response(Some("text/html"), b"<html>"),
            GeneratedDocument::default()
        );
        assert_eq!(
            document_from_response(None, b"anything"),
            GeneratedDocument::default()
        );
    }

    #[test]
    fn unconfigured_webhook_skips() -> Result<()> {
        let webhook = DocumentWebhook::new(None)?;
        let runtime = tokio::runtime::Runtime::new()?;
        let outcome = runtime.block_on(webhook.generate(&submission(), Uuid::new_v4()))?;
        assert!(matches!(outcome, WebhookOutcome::Skipped));
        Ok(())
    }
}
