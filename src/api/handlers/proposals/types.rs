//! Request/response types for proposal endpoints.
//!
//! The wire format is camelCase to match the form the frontend posts.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSubmission {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    pub problem: String,
    pub solution: String,
    pub scope: String,
    pub cost: String,
    pub how_soon: String,
}

impl ProposalSubmission {
    /// Every field except `website` is required.
    #[must_use]
    pub fn missing_required_fields(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.company_name,
            &self.email,
            &self.problem,
            &self.solution,
            &self.scope,
            &self.cost,
            &self.how_soon,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub id: String,
    pub company_name: String,
    pub problem: String,
    pub solution: String,
    pub created_at: String,
    pub proposal_url: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProposalResponse {
    pub message: String,
    pub proposal_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn submission() -> ProposalSubmission {
        ProposalSubmission {
            first_name: "Alice".to_string(),
            last_name: "Doe".to_string(),
            company_name: "Acme".to_string(),
            email: "alice@acme.test".to_string(),
            website: None,
            problem: "Manual invoicing".to_string(),
            solution: "Automate it".to_string(),
            scope: "Invoicing only".to_string(),
            cost: "10k".to_string(),
            how_soon: "Q3".to_string(),
        }
    }

    #[test]
    fn complete_submission_has_no_missing_fields() {
        assert!(!submission().missing_required_fields());
    }

    #[test]
    fn blank_required_field_is_missing() {
        let mut incomplete = submission();
        incomplete.problem = "  ".to_string();
        assert!(incomplete.missing_required_fields());
    }

    #[test]
    fn website_is_optional() -> Result<()> {
        let decoded: ProposalSubmission = serde_json::from_value(serde_json::json!({
            "firstName": "Alice",
            "lastName": "Doe",
            "companyName": "Acme",
            "email": "alice@acme.test",
            "problem": "Manual invoicing",
            "solution": "Automate it",
            "scope": "Invoicing only",
            "cost": "10k",
            "howSoon": "Q3",
        }))?;
        assert_eq!(decoded.website, None);
        assert!(!decoded.missing_required_fields());
        Ok(())
    }

    #[test]
    fn submission_uses_camel_case_wire_names() -> Result<()> {
        let value = serde_json::to_value(submission())?;
        assert!(value.get("firstName").is_some());
        assert!(value.get("howSoon").is_some());
        assert!(value.get("first_name").is_none());
        Ok(())
    }

    #[test]
    fn submit_response_omits_absent_document_fields() -> Result<()> {
        let response = SubmitProposalResponse {
            message: "ok".to_string(),
            proposal_id: "42".to_string(),
            pdf_base64: None,
            proposal_url: None,
        };
        let value = serde_json::to_value(&response)?;
        assert!(value.get("pdfBase64").is_none());
        assert!(value.get("proposalUrl").is_none());
        assert!(value.get("proposalId").is_some());
        Ok(())
    }
}
