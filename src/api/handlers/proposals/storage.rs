//! Database helpers for proposals.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{ProposalSubmission, ProposalSummary};

pub(super) async fn insert_proposal(
    pool: &PgPool,
    user_id: Uuid,
    submission: &ProposalSubmission,
    proposal_url: Option<&str>,
) -> Result<Uuid> {
    let query = r"
        INSERT INTO proposals
            (user_id, first_name, last_name, company_name, email, website,
             problem, solution, scope, cost, how_soon, proposal_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .bind(&submission.first_name)
        .bind(&submission.last_name)
        .bind(&submission.company_name)
        .bind(&submission.email)
        .bind(&submission.website)
        .bind(&submission.problem)
        .bind(&submission.solution)
        .bind(&submission.scope)
        .bind(&submission.cost)
        .bind(&submission.how_soon)
        .bind(proposal_url)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert proposal")?;

    Ok(row.get("id"))
}

/// The caller's proposals, newest first.
pub(super) async fn proposals_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ProposalSummary>> {
    let query = r"
        SELECT id, company_name, problem, solution,
               created_at::text AS created_at, proposal_url
        FROM proposals
        WHERE user_id = $1
        ORDER BY created_at DESC
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list proposals")?;

    Ok(rows
        .into_iter()
        .map(|row| ProposalSummary {
            id: row.get::<Uuid, _>("id").to_string(),
            company_name: row.get("company_name"),
            problem: row.get("problem"),
            solution: row.get("solution"),
            created_at: row.get("created_at"),
            proposal_url: row.get("proposal_url"),
        })
        .collect())
}
