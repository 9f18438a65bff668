//! Credential store access.
//!
//! The store itself is external; this module only owns the lookup query and
//! the password verification against the stored Argon2 hash.

use anyhow::{Context, Result};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

/// Minimal fields needed to verify a login.
pub(super) struct CredentialRecord {
    pub(super) user_id: Uuid,
    pub(super) password_hash: String,
}

/// Look up credentials by already-normalized email.
pub(super) async fn lookup_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRecord>> {
    let query = "SELECT id, password_hash FROM users WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup credentials")?;

    Ok(row.map(|row| CredentialRecord {
        user_id: row.get("id"),
        password_hash: row.get("password_hash"),
    }))
}

/// Verify a password against a stored Argon2 PHC string. Unparseable hashes
/// count as a mismatch, never as an error the caller could distinguish.
pub(super) fn verify_password(password_hash: &str, password: &str) -> bool {
    PasswordHash::new(password_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
