//! # Propono (Proposal Submission Service)
//!
//! `propono` is a small authenticated web service: users sign in with email
//! and password, submit a structured proposal form, the form is forwarded to
//! an external automation webhook that returns a generated document, and the
//! result is persisted and listable.
//!
//! ## Sessions
//!
//! Sessions are stateless: the authenticated identity is sealed into a single
//! `HttpOnly` cookie with ChaCha20-Poly1305 under a key derived from a
//! process-wide secret. Nothing is stored server side; tampering, corruption,
//! or secret rotation all degrade to "not logged in", never to an error.
//!
//! > **Warning:** Rotating the session secret invalidates every outstanding
//! > session. This is by design, not a bug.
//!
//! ## Authorization
//!
//! The presence of a `userId` in the decoded session is the sole
//! authorization signal. Page paths under a configured prefix list are gated
//! by middleware that redirects anonymous requests to the login path; JSON
//! API routes resolve the caller themselves and answer `401`.
//!
//! Credential failures are deliberately uniform: an unknown email and a wrong
//! password produce an identical response so accounts cannot be enumerated.

pub mod api;
pub mod cli;

pub const GIT_COMMIT_HASH: &str = env!("PROPONO_GIT_SHA");

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
