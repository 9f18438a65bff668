//! API handlers for Propono.
//!
//! This module organizes the service's route handlers: session-cookie auth
//! (login, logout, session echo, guard middleware) and the proposal gateway
//! (submission forwarding and listing).

pub mod auth;
pub mod health;
pub mod proposals;
pub mod root;
