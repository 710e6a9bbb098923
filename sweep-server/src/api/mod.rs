//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - registration, login, current user
//! - [`tickets`] - ticket CRUD, classify orchestration, status lifecycle
//! - [`users`] - user profiles

pub mod convert;

pub mod auth;
pub mod health;
pub mod tickets;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
