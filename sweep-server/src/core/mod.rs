//! Core module - server configuration, state, and serving
//!
//! - [`Config`] - environment-driven configuration, fail-fast on the
//!   required set
//! - [`AppState`] - dependency-injected shared handles
//! - [`Server`] - router assembly and HTTP serving

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, ConfigError};
pub use server::Server;
pub use state::AppState;
