//! StreetSweep Server - community litter-reporting backend
//!
//! # Architecture
//!
//! - **HTTP API** (`api`): ticket CRUD, auth, classify orchestration
//! - **Database** (`db`): embedded SurrealDB storage
//! - **Auth** (`auth`): JWT + Argon2
//! - **Services** (`services`): object store, classifier, webhook adapters
//!
//! # Module structure
//!
//! ```text
//! sweep-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT auth
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer
//! ├── services/      # external-dependency adapters, intake workflow
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export common types
pub use crate::auth::{CurrentUser, JwtService};
pub use crate::core::{AppState, Config, Server};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   _____
  / ___/      _____  ___  ____
  \__ \ | /| / / _ \/ _ \/ __ \
 ___/ / |/ |/ /  __/  __/ /_/ /
/____/|__/|__/\___/\___/ .___/
                      /_/
    "#
    );
}
