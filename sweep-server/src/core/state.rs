//! Application state
//!
//! [`AppState`] holds the dependency-injected client handles shared by every
//! request: constructed once at process start, cheap to clone (Arc fields),
//! read-only thereafter. No ambient singletons.

use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db;
use crate::db::repository::{TicketRepository, UserRepository};
use crate::services::{
    Classifier, HttpClassifier, HttpObjectStore, ObjectStore, TicketIntake, WebhookNotifier,
};

/// Shared server state
///
/// | Field | Purpose |
/// |---------|------------------------------------------|
/// | config | immutable configuration |
/// | db | embedded SurrealDB handle |
/// | jwt | token generation / stateless validation |
/// | tickets | ticket repository |
/// | users | user repository |
/// | intake | classify orchestration |
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt: Arc<JwtService>,
    pub tickets: TicketRepository,
    pub users: UserRepository,
    pub intake: TicketIntake,
}

impl AppState {
    /// Initialize all services from configuration
    ///
    /// Order: database (schema applied), then the external clients, then the
    /// orchestration that composes them.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db = db::connect(&config.database_path).await?;

        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));

        let timeout = Duration::from_millis(config.request_timeout_ms);
        let store: Arc<dyn ObjectStore> = Arc::new(HttpObjectStore::new(
            config.object_store_url.clone(),
            config.object_store_token.clone(),
            timeout,
        )?);
        let classifier: Arc<dyn Classifier> = Arc::new(HttpClassifier::new(
            config.classifier_url.clone(),
            config.classifier_api_key.clone(),
            timeout,
        )?);
        let webhook = config.webhook_url.clone().map(WebhookNotifier::new);

        let tickets = TicketRepository::new(db.clone());
        let users = UserRepository::new(db.clone());
        let intake = TicketIntake::new(store, classifier, tickets.clone(), webhook);

        Ok(Self {
            config: config.clone(),
            db,
            jwt,
            tickets,
            users,
            intake,
        })
    }
}
