//! Database Module
//!
//! Embedded SurrealDB (RocksDB backend) bootstrap and schema definitions.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "sweep";
const DATABASE: &str = "sweep";

/// Open the embedded database at `path` and apply schema definitions
pub async fn connect(path: &str) -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

    define_schema(&db).await?;

    tracing::info!(path = %path, "Database connection established (SurrealDB RocksDB)");
    Ok(db)
}

/// Table and index definitions, applied idempotently at boot
///
/// Uniqueness of username and ingest_key is enforced by check-before-insert
/// in the repositories; the indexes here back those lookups.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS ticket SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS ticket_created_at ON ticket FIELDS created_at;
        DEFINE INDEX IF NOT EXISTS ticket_ingest_key ON ticket FIELDS ingest_key;
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_username ON user FIELDS username;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?
    .check()
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;
    Ok(())
}
