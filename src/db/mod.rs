//! Database module
//!
//! Owns the embedded SurrealDB instance and defines the schema. Uniqueness of
//! usernames and ticket titles is enforced here with unique indexes, so the
//! form-level checks are a user-facing convenience, not the last line.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "ticket_server";
const DATABASE: &str = "main";

/// Database service - owns the embedded database handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and define the schema
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database ready at {}", db_path.display());

        Ok(Self { db })
    }
}

/// Define tables and unique indexes (idempotent)
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(
        "DEFINE TABLE IF NOT EXISTS engineer_user SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS engineer_user_username ON engineer_user FIELDS username UNIQUE;
         DEFINE TABLE IF NOT EXISTS ticket SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS ticket_title ON ticket FIELDS title UNIQUE;
         DEFINE TABLE IF NOT EXISTS status_log SCHEMALESS;",
    )
    .await?;
    Ok(())
}
