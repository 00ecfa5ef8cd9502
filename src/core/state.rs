use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::audit::{AuditHandle, AuditService, AuditWorker};
use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{TicketRepository, UserRepository};
use crate::utils::AppError;

/// Server state, shared across all request handlers
///
/// Holds the embedded database handle, the JWT service and the audit
/// service. Cloning is cheap (everything is behind an `Arc` or is itself a
/// shallow handle).
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub audit_service: Arc<AuditService>,
}

impl ServerState {
    /// Initialize the state: working directory, database, audit worker
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("tickets.db");
        let db_service = DbService::new(&db_path).await?;
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let (audit_service, rx) = AuditService::new(db.clone(), config.audit_buffer_size);
        let worker = AuditWorker::new(audit_service.storage().clone());
        tokio::spawn(worker.run(rx));

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            audit_service,
        })
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Producer handle for emitting audit entries
    pub fn audit_handle(&self) -> AuditHandle {
        self.audit_service.handle()
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn tickets(&self) -> TicketRepository {
        TicketRepository::new(self.db.clone())
    }
}
