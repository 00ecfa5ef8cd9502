//! Audit log service
//!
//! [`AuditService`] owns the storage side of the audit trail and hands out
//! cheap [`AuditHandle`] clones to request handlers and the field sanitizer.
//! Entries are received over a bounded mpsc channel and written by the
//! background [`AuditWorker`](super::worker::AuditWorker).

use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use super::storage::{LogStorage, LogStorageError};
use super::types::{LogEntry, LogLevel, LogQuery, LogRequest, SECURITY_LOGGER, SecurityEventKind};

/// Fire-and-forget producer side of the audit trail
///
/// Emission never blocks the request and is not retried: a full or closed
/// channel drops the entry with a process-log warning. Durability of accepted
/// entries is the worker's concern.
#[derive(Clone, Debug)]
pub struct AuditHandle {
    tx: mpsc::Sender<LogRequest>,
}

impl AuditHandle {
    pub fn new(tx: mpsc::Sender<LogRequest>) -> Self {
        Self { tx }
    }

    /// Emit one log entry
    pub fn emit(
        &self,
        logger_name: &str,
        level: LogLevel,
        message: impl Into<String>,
        username: &str,
    ) {
        let req = LogRequest {
            logger_name: logger_name.to_string(),
            level,
            message: message.into(),
            username: username.to_string(),
        };

        if let Err(e) = self.tx.try_send(req) {
            tracing::warn!(error = %e, "audit sink unavailable, log entry dropped");
        }
    }

    /// Emit a WARNING security event with its fixed message
    pub fn security(&self, kind: SecurityEventKind, username: &str) {
        self.emit(SECURITY_LOGGER, LogLevel::Warning, kind.message(), username);
    }

    /// Emit an INFO lifecycle notice
    pub fn info(&self, logger_name: &str, message: impl Into<String>, username: &str) {
        self.emit(logger_name, LogLevel::Info, message, username);
    }

    /// Emit an ERROR lifecycle notice
    pub fn error(&self, logger_name: &str, message: impl Into<String>, username: &str) {
        self.emit(logger_name, LogLevel::Error, message, username);
    }
}

/// Audit log service
pub struct AuditService {
    storage: LogStorage,
    handle: AuditHandle,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// Create the service and the receiver end for the worker
    pub fn new(db: Surreal<Db>, buffer_size: usize) -> (Arc<Self>, mpsc::Receiver<LogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        let storage = LogStorage::new(db);
        let service = Arc::new(Self {
            storage,
            handle: AuditHandle::new(tx),
        });
        (service, rx)
    }

    /// Producer handle for handlers and the sanitizer
    pub fn handle(&self) -> AuditHandle {
        self.handle.clone()
    }

    /// Query stored entries
    pub async fn query(&self, q: &LogQuery) -> Result<(Vec<LogEntry>, u64), LogStorageError> {
        self.storage.query(q).await
    }

    /// Storage reference (for the worker)
    pub fn storage(&self) -> &LogStorage {
        &self.storage
    }
}
