//! Audit log background worker
//!
//! Consumes [`LogRequest`]s from the mpsc channel and writes them to storage.
//! Exits when the channel closes.

use super::storage::LogStorage;
use super::types::LogRequest;

pub struct AuditWorker {
    storage: LogStorage,
}

impl AuditWorker {
    pub fn new(storage: LogStorage) -> Self {
        Self { storage }
    }

    /// Run the worker (blocks until the channel closes)
    pub async fn run(self, mut rx: tokio::sync::mpsc::Receiver<LogRequest>) {
        tracing::info!("Audit log worker started");

        while let Some(req) = rx.recv().await {
            match self.storage.append(req).await {
                Ok(entry) => {
                    tracing::debug!(
                        level = %entry.level,
                        logger = %entry.logger_name,
                        username = %entry.username,
                        "Audit entry recorded"
                    );
                }
                Err(e) => {
                    tracing::error!("Failed to write audit entry: {:?}", e);
                }
            }
        }

        tracing::info!("Audit log channel closed, worker stopping");
    }
}
