//! Audit log module
//!
//! # Architecture
//!
//! ```text
//! handlers / field sanitizer
//!   └─ AuditHandle::emit() → mpsc → AuditWorker → status_log table
//! ```
//!
//! Emission is fire-and-forget (`try_send`): the request path never blocks on
//! the sink and never retries. Security detections map to WARNING entries with
//! a fixed message per kind; lifecycle notices map to INFO on success and
//! ERROR on failure. Every entry carries the acting username, or `Anonymous`
//! for unauthenticated requests.

pub mod service;
pub mod storage;
pub mod types;
pub mod worker;

pub use service::{AuditHandle, AuditService};
pub use storage::{LogStorage, LogStorageError};
pub use types::{
    ANONYMOUS, LogEntry, LogLevel, LogListResponse, LogQuery, LogRequest, SECURITY_LOGGER,
    SecurityEventKind,
};
pub use worker::AuditWorker;
