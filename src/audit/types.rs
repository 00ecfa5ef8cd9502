//! Audit log types
//!
//! Core data structures for the application's audit trail: severity levels,
//! security event kinds with their fixed messages, and the stored entry shape.

use serde::{Deserialize, Serialize};

/// Actor recorded for unauthenticated requests
pub const ANONYMOUS: &str = "Anonymous";

/// Logger name used for injection-detection events
pub const SECURITY_LOGGER: &str = "security";

/// Severity of a stored log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "ERROR")]
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Suspected-attack pattern kinds detected by the field sanitizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEventKind {
    SqlInjection,
    Xss,
}

impl SecurityEventKind {
    /// Fixed message body recorded for this kind
    pub fn message(&self) -> &'static str {
        match self {
            SecurityEventKind::SqlInjection => "SQL Injection attempt detected",
            SecurityEventKind::Xss => "Cross-Site Scripting attempt detected",
        }
    }
}

/// Log request sent to the audit worker over the channel
#[derive(Debug, Clone, Serialize)]
pub struct LogRequest {
    pub logger_name: String,
    pub level: LogLevel,
    pub message: String,
    /// Username of the acting user, or [`ANONYMOUS`]
    pub username: String,
}

/// Stored log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub logger_name: String,
    pub level: LogLevel,
    pub message: String,
    pub username: String,
    /// Unix milliseconds
    pub created_at: i64,
}

/// Audit log query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct LogQuery {
    /// Start time (Unix milliseconds, inclusive)
    pub from: Option<i64>,
    /// End time (Unix milliseconds, inclusive)
    pub to: Option<i64>,
    /// Severity filter
    pub level: Option<LogLevel>,
    /// Actor filter
    pub username: Option<String>,
    /// Pagination offset
    #[serde(default)]
    pub offset: usize,
    /// Page size (default 50)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            level: None,
            username: None,
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// Audit log list response
#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub items: Vec<LogEntry>,
    pub total: u64,
}
