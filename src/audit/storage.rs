//! Audit log storage
//!
//! Append-only storage for log entries in the embedded database.
//! No update or delete interface is exposed.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use super::types::{LogEntry, LogQuery, LogRequest};

const TABLE: &str = "status_log";

/// Storage error
#[derive(Debug, Error)]
pub enum LogStorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<surrealdb::Error> for LogStorageError {
    fn from(err: surrealdb::Error) -> Self {
        LogStorageError::Database(err.to_string())
    }
}

pub type LogStorageResult<T> = Result<T, LogStorageError>;

/// Database record shape (includes the record id)
#[derive(Debug, serde::Deserialize)]
struct LogRecord {
    #[allow(dead_code)]
    id: surrealdb::RecordId,
    logger_name: String,
    level: super::types::LogLevel,
    message: String,
    username: String,
    created_at: i64,
}

impl From<LogRecord> for LogEntry {
    fn from(r: LogRecord) -> Self {
        LogEntry {
            logger_name: r.logger_name,
            level: r.level,
            message: r.message,
            username: r.username,
            created_at: r.created_at,
        }
    }
}

/// COUNT result
#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}

/// Append-only log storage
#[derive(Clone)]
pub struct LogStorage {
    db: Surreal<Db>,
}

impl LogStorage {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Append one log entry, stamping it with the current time
    pub async fn append(&self, req: LogRequest) -> LogStorageResult<LogEntry> {
        let entry = LogEntry {
            logger_name: req.logger_name,
            level: req.level,
            message: req.message,
            username: req.username,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let mut res = self
            .db
            .query(format!("CREATE {TABLE} CONTENT $data"))
            .bind(("data", entry.clone()))
            .await?;
        let _: Vec<LogRecord> = res.take(0)?;

        Ok(entry)
    }

    /// Query log entries, newest first
    pub async fn query(&self, q: &LogQuery) -> LogStorageResult<(Vec<LogEntry>, u64)> {
        let mut conditions = Vec::new();

        if q.from.is_some() {
            conditions.push("created_at >= $from");
        }
        if q.to.is_some() {
            conditions.push("created_at <= $to");
        }
        if q.level.is_some() {
            conditions.push("level = $level");
        }
        if q.username.is_some() {
            conditions.push("username = $username");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT count() as total FROM {TABLE}{where_clause} GROUP ALL");
        let select_sql = format!(
            "SELECT * FROM {TABLE}{where_clause} ORDER BY created_at DESC LIMIT {} START {}",
            q.limit, q.offset
        );
        let sql = format!("{count_sql}; {select_sql}");

        let mut qb = self.db.query(&sql);

        if let Some(from) = q.from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = q.to {
            qb = qb.bind(("to", to));
        }
        if let Some(ref level) = q.level {
            qb = qb.bind(("level", level.to_string()));
        }
        if let Some(ref username) = q.username {
            qb = qb.bind(("username", username.clone()));
        }

        let mut result = qb.await?;

        let count_result: Vec<CountResult> = result.take(0)?;
        let total = count_result.first().map(|c| c.total).unwrap_or(0);

        let records: Vec<LogRecord> = result.take(1)?;
        let entries = records.into_iter().map(LogEntry::from).collect();

        Ok((entries, total))
    }
}
