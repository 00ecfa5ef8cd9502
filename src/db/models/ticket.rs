//! Ticket model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use super::user::UserId;

/// Ticket ID type
pub type TicketId = RecordId;

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse a submitted choice value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Priority::Low),
            "Medium" => Some(Priority::Medium),
            "High" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Ticket workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    ToDo,
    InProgress,
    Done,
}

impl Status {
    /// Parse a submitted choice value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ToDo" => Some(Status::ToDo),
            "InProgress" => Some(Status::InProgress),
            "Done" => Some(Status::Done),
            _ => None,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::ToDo
    }
}

/// A ticket. `title`, `created` and `reporter` are fixed at creation; edits
/// only touch `description`, `priority` and `status`. Text fields are stored
/// HTML-escaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<TicketId>,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub created: DateTime<Utc>,
    #[serde(with = "serde_helpers::record_id")]
    pub reporter: UserId,
    /// Username of the reporter, denormalized for list views
    pub reporter_name: String,
}

/// Create payload. `created` and `reporter*` are server-assigned by the
/// handler, never taken from form input.
#[derive(Debug, Clone, Serialize)]
pub struct TicketCreate {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub created: DateTime<Utc>,
    #[serde(serialize_with = "serialize_record_id")]
    pub reporter: RecordId,
    pub reporter_name: String,
}

fn serialize_record_id<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&id.to_string())
}

/// Update payload for the editable field set
#[derive(Debug, Clone, Serialize)]
pub struct TicketUpdate {
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}
