//! Ticket form orchestrators

use super::fields::{choice_field, text_field, trimmed};
use super::outcome::{FormResult, Validated};
use super::sanitize::FieldSanitizer;
use crate::db::models::{Priority, Status};
use crate::db::repository::{RepoResult, TicketRepository};
use crate::utils::validation::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};

const INVALID_CHOICE: &str = "Select a valid choice.";
const DUPLICATE_TITLE: &str = "A ticket with this title already exists.";

/// Raw ticket-creation submission
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TicketCreatePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// Cleaned ticket-creation data. Text fields are escaped.
#[derive(Debug, Clone)]
pub struct ValidTicketCreate {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}

/// Raw ticket-edit submission
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TicketEditPayload {
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// Cleaned ticket-edit data. `status: None` keeps the stored status.
#[derive(Debug, Clone)]
pub struct ValidTicketEdit {
    pub description: String,
    pub priority: Priority,
    pub status: Option<Status>,
}

/// Validate a creation submission. All fields are processed even after a
/// rejection; title uniqueness is checked against the escaped form since
/// that is what gets stored.
pub async fn validate_create(
    payload: &TicketCreatePayload,
    sanitizer: &FieldSanitizer<'_>,
    tickets: &TicketRepository,
) -> RepoResult<Validated<ValidTicketCreate>> {
    let mut form = FormResult::new();

    let title = text_field(&mut form, "title", &payload.title, MAX_TITLE_LEN, sanitizer);

    let description = text_field(
        &mut form,
        "description",
        &payload.description,
        MAX_DESCRIPTION_LEN,
        sanitizer,
    );

    let priority = choice_field(&mut form, "priority", &payload.priority, Priority::parse);

    // Optional on creation; missing means the ticket starts in ToDo
    let status = match trimmed(&payload.status) {
        None => Some(Status::default()),
        Some(raw) => match Status::parse(&raw) {
            Some(status) => {
                form.accept("status", raw);
                Some(status)
            }
            None => {
                form.reject("status", raw, INVALID_CHOICE);
                None
            }
        },
    };

    // Uniqueness runs after every field has been through the sanitizer
    if let Some(title) = &title
        && tickets.find_by_title(title).await?.is_some()
    {
        form.reject("title", title.clone(), DUPLICATE_TITLE);
    }

    if !form.accepted {
        return Ok(Validated::Rejected(form));
    }

    Ok(Validated::Accepted(ValidTicketCreate {
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        priority: priority.unwrap_or(Priority::Low),
        status: status.unwrap_or_default(),
    }))
}

/// Validate an edit submission. Title is not editable, so only the
/// description goes through the sanitizer here.
pub fn validate_edit(
    payload: &TicketEditPayload,
    sanitizer: &FieldSanitizer<'_>,
) -> Validated<ValidTicketEdit> {
    let mut form = FormResult::new();

    let description = text_field(
        &mut form,
        "description",
        &payload.description,
        MAX_DESCRIPTION_LEN,
        sanitizer,
    );

    let priority = choice_field(&mut form, "priority", &payload.priority, Priority::parse);

    // Optional on edit; missing means keep the stored status
    let status = match trimmed(&payload.status) {
        None => None,
        Some(raw) => match Status::parse(&raw) {
            Some(status) => {
                form.accept("status", raw);
                Some(status)
            }
            None => {
                form.reject("status", raw, INVALID_CHOICE);
                None
            }
        },
    };

    if !form.accepted {
        return Validated::Rejected(form);
    }

    Validated::Accepted(ValidTicketEdit {
        description: description.unwrap_or_default(),
        priority: priority.unwrap_or(Priority::Low),
        status,
    })
}
