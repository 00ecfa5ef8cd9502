//! Ticket handlers
//!
//! All free-text input goes through the form orchestrators before anything
//! touches the database; a rejected form records an ERROR notice and
//! persists nothing. Lifecycle notices name the ticket by its stored
//! (escaped) title.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Serialize;
use surrealdb::RecordId;

use crate::api::auth::handler::UserInfo;
use crate::api::{INVALID_FORM, TICKETS_LOGGER, TICKET_MISSING};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Ticket, TicketCreate, TicketUpdate};
use crate::forms::{
    FieldSanitizer, TicketCreatePayload, TicketEditPayload, Validated, validate_create,
    validate_edit,
};
use crate::utils::AppError;

/// Ticket board response: all tickets plus who is currently on call
#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub tickets: Vec<Ticket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_call: Option<UserInfo>,
}

fn parse_user_id(user: &CurrentUser) -> Result<RecordId, AppError> {
    user.id
        .parse::<RecordId>()
        .map_err(|_| AppError::validation(format!("Invalid user id in token: {}", user.id)))
}

/// List all tickets, newest first, with the on-call engineer
pub async fn list(State(state): State<ServerState>) -> Result<Json<TicketListResponse>, AppError> {
    let tickets = state.tickets().find_all().await?;
    let on_call = state.users().find_on_call().await?;

    Ok(Json(TicketListResponse {
        tickets,
        on_call: on_call.as_ref().map(UserInfo::from),
    }))
}

/// Tickets reported by the current user
pub async fn mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    let reporter = parse_user_id(&user)?;
    let tickets = state.tickets().find_by_reporter(&reporter).await?;
    Ok(Json(tickets))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = state
        .tickets()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(TICKET_MISSING))?;
    Ok(Json(ticket))
}

/// Create a ticket
///
/// The reporter and creation time are server-assigned; the form only
/// supplies title, description, priority and optionally status.
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<TicketCreatePayload>,
) -> Result<Json<Ticket>, AppError> {
    let audit = state.audit_handle();
    let sanitizer = FieldSanitizer::new(&audit, &user.username);
    let tickets = state.tickets();

    let valid = match validate_create(&payload, &sanitizer, &tickets).await? {
        Validated::Accepted(v) => v,
        Validated::Rejected(form) => {
            audit.error(TICKETS_LOGGER, INVALID_FORM, &user.username);
            return Err(AppError::form_rejected(form));
        }
    };

    let reporter = parse_user_id(&user)?;
    let ticket = tickets
        .create(TicketCreate {
            title: valid.title,
            description: valid.description,
            priority: valid.priority,
            status: valid.status,
            created: Utc::now(),
            reporter,
            reporter_name: user.username.clone(),
        })
        .await?;

    audit.info(
        TICKETS_LOGGER,
        format!("Ticket created: [{}].", ticket.title),
        &user.username,
    );
    tracing::info!(title = %ticket.title, username = %user.username, "Ticket created");

    Ok(Json(ticket))
}

/// Edit a ticket's description, priority and status
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<TicketEditPayload>,
) -> Result<Json<Ticket>, AppError> {
    let audit = state.audit_handle();
    let tickets = state.tickets();

    let Some(existing) = tickets.find_by_id(&id).await? else {
        audit.error(TICKETS_LOGGER, TICKET_MISSING, &user.username);
        return Err(AppError::not_found(TICKET_MISSING));
    };

    let sanitizer = FieldSanitizer::new(&audit, &user.username);
    let valid = match validate_edit(&payload, &sanitizer) {
        Validated::Accepted(v) => v,
        Validated::Rejected(form) => {
            audit.error(TICKETS_LOGGER, INVALID_FORM, &user.username);
            return Err(AppError::form_rejected(form));
        }
    };

    let ticket = tickets
        .update(
            &id,
            TicketUpdate {
                description: valid.description,
                priority: valid.priority,
                status: valid.status.unwrap_or(existing.status),
            },
        )
        .await?;

    audit.info(
        TICKETS_LOGGER,
        format!("Ticket updated: [{}].", ticket.title),
        &user.username,
    );
    tracing::info!(title = %ticket.title, username = %user.username, "Ticket updated");

    Ok(Json(ticket))
}

/// Delete a ticket (admin only, enforced by the router)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, AppError> {
    let audit = state.audit_handle();

    let deleted = state.tickets().delete(&id).await.map_err(|e| match e {
        crate::db::repository::RepoError::NotFound(_) => {
            audit.error(TICKETS_LOGGER, TICKET_MISSING, &user.username);
            AppError::not_found(TICKET_MISSING)
        }
        other => other.into(),
    })?;

    audit.info(
        TICKETS_LOGGER,
        format!("Ticket deleted: [{}].", deleted.title),
        &user.username,
    );
    tracing::info!(title = %deleted.title, username = %user.username, "Ticket deleted");

    Ok(Json(deleted))
}
