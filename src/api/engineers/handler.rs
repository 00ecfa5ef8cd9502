//! Engineer handlers
//!
//! Listing, the admin edit path and on-call assignment. Both mutations that
//! can grant the on-call flag go through the repository, which clears it
//! from every other engineer in the same transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::api::auth::handler::UserInfo;
use crate::api::{INVALID_FORM, ONCALL_LOGGER};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::forms::{
    FieldSanitizer, OnCallPayload, UserEditPayload, Validated, validate_on_call,
    validate_user_edit,
};
use crate::utils::AppError;

/// On-call status response
#[derive(Debug, Serialize)]
pub struct OnCallResponse {
    /// The engineer currently on call, if anyone is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineer: Option<UserInfo>,
}

/// List all engineers, ordered by username
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<UserInfo>>, AppError> {
    let users = state.users().find_all().await?;
    Ok(Json(users.iter().map(UserInfo::from).collect()))
}

/// Who is on call right now
pub async fn on_call(State(state): State<ServerState>) -> Result<Json<OnCallResponse>, AppError> {
    let engineer = state.users().find_on_call().await?;
    Ok(Json(OnCallResponse {
        engineer: engineer.as_ref().map(UserInfo::from),
    }))
}

/// Assign the on-call flag to one engineer
///
/// An unknown engineer id leaves the current assignment untouched and
/// returns not-found.
pub async fn set_on_call(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OnCallPayload>,
) -> Result<Json<UserInfo>, AppError> {
    let audit = state.audit_handle();

    let engineer_id = match validate_on_call(&payload) {
        Validated::Accepted(id) => id,
        Validated::Rejected(form) => {
            audit.error(ONCALL_LOGGER, INVALID_FORM, &user.username);
            return Err(AppError::form_rejected(form));
        }
    };

    let engineer = state.users().set_on_call(&engineer_id).await?;

    audit.info(
        ONCALL_LOGGER,
        format!("On call changed: [{}].", engineer.display_name()),
        &user.username,
    );
    tracing::info!(
        engineer = %engineer.display_name(),
        username = %user.username,
        "On-call engineer changed"
    );

    Ok(Json(UserInfo::from(&engineer)))
}

/// Admin edit of an engineer account
///
/// Name fields still pass through the sanitizer pipeline; setting
/// `is_on_call` from false to true hands over the on-call flag.
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UserEditPayload>,
) -> Result<Json<UserInfo>, AppError> {
    let audit = state.audit_handle();
    let sanitizer = FieldSanitizer::new(&audit, &user.username);

    let update = match validate_user_edit(&payload, &sanitizer) {
        Validated::Accepted(u) => u,
        Validated::Rejected(form) => {
            audit.error(ONCALL_LOGGER, INVALID_FORM, &user.username);
            return Err(AppError::form_rejected(form));
        }
    };

    let outcome = state.users().update(&id, update).await?;

    // Only an actual handover is worth a notice; true-to-true is a no-op
    if outcome.went_on_call {
        audit.info(
            ONCALL_LOGGER,
            format!("On call changed: [{}].", outcome.user.display_name()),
            &user.username,
        );
    }
    tracing::info!(engineer = %outcome.user.username, username = %user.username, "Engineer updated");

    Ok(Json(UserInfo::from(&outcome.user)))
}
