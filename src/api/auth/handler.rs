//! Authentication handlers
//!
//! Registration, login, logout and the current-user endpoint. Every outcome
//! that matters for the audit trail is recorded here: registrations and
//! logins under the `auth` logger, attributed to the username on success and
//! to `Anonymous` before authentication.

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::{
    AUTH_LOGGER, INVALID_CREDENTIALS, LOGGED_IN, LOGGED_OUT, REGISTRATION_SUCCESSFUL,
    REGISTRATION_UNSUCCESSFUL,
};
use crate::audit::ANONYMOUS;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{EngineerUser, UserCreate};
use crate::forms::{FieldSanitizer, RegisterPayload, Validated, validate_register};
use crate::utils::AppError;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_on_call: bool,
}

impl From<&EngineerUser> for UserInfo {
    fn from(user: &EngineerUser) -> Self {
        Self {
            id: user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            username: user.username.clone(),
            display_name: user.display_name(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            is_on_call: user.is_on_call,
        }
    }
}

/// Register a new engineer account
///
/// Runs the full form pipeline (the actor is `Anonymous` since nobody is
/// logged in yet). A rejected form records an ERROR notice and persists
/// nothing; a successful registration records an INFO notice attributed to
/// the new username and returns a token.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    let audit = state.audit_handle();
    let sanitizer = FieldSanitizer::new(&audit, ANONYMOUS);
    let users = state.users();

    let registration = match validate_register(&payload, &sanitizer, &users).await? {
        Validated::Accepted(r) => r,
        Validated::Rejected(form) => {
            audit.error(AUTH_LOGGER, REGISTRATION_UNSUCCESSFUL, ANONYMOUS);
            return Err(AppError::form_rejected(form));
        }
    };

    let hash_pass = EngineerUser::hash_password(&registration.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let user = users
        .create(UserCreate {
            username: registration.username,
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            hash_pass,
            is_admin: false,
            is_on_call: false,
        })
        .await?;

    audit.info(AUTH_LOGGER, REGISTRATION_SUCCESSFUL, &user.username);
    tracing::info!(username = %user.username, "Engineer registered");

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.is_admin)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&user),
    }))
}

/// Authenticate and return a token
///
/// A unified error message and a fixed delay keep failed lookups and failed
/// password checks indistinguishable.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let audit = state.audit_handle();
    let user = state.users().find_by_username(&req.username).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                audit.error(AUTH_LOGGER, INVALID_CREDENTIALS, ANONYMOUS);
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            audit.error(AUTH_LOGGER, INVALID_CREDENTIALS, ANONYMOUS);
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.is_admin)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    audit.info(AUTH_LOGGER, LOGGED_IN, &user.username);
    tracing::info!(username = %user.username, "Engineer logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&user),
    }))
}

/// Logout notice. Tokens are stateless, so this only records the event.
pub async fn logout(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<()>, AppError> {
    state
        .audit_handle()
        .info(AUTH_LOGGER, LOGGED_OUT, &user.username);
    tracing::info!(username = %user.username, "Engineer logged out");

    Ok(Json(()))
}

/// Current user info, fresh from the database
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    let fresh = state
        .users()
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User not found: {}", user.id)))?;

    Ok(Json(UserInfo::from(&fresh)))
}
