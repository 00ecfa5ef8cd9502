//! Audit log handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::audit::{LogListResponse, LogQuery};
use crate::core::ServerState;
use crate::utils::AppError;

/// Query stored audit entries, newest first
///
/// Supports filtering by time window, level and username, plus offset/limit
/// pagination.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogListResponse>, AppError> {
    let (items, total) = state
        .audit_service
        .query(&query)
        .await
        .map_err(|e| AppError::database(format!("Audit log query failed: {e:?}")))?;

    Ok(Json(LogListResponse { items, total }))
}
