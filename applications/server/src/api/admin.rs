/// Admin API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use ballotbox_core::{Poll, PollId, User};

/// GET /api/admin/polls
/// List every poll, active or closed
pub async fn list_polls(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Poll>>> {
    let polls = app_state.ledger.list_all_polls(auth.identity()).await?;
    Ok(Json(polls))
}

/// POST /api/admin/polls/:id/close
pub async fn close_poll(
    Path(poll_id): Path<PollId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    app_state.ledger.close_poll(auth.identity(), poll_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "poll_id": poll_id,
    })))
}

/// DELETE /api/admin/polls/:id
/// Delete a poll and all of its ballots
pub async fn delete_poll(
    Path(poll_id): Path<PollId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    app_state.ledger.delete_poll(auth.identity(), poll_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "poll_id": poll_id,
    })))
}

/// GET /api/admin/users
/// List all users
pub async fn list_users(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<User>>> {
    auth.require_admin()?;

    let users = app_state.store().get_all_users().await?;
    Ok(Json(users))
}
