/// Poll API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use ballotbox_core::{Ballot, LedgerError, Poll, PollId, PollResults, VotingLedger};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub options: Vec<String>,
}

/// Vote body; `option` may be a number or a numeric string
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    #[serde(default)]
    pub option: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PollDetail {
    pub poll: Poll,
    pub results: PollResults,
    /// Absent for anonymous callers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_voted: Option<bool>,
}

/// GET /api/polls
pub async fn list_polls(State(app_state): State<AppState>) -> Result<Json<Vec<Poll>>> {
    let polls = app_state.ledger.list_active_polls().await?;
    Ok(Json(polls))
}

/// GET /api/polls/:id
pub async fn get_poll(
    State(app_state): State<AppState>,
    Path(poll_id): Path<PollId>,
    auth: Option<AuthenticatedUser>,
) -> Result<Json<PollDetail>> {
    let poll = app_state.ledger.get_poll(poll_id).await?;
    let results = app_state.ledger.compute_results(poll_id).await?;

    let has_voted = match auth {
        Some(auth) => Some(app_state.ledger.has_voted(poll_id, auth.user_id()).await?),
        None => None,
    };

    Ok(Json(PollDetail {
        poll,
        results,
        has_voted,
    }))
}

/// GET /api/polls/:id/results
pub async fn get_results(
    State(app_state): State<AppState>,
    Path(poll_id): Path<PollId>,
) -> Result<Json<PollResults>> {
    let results = app_state.ledger.compute_results(poll_id).await?;
    Ok(Json(results))
}

/// POST /api/polls
pub async fn create_poll(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePollRequest>,
) -> Result<(StatusCode, Json<Poll>)> {
    let poll = app_state
        .ledger
        .create_poll(auth.user_id(), req.title, req.description, &req.options)
        .await?;

    Ok((StatusCode::CREATED, Json(poll)))
}

/// POST /api/polls/:id/vote
pub async fn vote(
    State(app_state): State<AppState>,
    Path(poll_id): Path<PollId>,
    auth: AuthenticatedUser,
    Json(req): Json<VoteRequest>,
) -> Result<(StatusCode, Json<Ballot>)> {
    let option_index = option_index(poll_id, req.option)?;

    let ballot = app_state
        .ledger
        .cast_ballot(poll_id, auth.user_id(), option_index)
        .await?;

    Ok((StatusCode::CREATED, Json(ballot)))
}

/// Interpret the submitted option value as an index
fn option_index(poll_id: PollId, option: Option<Value>) -> std::result::Result<i64, LedgerError> {
    match option {
        None | Some(Value::Null) => Err(LedgerError::validation("select an option")),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| LedgerError::invalid_option(poll_id, n)),
        Some(Value::String(s)) => VotingLedger::parse_option(poll_id, &s),
        Some(other) => Err(LedgerError::invalid_option(poll_id, other)),
    }
}
