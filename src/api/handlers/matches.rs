//! Match handlers: fetch, start, record result, advance.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AdvanceResponse, RecordResultRequest, RecordResultResponse};
use crate::app_state::AppState;
use crate::domain::{Match, MatchId};
use crate::error::{BracketError, ErrorResponse};

/// `GET /matches/:id` — Get a single match.
///
/// # Errors
///
/// Returns [`BracketError::MatchNotFound`] if the match does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}",
    tag = "Matches",
    summary = "Get match",
    params(
        ("id" = uuid::Uuid, Path, description = "Match UUID"),
    ),
    responses(
        (status = 200, description = "Match", body = Match),
        (status = 404, description = "Match not found", body = ErrorResponse),
    )
)]
pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BracketError> {
    let m = state
        .match_service
        .get_match(MatchId::from_uuid(id))
        .await?;
    Ok(Json(m))
}

/// `POST /matches/:id/start` — Mark a pending match as in progress.
///
/// # Errors
///
/// Returns [`BracketError`] if the match is missing or not pending.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/start",
    tag = "Matches",
    summary = "Start match",
    params(
        ("id" = uuid::Uuid, Path, description = "Match UUID"),
    ),
    responses(
        (status = 200, description = "Match started", body = Match),
        (status = 404, description = "Match not found", body = ErrorResponse),
        (status = 409, description = "Match is not pending", body = ErrorResponse),
    )
)]
pub async fn start_match(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BracketError> {
    let m = state
        .match_service
        .start_match(MatchId::from_uuid(id))
        .await?;
    Ok(Json(m))
}

/// `POST /matches/:id/result` — Record the winner and advance them.
///
/// # Errors
///
/// Returns [`BracketError`] if the match is missing, the winner is not one
/// of its players, or the result write fails.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/result",
    tag = "Matches",
    summary = "Record match result",
    description = "Completes the match with the given winner and optional scores, then writes the winner into the next round. A 200 response means the result is stored; the `advancement` field reports whether the next round was updated.",
    params(
        ("id" = uuid::Uuid, Path, description = "Match UUID"),
    ),
    request_body = RecordResultRequest,
    responses(
        (status = 200, description = "Result recorded", body = RecordResultResponse),
        (status = 400, description = "Winner is not a player of the match", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
        (status = 500, description = "Result write failed", body = ErrorResponse),
    )
)]
pub async fn record_result(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<RecordResultRequest>,
) -> Result<impl IntoResponse, BracketError> {
    let outcome = state
        .match_service
        .record_result(MatchId::from_uuid(id), req.into())
        .await?;
    Ok(Json(RecordResultResponse::from(outcome)))
}

/// `POST /matches/:id/advance` — Re-run advancement for a completed match.
///
/// # Errors
///
/// Returns [`BracketError`] if the match is missing, undecided, or the
/// downstream write fails.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/advance",
    tag = "Matches",
    summary = "Advance match winner",
    description = "Writes the winner of a completed match into its next-round slot again. Use it to repair a bracket after a failed advancement.",
    params(
        ("id" = uuid::Uuid, Path, description = "Match UUID"),
    ),
    responses(
        (status = 200, description = "Advancement outcome", body = AdvanceResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
        (status = 409, description = "Match has no winner", body = ErrorResponse),
    )
)]
pub async fn advance_match(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BracketError> {
    let match_id = MatchId::from_uuid(id);
    let advancement = state.match_service.advance_match(match_id).await?;
    Ok(Json(AdvanceResponse {
        match_id,
        advancement,
    }))
}

/// Match routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches/{id}", get(get_match))
        .route("/matches/{id}/start", post(start_match))
        .route("/matches/{id}/result", post(record_result))
        .route("/matches/{id}/advance", post(advance_match))
}
