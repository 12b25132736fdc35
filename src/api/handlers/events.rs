//! Event-scoped handlers: bracket view, match list, match import.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    BracketResponse, ImportMatchesRequest, ImportMatchesResponse, MatchListResponse,
};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{BracketError, ErrorResponse};
use crate::service::NewMatch;

/// `GET /events/:event_id/bracket` — Bracket view of an event.
///
/// # Errors
///
/// Returns [`BracketError`] if the store read fails.
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/bracket",
    tag = "Events",
    summary = "Get the event bracket",
    description = "Groups the event's matches into rounds, earliest round first and the final last. An event without matches returns an empty bracket.",
    params(
        ("event_id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Bracket view", body = BracketResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn get_bracket(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BracketError> {
    let bracket = state
        .match_service
        .bracket(EventId::from_uuid(id))
        .await?;
    Ok(Json(BracketResponse::from(bracket)))
}

/// `GET /events/:event_id/matches` — Flat match list.
///
/// # Errors
///
/// Returns [`BracketError`] if the store read fails.
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}/matches",
    tag = "Events",
    summary = "List event matches",
    params(
        ("event_id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Matches of the event", body = MatchListResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_matches(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BracketError> {
    let event_id = EventId::from_uuid(id);
    let data = state.match_service.list_matches(event_id).await?;
    Ok(Json(MatchListResponse {
        event_id,
        total: data.len(),
        data,
    }))
}

/// `POST /events/:event_id/matches` — Load existing bracket rows.
///
/// # Errors
///
/// Returns [`BracketError`] on malformed rows or taken positions.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/matches",
    tag = "Events",
    summary = "Import bracket matches",
    description = "Stores pre-built bracket rows for an event. The whole batch is rejected if any row is invalid or its (round, order) position is already taken.",
    params(
        ("event_id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = ImportMatchesRequest,
    responses(
        (status = 201, description = "Matches stored", body = ImportMatchesResponse),
        (status = 400, description = "Invalid rows", body = ErrorResponse),
        (status = 409, description = "Duplicate bracket position", body = ErrorResponse),
    )
)]
pub async fn import_matches(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<ImportMatchesRequest>,
) -> Result<impl IntoResponse, BracketError> {
    let event_id = EventId::from_uuid(id);
    let rows: Vec<NewMatch> = req.matches.into_iter().map(NewMatch::from).collect();
    let matches = state.match_service.import_matches(event_id, rows).await?;

    Ok((
        StatusCode::CREATED,
        Json(ImportMatchesResponse {
            event_id,
            imported: matches.len(),
            matches,
        }),
    ))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/{event_id}/bracket", get(get_bracket))
        .route(
            "/events/{event_id}/matches",
            get(list_matches).post(import_matches),
        )
}
