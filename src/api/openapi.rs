//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::api::dto::{
    AdvanceResponse, BracketResponse, ImportMatchesRequest, ImportMatchesResponse,
    MatchListResponse, NewMatchDto, RecordResultRequest, RecordResultResponse,
};
use crate::api::handlers::{events, matches, system};
use crate::domain::{Advancement, EventId, Match, MatchId, MatchStatus, PlayerId, Round, Slot};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "bracket-gateway",
        description = "Single-elimination brackets: match results and winner advancement."
    ),
    paths(
        events::get_bracket,
        events::list_matches,
        events::import_matches,
        matches::get_match,
        matches::start_match,
        matches::record_result,
        matches::advance_match,
        system::health_handler,
    ),
    components(schemas(
        Advancement,
        AdvanceResponse,
        BracketResponse,
        ErrorBody,
        ErrorResponse,
        EventId,
        ImportMatchesRequest,
        ImportMatchesResponse,
        Match,
        MatchId,
        MatchListResponse,
        MatchStatus,
        NewMatchDto,
        PlayerId,
        RecordResultRequest,
        RecordResultResponse,
        Round,
        Slot,
        system::HealthResponse,
    )),
    tags(
        (name = "Events", description = "Bracket views and match import"),
        (name = "Matches", description = "Result entry and advancement"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

/// Returns the generated OpenAPI document.
#[must_use]
pub fn api_doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
