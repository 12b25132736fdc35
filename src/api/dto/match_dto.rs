//! Match-related DTOs for import, result entry, and advancement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Advancement, EventId, Match, MatchId, MatchStatus, PlayerId};
use crate::service::{NewMatch, RecordOutcome, RecordResult};

/// Request body for `POST /matches/:id/result`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordResultRequest {
    /// Winning player; must be `player1_id` or `player2_id` of the match.
    pub winner_id: PlayerId,
    /// Score of the first player.
    #[serde(default)]
    pub player1_score: Option<i32>,
    /// Score of the second player.
    #[serde(default)]
    pub player2_score: Option<i32>,
}

impl From<RecordResultRequest> for RecordResult {
    fn from(req: RecordResultRequest) -> Self {
        Self {
            winner_id: req.winner_id,
            player1_score: req.player1_score,
            player2_score: req.player2_score,
        }
    }
}

/// Response body for `POST /matches/:id/result`.
///
/// Returned whenever the result was stored, even if advancement did not
/// succeed; check `advancement.status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordResultResponse {
    /// The completed match.
    #[serde(rename = "match")]
    pub match_record: Match,
    /// Downstream outcome.
    pub advancement: Advancement,
    /// Server timestamp of the response.
    pub recorded_at: DateTime<Utc>,
}

impl From<RecordOutcome> for RecordResultResponse {
    fn from(outcome: RecordOutcome) -> Self {
        Self {
            match_record: outcome.completed,
            advancement: outcome.advancement,
            recorded_at: Utc::now(),
        }
    }
}

/// Response body for `POST /matches/:id/advance`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceResponse {
    /// Match whose winner was advanced.
    pub match_id: MatchId,
    /// Downstream outcome.
    pub advancement: Advancement,
}

/// One row of an import request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewMatchDto {
    /// Explicit id; generated when omitted.
    #[serde(default)]
    pub id: Option<MatchId>,
    /// Round number, 1 being the final.
    pub round_number: u32,
    /// 1-based order within the round.
    pub match_order: u32,
    /// First player.
    #[serde(default)]
    pub player1_id: Option<PlayerId>,
    /// Second player.
    #[serde(default)]
    pub player2_id: Option<PlayerId>,
    /// Winner of an already played match.
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
    /// First player's score.
    #[serde(default)]
    pub player1_score: Option<i32>,
    /// Second player's score.
    #[serde(default)]
    pub player2_score: Option<i32>,
    /// Status; derived from `winner_id` when omitted.
    #[serde(default)]
    pub status: Option<MatchStatus>,
}

impl From<NewMatchDto> for NewMatch {
    fn from(dto: NewMatchDto) -> Self {
        Self {
            id: dto.id,
            round_number: dto.round_number,
            match_order: dto.match_order,
            player1_id: dto.player1_id,
            player2_id: dto.player2_id,
            winner_id: dto.winner_id,
            player1_score: dto.player1_score,
            player2_score: dto.player2_score,
            status: dto.status,
        }
    }
}

/// Request body for `POST /events/:event_id/matches`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportMatchesRequest {
    /// Bracket rows to load.
    pub matches: Vec<NewMatchDto>,
}

/// Response body for `POST /events/:event_id/matches` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportMatchesResponse {
    /// Owning event.
    pub event_id: EventId,
    /// Number of rows stored.
    pub imported: usize,
    /// Stored matches.
    pub matches: Vec<Match>,
}

/// Response body for `GET /events/:event_id/matches`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchListResponse {
    /// Owning event.
    pub event_id: EventId,
    /// Matches, earliest round first.
    pub data: Vec<Match>,
    /// Number of matches.
    pub total: usize,
}
