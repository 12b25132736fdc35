//! Bracket view DTO.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Bracket, EventId, PlayerId, Round};

/// Response body for `GET /events/:event_id/bracket`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BracketResponse {
    /// Owning event.
    pub event_id: EventId,
    /// Number of rounds; 0 for an event without matches.
    pub total_rounds: usize,
    /// Winner of the final once it is completed.
    pub champion: Option<PlayerId>,
    /// Rounds, earliest first and the final last.
    pub rounds: Vec<Round>,
}

impl From<Bracket> for BracketResponse {
    fn from(bracket: Bracket) -> Self {
        Self {
            event_id: bracket.event_id,
            total_rounds: bracket.total_rounds(),
            champion: bracket.champion(),
            rounds: bracket.rounds,
        }
    }
}
