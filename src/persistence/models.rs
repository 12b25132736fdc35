//! Database row model for the `matches` table.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Match, MatchStatus};
use crate::error::BracketError;

/// Column list shared by every query that returns full rows.
pub const MATCH_COLUMNS: &str = "id, event_id, round_number, match_order, player1_id, player2_id, \
     winner_id, player1_score, player2_score, status, created_at, updated_at";

/// A row from the `matches` table, as PostgreSQL types.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MatchRow {
    /// Primary key.
    pub id: Uuid,
    /// Owning event.
    pub event_id: Uuid,
    /// Round number (`INTEGER`, checked ≥ 1).
    pub round_number: i32,
    /// Order within the round (`INTEGER`, checked ≥ 1).
    pub match_order: i32,
    /// First participant.
    pub player1_id: Option<Uuid>,
    /// Second participant.
    pub player2_id: Option<Uuid>,
    /// Winner.
    pub winner_id: Option<Uuid>,
    /// First participant's score.
    pub player1_score: Option<i32>,
    /// Second participant's score.
    pub player2_score: Option<i32>,
    /// Status text (`pending`, `in_progress`, `completed`).
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MatchRow> for Match {
    type Error = BracketError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let round_number = u32::try_from(row.round_number).map_err(|_| {
            BracketError::Internal(format!("match {} has round {}", row.id, row.round_number))
        })?;
        let match_order = u32::try_from(row.match_order).map_err(|_| {
            BracketError::Internal(format!("match {} has order {}", row.id, row.match_order))
        })?;
        let status: MatchStatus = row.status.parse().map_err(BracketError::Internal)?;

        Ok(Self {
            id: row.id.into(),
            event_id: row.event_id.into(),
            round_number,
            match_order,
            player1_id: row.player1_id.map(Into::into),
            player2_id: row.player2_id.map(Into::into),
            winner_id: row.winner_id.map(Into::into),
            player1_score: row.player1_score,
            player2_score: row.player2_score,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Converts a bracket coordinate to its `INTEGER` column value.
///
/// # Errors
///
/// Returns [`BracketError::InvalidRequest`] if the value exceeds `i32::MAX`.
pub fn to_db_int(value: u32, field: &str) -> Result<i32, BracketError> {
    i32::try_from(value)
        .map_err(|_| BracketError::InvalidRequest(format!("{field} out of range: {value}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn row(status: &str, round_number: i32) -> MatchRow {
        let now = Utc::now();
        MatchRow {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            round_number,
            match_order: 3,
            player1_id: Some(Uuid::new_v4()),
            player2_id: None,
            winner_id: None,
            player1_score: Some(2),
            player2_score: None,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn converts_valid_row() {
        let source = row("in_progress", 2);
        let Ok(m) = Match::try_from(source.clone()) else {
            panic!("conversion failed");
        };
        assert_eq!(*m.id.as_uuid(), source.id);
        assert_eq!(m.round_number, 2);
        assert_eq!(m.match_order, 3);
        assert_eq!(m.status, MatchStatus::InProgress);
        assert_eq!(m.player1_id.map(Uuid::from), source.player1_id);
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Match::try_from(row("abandoned", 1)).is_err());
    }

    #[test]
    fn rejects_negative_round() {
        assert!(Match::try_from(row("pending", -1)).is_err());
    }

    #[test]
    fn db_int_bounds() {
        assert_eq!(to_db_int(7, "round_number").ok(), Some(7));
        assert!(to_db_int(u32::MAX, "round_number").is_err());
    }
}
