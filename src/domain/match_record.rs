//! Match records: one head-to-head contest within an event's bracket.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, MatchId, PlayerId};

/// Lifecycle status of a match.
///
/// The nominal path is `pending → in_progress → completed`. A match may
/// also jump straight from `pending` to `completed`. `completed` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Waiting to be played; players may still be unset.
    #[default]
    Pending,
    /// Currently being played.
    InProgress,
    /// A winner has been recorded.
    Completed,
}

impl MatchStatus {
    /// Returns the status as stored in the database and on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` if a match in this status may move to `next`.
    ///
    /// Staying in `completed` is allowed so a result can be re-entered.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress | Self::Completed)
                | (Self::InProgress | Self::Completed, Self::Completed)
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown match status: {other}")),
        }
    }
}

/// One of the two player positions of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// The `player1_id` column.
    Player1,
    /// The `player2_id` column.
    Player2,
}

impl Slot {
    /// Slot that the winner of the match at `match_order` fills in the
    /// next round: odd orders feed `player1`, even orders feed `player2`.
    #[must_use]
    pub const fn fed_by(match_order: u32) -> Self {
        if match_order % 2 == 1 {
            Self::Player1
        } else {
            Self::Player2
        }
    }

    /// Column name backing this slot.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Player1 => "player1_id",
            Self::Player2 => "player2_id",
        }
    }
}

/// A single bracket match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Match {
    /// Unique match identifier.
    pub id: MatchId,
    /// Owning event.
    pub event_id: EventId,
    /// Round of the match; 1 is the final.
    pub round_number: u32,
    /// 1-based position within the round.
    pub match_order: u32,
    /// First participant, unset until known.
    pub player1_id: Option<PlayerId>,
    /// Second participant, unset until known.
    pub player2_id: Option<PlayerId>,
    /// Winner, always one of the two participants.
    pub winner_id: Option<PlayerId>,
    /// Score of the first participant.
    pub player1_score: Option<i32>,
    /// Score of the second participant.
    pub player2_score: Option<i32>,
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Creates a pending match at the given bracket position.
    #[must_use]
    pub fn new(event_id: EventId, round_number: u32, match_order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: MatchId::new(),
            event_id,
            round_number,
            match_order,
            player1_id: None,
            player2_id: None,
            winner_id: None,
            player1_score: None,
            player2_score: None,
            status: MatchStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets both participants.
    #[must_use]
    pub fn with_players(mut self, player1: Option<PlayerId>, player2: Option<PlayerId>) -> Self {
        self.player1_id = player1;
        self.player2_id = player2;
        self
    }

    /// Returns `true` if `player` occupies either slot.
    #[must_use]
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.player1_id == Some(player) || self.player2_id == Some(player)
    }

    /// Returns the player currently in `slot`.
    #[must_use]
    pub const fn player_in(&self, slot: Slot) -> Option<PlayerId> {
        match slot {
            Slot::Player1 => self.player1_id,
            Slot::Player2 => self.player2_id,
        }
    }

    /// Returns `true` if this match is the final of its bracket.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.round_number <= 1
    }

    /// Applies a partial update in place. Unset fields are left untouched.
    pub fn apply(&mut self, patch: &MatchPatch) {
        if let Some(p) = patch.player1_id {
            self.player1_id = Some(p);
        }
        if let Some(p) = patch.player2_id {
            self.player2_id = Some(p);
        }
        if let Some(w) = patch.winner_id {
            self.winner_id = Some(w);
        }
        if let Some(s) = patch.player1_score {
            self.player1_score = Some(s);
        }
        if let Some(s) = patch.player2_score {
            self.player2_score = Some(s);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update for a match. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPatch {
    /// New first participant.
    pub player1_id: Option<PlayerId>,
    /// New second participant.
    pub player2_id: Option<PlayerId>,
    /// New winner.
    pub winner_id: Option<PlayerId>,
    /// New score for the first participant.
    pub player1_score: Option<i32>,
    /// New score for the second participant.
    pub player2_score: Option<i32>,
    /// New status.
    pub status: Option<MatchStatus>,
}

impl MatchPatch {
    /// Patch that places `player` in `slot` and touches nothing else.
    #[must_use]
    pub fn slot(slot: Slot, player: PlayerId) -> Self {
        match slot {
            Slot::Player1 => Self {
                player1_id: Some(player),
                ..Self::default()
            },
            Slot::Player2 => Self {
                player2_id: Some(player),
                ..Self::default()
            },
        }
    }

    /// Patch that moves a match to `status`.
    #[must_use]
    pub fn status(status: MatchStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
