//! Single-elimination pairing rule.
//!
//! Consecutive matches of a round converge on one match of the next round:
//! orders 1 and 2 feed order 1, orders 3 and 4 feed order 2, and so on.
//! The odd order of each pair takes `player1`, the even one `player2`.

use serde::Serialize;
use utoipa::ToSchema;

use super::{MatchId, PlayerId, Slot};

/// Downstream bracket position a winner moves into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancementTarget {
    /// Round of the downstream match.
    pub round_number: u32,
    /// Order of the downstream match within its round.
    pub match_order: u32,
    /// Slot of the downstream match the winner fills.
    pub slot: Slot,
}

impl AdvancementTarget {
    /// Computes where the winner of `(round_number, match_order)` goes.
    ///
    /// Returns `None` for the final (round 1 or lower).
    #[must_use]
    pub const fn for_position(round_number: u32, match_order: u32) -> Option<Self> {
        if round_number <= 1 {
            return None;
        }
        Some(Self {
            round_number: round_number - 1,
            match_order: match_order.div_ceil(2),
            slot: Slot::fed_by(match_order),
        })
    }
}

/// Result of trying to move a winner forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Advancement {
    /// The match was the final; nothing to do.
    Final,
    /// The winner now occupies the target slot.
    Advanced {
        /// Downstream match that received the winner.
        target_match_id: MatchId,
        /// Round of the downstream match.
        round_number: u32,
        /// Order of the downstream match.
        match_order: u32,
        /// Slot that was written.
        slot: Slot,
    },
    /// No match exists at the downstream position (malformed bracket).
    TargetMissing {
        /// Round that was looked up.
        round_number: u32,
        /// Order that was looked up.
        match_order: u32,
    },
    /// Guarded writes are enabled and another player holds the slot.
    SlotConflict {
        /// Downstream match whose slot is taken.
        target_match_id: MatchId,
        /// Contested slot.
        slot: Slot,
        /// Player currently in the slot.
        occupant: Option<PlayerId>,
    },
    /// The downstream write failed; the recorded result still stands.
    Failed {
        /// Error reported by the store.
        message: String,
    },
}

impl Advancement {
    /// Returns `true` when the winner is known to sit in its next match,
    /// or when there is no next match.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Final | Self::Advanced { .. })
    }
}
