//! Read-only bracket view derived from an event's match records.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::{EventId, Match, MatchStatus, PlayerId};

/// All matches of one round, ordered by match order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Round {
    /// Round number; 1 is the final.
    pub round_number: u32,
    /// Matches sorted ascending by `match_order`.
    pub matches: Vec<Match>,
}

/// Ordered rounds of a single-elimination event.
///
/// Rounds are sorted by round number descending, so the opening round
/// comes first and the final (round 1) last. Walking the sequence forward
/// therefore follows the path winners take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Bracket {
    /// Owning event.
    pub event_id: EventId,
    /// Rounds, earliest first.
    pub rounds: Vec<Round>,
}

impl Bracket {
    /// Groups a flat, unordered set of matches into a bracket.
    ///
    /// Matches belonging to other events are ignored. No matches yields an
    /// empty bracket.
    #[must_use]
    pub fn from_matches(event_id: EventId, matches: Vec<Match>) -> Self {
        let mut by_round: BTreeMap<u32, Vec<Match>> = BTreeMap::new();
        for m in matches.into_iter().filter(|m| m.event_id == event_id) {
            by_round.entry(m.round_number).or_default().push(m);
        }

        let rounds = by_round
            .into_iter()
            .rev()
            .map(|(round_number, mut matches)| {
                matches.sort_by_key(|m| m.match_order);
                Round {
                    round_number,
                    matches,
                }
            })
            .collect();

        Self { event_id, rounds }
    }

    /// Returns `true` if the event has no matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Number of rounds in the bracket.
    #[must_use]
    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Looks up a round by its number.
    #[must_use]
    pub fn round(&self, round_number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.round_number == round_number)
    }

    /// Winner of the final, once it has been played.
    #[must_use]
    pub fn champion(&self) -> Option<PlayerId> {
        self.round(1)?
            .matches
            .iter()
            .find(|m| m.status == MatchStatus::Completed)
            .and_then(|m| m.winner_id)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn shuffled_eight_player(event_id: EventId) -> Vec<Match> {
        vec![
            Match::new(event_id, 2, 2),
            Match::new(event_id, 3, 4),
            Match::new(event_id, 1, 1),
            Match::new(event_id, 3, 1),
            Match::new(event_id, 3, 3),
            Match::new(event_id, 2, 1),
            Match::new(event_id, 3, 2),
        ]
    }

    #[test]
    fn empty_event_yields_empty_bracket() {
        let bracket = Bracket::from_matches(EventId::new(), Vec::new());
        assert!(bracket.is_empty());
        assert_eq!(bracket.total_rounds(), 0);
        assert_eq!(bracket.champion(), None);
    }

    #[test]
    fn rounds_descend_and_matches_ascend() {
        let event_id = EventId::new();
        let bracket = Bracket::from_matches(event_id, shuffled_eight_player(event_id));

        let rounds: Vec<u32> = bracket.rounds.iter().map(|r| r.round_number).collect();
        assert_eq!(rounds, vec![3, 2, 1]);

        for round in &bracket.rounds {
            let orders: Vec<u32> = round.matches.iter().map(|m| m.match_order).collect();
            let mut sorted = orders.clone();
            sorted.sort_unstable();
            assert_eq!(orders, sorted);
        }

        let Some(first) = bracket.round(3) else {
            panic!("round 3 missing");
        };
        assert_eq!(first.matches.len(), 4);
    }

    #[test]
    fn foreign_matches_are_ignored() {
        let event_id = EventId::new();
        let mut matches = shuffled_eight_player(event_id);
        matches.push(Match::new(EventId::new(), 4, 1));

        let bracket = Bracket::from_matches(event_id, matches);
        assert_eq!(bracket.total_rounds(), 3);
        assert!(bracket.round(4).is_none());
    }

    #[test]
    fn champion_requires_completed_final() {
        let event_id = EventId::new();
        let p1 = PlayerId::new();
        let p2 = PlayerId::new();
        let mut final_match = Match::new(event_id, 1, 1).with_players(Some(p1), Some(p2));
        final_match.winner_id = Some(p2);

        let pending = Bracket::from_matches(event_id, vec![final_match.clone()]);
        assert_eq!(pending.champion(), None);

        final_match.status = MatchStatus::Completed;
        let done = Bracket::from_matches(event_id, vec![final_match]);
        assert_eq!(done.champion(), Some(p2));
    }
}
