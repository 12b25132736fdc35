//! In-process match store.
//!
//! Holds every match in one `HashMap` behind a [`tokio::sync::RwLock`].
//! Each store call takes the lock once, so a call behaves like a single
//! SQL statement: the slot check and write of
//! [`MatchStore::assign_slot_if_vacant`] cannot interleave with another
//! writer, but two separate calls can.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::MatchStore;
use crate::domain::{EventId, Match, MatchId, MatchPatch, PlayerId, Slot};
use crate::error::BracketError;

/// Match table kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<MatchId, Match>>,
}

impl InMemoryMatchStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored matches.
    pub async fn len(&self) -> usize {
        self.matches.read().await.len()
    }

    /// Returns `true` if the store holds no matches.
    pub async fn is_empty(&self) -> bool {
        self.matches.read().await.is_empty()
    }
}

impl MatchStore for InMemoryMatchStore {
    async fn list_matches(&self, event_id: EventId) -> Result<Vec<Match>, BracketError> {
        let map = self.matches.read().await;
        Ok(map
            .values()
            .filter(|m| m.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn get_match(&self, match_id: MatchId) -> Result<Option<Match>, BracketError> {
        Ok(self.matches.read().await.get(&match_id).cloned())
    }

    async fn find_match(
        &self,
        event_id: EventId,
        round_number: u32,
        match_order: u32,
    ) -> Result<Option<Match>, BracketError> {
        let map = self.matches.read().await;
        Ok(map
            .values()
            .find(|m| {
                m.event_id == event_id
                    && m.round_number == round_number
                    && m.match_order == match_order
            })
            .cloned())
    }

    async fn update_match(
        &self,
        match_id: MatchId,
        patch: MatchPatch,
    ) -> Result<Match, BracketError> {
        let mut map = self.matches.write().await;
        let m = map
            .get_mut(&match_id)
            .ok_or(BracketError::MatchNotFound(match_id))?;
        m.apply(&patch);
        Ok(m.clone())
    }

    async fn assign_slot_if_vacant(
        &self,
        match_id: MatchId,
        slot: Slot,
        player: PlayerId,
    ) -> Result<Option<Match>, BracketError> {
        let mut map = self.matches.write().await;
        let m = map
            .get_mut(&match_id)
            .ok_or(BracketError::MatchNotFound(match_id))?;
        match m.player_in(slot) {
            Some(occupant) if occupant != player => Ok(None),
            _ => {
                m.apply(&MatchPatch::slot(slot, player));
                Ok(Some(m.clone()))
            }
        }
    }

    async fn insert_matches(&self, matches: Vec<Match>) -> Result<usize, BracketError> {
        let mut map = self.matches.write().await;
        for (i, new) in matches.iter().enumerate() {
            let clashes_stored = map.values().any(|m| {
                m.event_id == new.event_id
                    && m.round_number == new.round_number
                    && m.match_order == new.match_order
            });
            let clashes_batch = matches.iter().take(i).any(|m| {
                m.event_id == new.event_id
                    && m.round_number == new.round_number
                    && m.match_order == new.match_order
            });
            if clashes_stored || clashes_batch {
                return Err(BracketError::DuplicateMatch {
                    round_number: new.round_number,
                    match_order: new.match_order,
                });
            }
            if map.contains_key(&new.id) || matches.iter().take(i).any(|m| m.id == new.id) {
                return Err(BracketError::InvalidRequest(format!(
                    "match {} already exists",
                    new.id
                )));
            }
        }

        let count = matches.len();
        map.extend(matches.into_iter().map(|m| (m.id, m)));
        Ok(count)
    }
}
