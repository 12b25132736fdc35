//! Persistence layer: the match table behind the bracket logic.
//!
//! [`MatchStore`] is the storage boundary the service talks to. Two
//! implementations exist: [`memory::InMemoryMatchStore`] for tests and
//! single-node runs, and [`postgres::PostgresMatchStore`] backed by
//! `sqlx::PgPool`. [`MatchRepository`] picks one at startup.

pub mod memory;
pub mod models;
pub mod postgres;

use std::future::Future;

use crate::domain::{EventId, Match, MatchId, MatchPatch, PlayerId, Slot};
use crate::error::BracketError;

pub use memory::InMemoryMatchStore;
pub use postgres::PostgresMatchStore;

/// Storage operations on the shared match table.
///
/// Every method is a single round-trip; no method spans more than one
/// logical statement, and callers must not assume two calls are atomic.
pub trait MatchStore: Send + Sync + 'static {
    /// Returns all matches of an event in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::PersistenceError`] if the read fails.
    fn list_matches(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<Match>, BracketError>> + Send;

    /// Fetches a match by id.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::PersistenceError`] if the read fails.
    fn get_match(
        &self,
        match_id: MatchId,
    ) -> impl Future<Output = Result<Option<Match>, BracketError>> + Send;

    /// Fetches the match at a bracket position.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::PersistenceError`] if the read fails.
    fn find_match(
        &self,
        event_id: EventId,
        round_number: u32,
        match_order: u32,
    ) -> impl Future<Output = Result<Option<Match>, BracketError>> + Send;

    /// Applies a partial update and returns the updated row.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::MatchNotFound`] for an unknown id and
    /// [`BracketError::PersistenceError`] if the write fails.
    fn update_match(
        &self,
        match_id: MatchId,
        patch: MatchPatch,
    ) -> impl Future<Output = Result<Match, BracketError>> + Send;

    /// Writes `player` into `slot` only if the slot is empty or already
    /// holds `player`. Returns `None` when another player holds it.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::MatchNotFound`] for an unknown id and
    /// [`BracketError::PersistenceError`] if the write fails.
    fn assign_slot_if_vacant(
        &self,
        match_id: MatchId,
        slot: Slot,
        player: PlayerId,
    ) -> impl Future<Output = Result<Option<Match>, BracketError>> + Send;

    /// Inserts new matches, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::DuplicateMatch`] if a bracket position is
    /// already taken and [`BracketError::InvalidRequest`] if a match id is.
    fn insert_matches(
        &self,
        matches: Vec<Match>,
    ) -> impl Future<Output = Result<usize, BracketError>> + Send;
}

/// Store selected at startup from configuration.
#[derive(Debug)]
pub enum MatchRepository {
    /// Process-local store; contents are lost on restart.
    Memory(InMemoryMatchStore),
    /// PostgreSQL-backed store.
    Postgres(PostgresMatchStore),
}

impl MatchStore for MatchRepository {
    async fn list_matches(&self, event_id: EventId) -> Result<Vec<Match>, BracketError> {
        match self {
            Self::Memory(s) => s.list_matches(event_id).await,
            Self::Postgres(s) => s.list_matches(event_id).await,
        }
    }

    async fn get_match(&self, match_id: MatchId) -> Result<Option<Match>, BracketError> {
        match self {
            Self::Memory(s) => s.get_match(match_id).await,
            Self::Postgres(s) => s.get_match(match_id).await,
        }
    }

    async fn find_match(
        &self,
        event_id: EventId,
        round_number: u32,
        match_order: u32,
    ) -> Result<Option<Match>, BracketError> {
        match self {
            Self::Memory(s) => s.find_match(event_id, round_number, match_order).await,
            Self::Postgres(s) => s.find_match(event_id, round_number, match_order).await,
        }
    }

    async fn update_match(
        &self,
        match_id: MatchId,
        patch: MatchPatch,
    ) -> Result<Match, BracketError> {
        match self {
            Self::Memory(s) => s.update_match(match_id, patch).await,
            Self::Postgres(s) => s.update_match(match_id, patch).await,
        }
    }

    async fn assign_slot_if_vacant(
        &self,
        match_id: MatchId,
        slot: Slot,
        player: PlayerId,
    ) -> Result<Option<Match>, BracketError> {
        match self {
            Self::Memory(s) => s.assign_slot_if_vacant(match_id, slot, player).await,
            Self::Postgres(s) => s.assign_slot_if_vacant(match_id, slot, player).await,
        }
    }

    async fn insert_matches(&self, matches: Vec<Match>) -> Result<usize, BracketError> {
        match self {
            Self::Memory(s) => s.insert_matches(matches).await,
            Self::Postgres(s) => s.insert_matches(matches).await,
        }
    }
}
