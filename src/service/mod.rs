//! Service layer: business logic orchestration.
//!
//! [`MatchService`] validates results, writes them through the
//! [`crate::persistence::MatchStore`], and advances winners.

pub mod match_service;

pub use match_service::{MatchService, NewMatch, RecordOutcome, RecordResult};
