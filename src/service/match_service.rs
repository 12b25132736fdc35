//! Match service: records results and moves winners through the bracket.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{
    Advancement, AdvancementTarget, Bracket, EventId, Match, MatchId, MatchPatch, MatchStatus,
    PlayerId,
};
use crate::error::BracketError;
use crate::persistence::{MatchRepository, MatchStore};

/// Result entry for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordResult {
    /// Winning player; must be one of the match's two players.
    pub winner_id: PlayerId,
    /// Score of the first player, left unchanged when `None`.
    pub player1_score: Option<i32>,
    /// Score of the second player, left unchanged when `None`.
    pub player2_score: Option<i32>,
}

/// Outcome of [`MatchService::record_result`].
///
/// The match is always completed once this value exists; `advancement`
/// says whether its winner reached the next round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// The completed match as stored.
    pub completed: Match,
    /// What happened downstream.
    pub advancement: Advancement,
}

/// A pre-existing bracket row to load into the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMatch {
    /// Explicit id; generated when `None`.
    pub id: Option<MatchId>,
    /// Round number, 1 being the final.
    pub round_number: u32,
    /// 1-based order within the round.
    pub match_order: u32,
    /// First player, if already known.
    pub player1_id: Option<PlayerId>,
    /// Second player, if already known.
    pub player2_id: Option<PlayerId>,
    /// Winner of an already played match.
    pub winner_id: Option<PlayerId>,
    /// First player's score.
    pub player1_score: Option<i32>,
    /// Second player's score.
    pub player2_score: Option<i32>,
    /// Status; derived from `winner_id` when `None`.
    pub status: Option<MatchStatus>,
}

/// Orchestration layer for bracket operations.
///
/// Stateless coordinator over a [`MatchStore`]. Recording a result is two
/// independent store writes (the result, then the downstream slot) with no
/// transaction around them: if the second write fails the match stays
/// completed and the failure is reported in [`RecordOutcome::advancement`].
#[derive(Debug)]
pub struct MatchService<S = MatchRepository> {
    store: Arc<S>,
    guard_slots: bool,
}

impl<S: MatchStore> MatchService<S> {
    /// Creates a new `MatchService`.
    ///
    /// With `guard_slots` set, advancement only writes a slot that is empty
    /// or already holds the same winner. Otherwise the last write wins.
    #[must_use]
    pub fn new(store: Arc<S>, guard_slots: bool) -> Self {
        Self { store, guard_slots }
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Builds the bracket view for an event.
    ///
    /// # Errors
    ///
    /// Returns a [`BracketError`] if the store read fails.
    pub async fn bracket(&self, event_id: EventId) -> Result<Bracket, BracketError> {
        let matches = self.store.list_matches(event_id).await?;
        Ok(Bracket::from_matches(event_id, matches))
    }

    /// Returns all matches of an event, earliest round first.
    ///
    /// # Errors
    ///
    /// Returns a [`BracketError`] if the store read fails.
    pub async fn list_matches(&self, event_id: EventId) -> Result<Vec<Match>, BracketError> {
        let mut matches = self.store.list_matches(event_id).await?;
        matches.sort_by(|a, b| {
            b.round_number
                .cmp(&a.round_number)
                .then(a.match_order.cmp(&b.match_order))
        });
        Ok(matches)
    }

    /// Fetches a single match.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::MatchNotFound`] for an unknown id.
    pub async fn get_match(&self, match_id: MatchId) -> Result<Match, BracketError> {
        self.store
            .get_match(match_id)
            .await?
            .ok_or(BracketError::MatchNotFound(match_id))
    }

    /// Loads existing bracket rows for an event.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::InvalidRequest`] for malformed rows or an id
    /// given twice, and [`BracketError::DuplicateMatch`] if a position is
    /// already taken.
    pub async fn import_matches(
        &self,
        event_id: EventId,
        rows: Vec<NewMatch>,
    ) -> Result<Vec<Match>, BracketError> {
        if rows.is_empty() {
            return Err(BracketError::InvalidRequest(
                "at least one match is required".to_string(),
            ));
        }

        let matches = rows
            .into_iter()
            .map(|row| build_match(event_id, row))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::with_capacity(matches.len());
        if let Some(repeated) = matches.iter().find(|m| !seen.insert(m.id)) {
            return Err(BracketError::InvalidRequest(format!(
                "match {} appears more than once",
                repeated.id
            )));
        }

        let inserted = self.store.insert_matches(matches.clone()).await?;
        tracing::info!(%event_id, inserted, "matches imported");
        Ok(matches)
    }

    /// Moves a pending match to `in_progress`.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::MatchNotFound`] for an unknown id and
    /// [`BracketError::InvalidTransition`] unless the match is pending.
    pub async fn start_match(&self, match_id: MatchId) -> Result<Match, BracketError> {
        let current = self.get_match(match_id).await?;
        if !current.status.can_transition_to(MatchStatus::InProgress) {
            return Err(BracketError::InvalidTransition {
                match_id,
                from: current.status,
                to: MatchStatus::InProgress,
            });
        }

        let started = self
            .store
            .update_match(match_id, MatchPatch::status(MatchStatus::InProgress))
            .await?;
        tracing::info!(%match_id, "match started");
        Ok(started)
    }

    /// Records a winner and optional scores, completes the match, then
    /// advances the winner.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::MatchNotFound`] for an unknown id,
    /// [`BracketError::InvalidWinner`] if the winner is not a player of the
    /// match (nothing is written), or the store error if the result write
    /// fails (no advancement is attempted). Advancement failures are not
    /// errors; they are reported in the returned outcome.
    pub async fn record_result(
        &self,
        match_id: MatchId,
        result: RecordResult,
    ) -> Result<RecordOutcome, BracketError> {
        let current = self.get_match(match_id).await?;
        if !current.has_player(result.winner_id) {
            return Err(BracketError::InvalidWinner {
                match_id,
                winner_id: result.winner_id,
            });
        }

        let completed = self
            .store
            .update_match(
                match_id,
                MatchPatch {
                    winner_id: Some(result.winner_id),
                    player1_score: result.player1_score,
                    player2_score: result.player2_score,
                    status: Some(MatchStatus::Completed),
                    ..MatchPatch::default()
                },
            )
            .await?;

        tracing::info!(
            %match_id,
            event_id = %completed.event_id,
            round_number = completed.round_number,
            match_order = completed.match_order,
            winner_id = %result.winner_id,
            "match result recorded"
        );

        let advancement = match self.advance(&completed).await {
            Ok(advancement) => advancement,
            Err(err) => {
                tracing::error!(
                    %match_id,
                    error = %err,
                    "winner advancement failed; match stays completed"
                );
                Advancement::Failed {
                    message: err.to_string(),
                }
            }
        };

        Ok(RecordOutcome {
            completed,
            advancement,
        })
    }

    /// Re-runs advancement for a stored match. Used to repair a bracket
    /// after a failed downstream write.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::MatchNotFound`] for an unknown id,
    /// [`BracketError::MatchUndecided`] if the match has no winner, or the
    /// store error if the downstream write fails.
    pub async fn advance_match(&self, match_id: MatchId) -> Result<Advancement, BracketError> {
        let current = self.get_match(match_id).await?;
        if current.status != MatchStatus::Completed {
            return Err(BracketError::MatchUndecided(match_id));
        }
        self.advance(&current).await
    }

    /// Places the winner of `decided` into its downstream match.
    ///
    /// A final needs nothing and touches no storage. A missing downstream
    /// match is logged and reported as [`Advancement::TargetMissing`]. The
    /// downstream status is never changed. Repeating the call rewrites the
    /// same slot with the same player.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::MatchUndecided`] if `decided` has no winner,
    /// or the store error if the lookup or write fails.
    pub async fn advance(&self, decided: &Match) -> Result<Advancement, BracketError> {
        let Some(target) =
            AdvancementTarget::for_position(decided.round_number, decided.match_order)
        else {
            return Ok(Advancement::Final);
        };
        let winner_id = decided
            .winner_id
            .ok_or(BracketError::MatchUndecided(decided.id))?;

        let Some(next) = self
            .store
            .find_match(decided.event_id, target.round_number, target.match_order)
            .await?
        else {
            tracing::warn!(
                match_id = %decided.id,
                event_id = %decided.event_id,
                round_number = target.round_number,
                match_order = target.match_order,
                "advancement target missing; bracket is malformed"
            );
            return Ok(Advancement::TargetMissing {
                round_number: target.round_number,
                match_order: target.match_order,
            });
        };

        if self.guard_slots {
            let written = self
                .store
                .assign_slot_if_vacant(next.id, target.slot, winner_id)
                .await?;
            if written.is_none() {
                let occupant = self
                    .store
                    .get_match(next.id)
                    .await?
                    .and_then(|m| m.player_in(target.slot));
                tracing::warn!(
                    match_id = %decided.id,
                    target_match_id = %next.id,
                    slot = target.slot.column(),
                    "advancement slot already taken"
                );
                return Ok(Advancement::SlotConflict {
                    target_match_id: next.id,
                    slot: target.slot,
                    occupant,
                });
            }
        } else {
            self.store
                .update_match(next.id, MatchPatch::slot(target.slot, winner_id))
                .await?;
        }

        tracing::info!(
            match_id = %decided.id,
            target_match_id = %next.id,
            round_number = target.round_number,
            match_order = target.match_order,
            slot = target.slot.column(),
            %winner_id,
            "winner advanced"
        );

        Ok(Advancement::Advanced {
            target_match_id: next.id,
            round_number: target.round_number,
            match_order: target.match_order,
            slot: target.slot,
        })
    }
}

/// Validates an import row and turns it into a stored match.
fn build_match(event_id: EventId, row: NewMatch) -> Result<Match, BracketError> {
    if row.round_number == 0 || row.match_order == 0 {
        return Err(BracketError::InvalidRequest(format!(
            "round_number and match_order start at 1 (got round {}, order {})",
            row.round_number, row.match_order
        )));
    }
    if row.player1_id.is_some() && row.player1_id == row.player2_id {
        return Err(BracketError::InvalidRequest(format!(
            "match at round {}, order {} lists the same player twice",
            row.round_number, row.match_order
        )));
    }

    let mut m = Match::new(event_id, row.round_number, row.match_order)
        .with_players(row.player1_id, row.player2_id);
    if let Some(id) = row.id {
        m.id = id;
    }

    if let Some(winner_id) = row.winner_id
        && !m.has_player(winner_id)
    {
        return Err(BracketError::InvalidWinner {
            match_id: m.id,
            winner_id,
        });
    }

    let status = row.status.unwrap_or(if row.winner_id.is_some() {
        MatchStatus::Completed
    } else {
        MatchStatus::Pending
    });
    if (status == MatchStatus::Completed) != row.winner_id.is_some() {
        return Err(BracketError::InvalidRequest(format!(
            "match at round {}, order {} must have a winner exactly when completed",
            row.round_number, row.match_order
        )));
    }

    m.winner_id = row.winner_id;
    m.player1_score = row.player1_score;
    m.player2_score = row.player2_score;
    m.status = status;
    Ok(m)
}
