//! PostgreSQL implementation of the match store.

use sqlx::PgPool;
use uuid::Uuid;

use super::MatchStore;
use super::models::{MATCH_COLUMNS, MatchRow, to_db_int};
use crate::domain::{EventId, Match, MatchId, MatchPatch, PlayerId, Slot};
use crate::error::BracketError;

/// Name PostgreSQL gives the `matches` primary key constraint.
const PRIMARY_KEY: &str = "matches_pkey";

/// PostgreSQL-backed match store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresMatchStore {
    pool: PgPool,
}

impl PostgresMatchStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies pending migrations from `./migrations`.
    ///
    /// # Errors
    ///
    /// Returns a [`BracketError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), BracketError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| BracketError::PersistenceError(e.to_string()))
    }

    async fn fetch_by_id(&self, match_id: MatchId) -> Result<Option<Match>, BracketError> {
        let row = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"
        ))
        .bind(Uuid::from(match_id))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Match::try_from).transpose()
    }
}

impl MatchStore for PostgresMatchStore {
    async fn list_matches(&self, event_id: EventId) -> Result<Vec<Match>, BracketError> {
        let rows = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE event_id = $1"
        ))
        .bind(Uuid::from(event_id))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Match::try_from).collect()
    }

    async fn get_match(&self, match_id: MatchId) -> Result<Option<Match>, BracketError> {
        self.fetch_by_id(match_id).await
    }

    async fn find_match(
        &self,
        event_id: EventId,
        round_number: u32,
        match_order: u32,
    ) -> Result<Option<Match>, BracketError> {
        let row = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches \
             WHERE event_id = $1 AND round_number = $2 AND match_order = $3"
        ))
        .bind(Uuid::from(event_id))
        .bind(to_db_int(round_number, "round_number")?)
        .bind(to_db_int(match_order, "match_order")?)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Match::try_from).transpose()
    }

    async fn update_match(
        &self,
        match_id: MatchId,
        patch: MatchPatch,
    ) -> Result<Match, BracketError> {
        let row = sqlx::query_as::<_, MatchRow>(&format!(
            "UPDATE matches SET \
               player1_id = COALESCE($2, player1_id), \
               player2_id = COALESCE($3, player2_id), \
               winner_id = COALESCE($4, winner_id), \
               player1_score = COALESCE($5, player1_score), \
               player2_score = COALESCE($6, player2_score), \
               status = COALESCE($7, status), \
               updated_at = now() \
             WHERE id = $1 RETURNING {MATCH_COLUMNS}"
        ))
        .bind(Uuid::from(match_id))
        .bind(patch.player1_id.map(Uuid::from))
        .bind(patch.player2_id.map(Uuid::from))
        .bind(patch.winner_id.map(Uuid::from))
        .bind(patch.player1_score)
        .bind(patch.player2_score)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(BracketError::MatchNotFound(match_id))?
            .try_into()
    }

    async fn assign_slot_if_vacant(
        &self,
        match_id: MatchId,
        slot: Slot,
        player: PlayerId,
    ) -> Result<Option<Match>, BracketError> {
        let column = slot.column();
        let row = sqlx::query_as::<_, MatchRow>(&format!(
            "UPDATE matches SET {column} = $2, updated_at = now() \
             WHERE id = $1 AND ({column} IS NULL OR {column} = $2) \
             RETURNING {MATCH_COLUMNS}"
        ))
        .bind(Uuid::from(match_id))
        .bind(Uuid::from(player))
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Match::try_from(row).map(Some);
        }

        // No row updated: either the slot is taken or the match is gone.
        match self.fetch_by_id(match_id).await? {
            Some(_) => Ok(None),
            None => Err(BracketError::MatchNotFound(match_id)),
        }
    }

    async fn insert_matches(&self, matches: Vec<Match>) -> Result<usize, BracketError> {
        let mut tx = self.pool.begin().await?;

        for m in &matches {
            let result = sqlx::query(
                "INSERT INTO matches (id, event_id, round_number, match_order, player1_id, \
                   player2_id, winner_id, player1_score, player2_score, status, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            )
            .bind(Uuid::from(m.id))
            .bind(Uuid::from(m.event_id))
            .bind(to_db_int(m.round_number, "round_number")?)
            .bind(to_db_int(m.match_order, "match_order")?)
            .bind(m.player1_id.map(Uuid::from))
            .bind(m.player2_id.map(Uuid::from))
            .bind(m.winner_id.map(Uuid::from))
            .bind(m.player1_score)
            .bind(m.player2_score)
            .bind(m.status.as_str())
            .bind(m.created_at)
            .bind(m.updated_at)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(_) => {}
                Err(sqlx::Error::Database(db))
                    if db.is_unique_violation() && db.constraint() == Some(PRIMARY_KEY) =>
                {
                    return Err(BracketError::InvalidRequest(format!(
                        "match {} already exists",
                        m.id
                    )));
                }
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    return Err(BracketError::DuplicateMatch {
                        round_number: m.round_number,
                        match_order: m.match_order,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        tx.commit().await?;
        Ok(matches.len())
    }
}
