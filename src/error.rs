//! Service error types with HTTP status code mapping.
//!
//! [`BracketError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{MatchId, MatchStatus, PlayerId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "winner ... is not a player of match ...",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum BracketError {
    /// Match with the given ID was not found.
    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The proposed winner is neither player of the match.
    #[error("winner {winner_id} is not a player of match {match_id}")]
    InvalidWinner {
        /// Match the result was recorded against.
        match_id: MatchId,
        /// Rejected winner.
        winner_id: PlayerId,
    },

    /// The requested status change is not allowed.
    #[error("match {match_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Match being transitioned.
        match_id: MatchId,
        /// Current status.
        from: MatchStatus,
        /// Requested status.
        to: MatchStatus,
    },

    /// Advancement was requested for a match without a winner.
    #[error("match {0} has no winner yet")]
    MatchUndecided(MatchId),

    /// A match already occupies this bracket position.
    #[error("duplicate match at round {round_number}, order {match_order}")]
    DuplicateMatch {
        /// Round of the conflicting position.
        round_number: u32,
        /// Order of the conflicting position.
        match_order: u32,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BracketError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidWinner { .. } => 1002,
            Self::MatchNotFound(_) => 2001,
            Self::InvalidTransition { .. } => 2002,
            Self::MatchUndecided(_) => 2003,
            Self::DuplicateMatch { .. } => 2004,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidWinner { .. } => StatusCode::BAD_REQUEST,
            Self::MatchNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTransition { .. }
            | Self::MatchUndecided(_)
            | Self::DuplicateMatch { .. } => StatusCode::CONFLICT,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for BracketError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for BracketError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
