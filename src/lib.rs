//! # bracket-gateway
//!
//! REST API for single-elimination event brackets.
//!
//! Matches are created in bulk when a bracket is generated elsewhere and
//! imported here. This service records results, moves each winner into
//! the next round, and serves the bracket as ordered rounds.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── MatchService (service/)
//!     │     record result → advance winner
//!     │
//!     ├── Bracket / AdvancementTarget (domain/)
//!     │
//!     └── MatchStore (persistence/)
//!           ├── in-memory
//!           └── PostgreSQL
//! ```
//!
//! ## Pairing rule
//!
//! Round 1 is the final. The winner of match `order` in round `r` plays
//! in match `ceil(order / 2)` of round `r - 1`, as `player1` when `order`
//! is odd and `player2` when it is even.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
