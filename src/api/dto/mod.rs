//! Data Transfer Objects for REST request/response serialization.

pub mod bracket_dto;
pub mod match_dto;

pub use bracket_dto::*;
pub use match_dto::*;
