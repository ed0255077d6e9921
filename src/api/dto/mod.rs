//! Data Transfer Objects for REST request/response serialization.
//!
//! Dates are ISO-8601 calendar dates (`YYYY-MM-DD`); statuses are
//! snake_case strings.

pub mod profile_dto;
pub mod vaccine_dto;

pub use profile_dto::*;
pub use vaccine_dto::*;
