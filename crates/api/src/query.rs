//! Shared query parameter types for API handlers.

use hvacdesk_core::search::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` pair ready for a repository call.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// List parameters for lifecycle entities (`?status=&limit=&offset=`).
///
/// `status` stays a raw string here so an unknown value surfaces as a
/// validation error with the allowed vocabulary instead of a generic
/// deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct StatusListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl StatusListParams {
    pub fn page(&self) -> (i64, i64) {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
        .resolve()
    }
}
