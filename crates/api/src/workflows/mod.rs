//! Use-case workflows sitting between handlers and repositories.
//!
//! Each workflow validates input with the pure rules in `hvacdesk_core`,
//! performs its writes through the repositories, and publishes a
//! [`LifecycleEvent`](hvacdesk_core::lifecycle::LifecycleEvent) only after
//! the transaction has committed.

pub mod bookings;
pub mod clients;
pub mod inquiries;
pub mod quotations;

use chrono::{Datelike, NaiveDate, Utc};

/// Business calendar date used for intake and validity rules.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Year that owns newly allocated quote numbers.
pub(crate) fn current_year() -> i32 {
    today().year()
}

/// Trim an optional free-text field, mapping blank input to `None`.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
