//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Create / update DTOs carrying already-validated values
//!
//! Vocabulary columns are stored as TEXT and decoded into the core enums
//! through `#[sqlx(try_from = "String")]`.

pub mod booking;
pub mod client;
pub mod inquiry;
pub mod notification_log;
pub mod quotation;
pub mod service;
pub mod staff;

/// Result of a compare-and-swap write.
#[derive(Debug)]
pub enum StatusUpdate<T> {
    /// The row matched the expected state and was written.
    Applied(T),
    /// The row no longer matched; nothing was written.
    Stale,
}
