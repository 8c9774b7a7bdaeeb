//! Staff authentication primitives.
//!
//! - [`jwt`] -- JWT access-token issuing and validation.

pub mod jwt;
