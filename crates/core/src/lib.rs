//! Domain logic for the hvacdesk back office.
//!
//! Everything in this crate is pure: status enums and their transition
//! tables, quotation pricing and numbering, contact validation, and the
//! typed [`lifecycle::LifecycleEvent`] values that the workflows publish
//! after a commit. Persistence lives in `hvacdesk_db`, delivery in
//! `hvacdesk_events`.

#[macro_use]
pub mod vocabulary;

pub mod booking;
pub mod client;
pub mod contact;
pub mod error;
pub mod inquiry;
pub mod lifecycle;
pub mod quotation;
pub mod roles;
pub mod search;
pub mod transition;
pub mod types;
