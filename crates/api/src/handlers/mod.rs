pub mod bookings;
pub mod catalog;
pub mod clients;
pub mod inquiries;
pub mod quotations;

use serde::Deserialize;

/// Body of every `PUT {id}/status` endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
    pub note: Option<String>,
}
