//! Unauthenticated routes used by the marketing site.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bookings, catalog, inquiries};
use crate::state::AppState;

/// ```text
/// GET    /services                 -> catalog::list_services
/// POST   /bookings                 -> bookings::submit
/// GET    /bookings/{booking_ref}   -> bookings::lookup
/// POST   /inquiries                -> inquiries::submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/services", get(catalog::list_services))
        .route("/bookings", post(bookings::submit))
        .route("/bookings/{booking_ref}", get(bookings::lookup))
        .route("/inquiries", post(inquiries::submit))
}
