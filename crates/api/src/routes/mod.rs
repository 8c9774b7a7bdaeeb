pub mod admin;
pub mod health;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /services                                   list active services (public)
/// /bookings                                   submit booking (public)
/// /bookings/{booking_ref}                     booking status lookup (public)
/// /inquiries                                  submit inquiry (public)
///
/// /admin/services                             create (staff)
/// /admin/staff                                list active staff
/// /admin/clients                              list, create
/// /admin/clients/{id}                         get, update, delete
/// /admin/bookings                             list (?status=)
/// /admin/bookings/{id}                        get
/// /admin/bookings/{id}/status                 transition (PUT)
/// /admin/bookings/{id}/cost                   update costs (PUT)
/// /admin/bookings/{id}/technician             assign technician (PUT)
/// /admin/bookings/{id}/notes                  replace staff notes (PUT)
/// /admin/bookings/{id}/audit                  audit trail
/// /admin/inquiries                            list (?status=)
/// /admin/inquiries/{id}                       get
/// /admin/inquiries/{id}/status                transition (PUT)
/// /admin/inquiries/{id}/quotation             convert to draft quotation (POST)
/// /admin/quotations                           list (?status=), create
/// /admin/quotations/{id}                      get, update, delete
/// /admin/quotations/{id}/status               transition (PUT)
/// /admin/quotations/{id}/send                 send to client (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .nest("/admin", admin::router())
}
