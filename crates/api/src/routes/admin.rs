//! Back-office routes. Every handler requires a staff or admin token.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{bookings, catalog, clients, inquiries, quotations};
use crate::state::AppState;

/// Routes mounted at `/admin`.
pub fn router() -> Router<AppState> {
    let client_routes = Router::new()
        .route("/", get(clients::list).post(clients::create))
        .route(
            "/{id}",
            get(clients::get_by_id)
                .put(clients::update)
                .delete(clients::delete),
        );

    let booking_routes = Router::new()
        .route("/", get(bookings::list))
        .route("/{id}", get(bookings::get_by_id))
        .route("/{id}/status", put(bookings::change_status))
        .route("/{id}/cost", put(bookings::update_cost))
        .route("/{id}/technician", put(bookings::assign_technician))
        .route("/{id}/notes", put(bookings::update_notes))
        .route("/{id}/audit", get(bookings::audit));

    let inquiry_routes = Router::new()
        .route("/", get(inquiries::list))
        .route("/{id}", get(inquiries::get_by_id))
        .route("/{id}/status", put(inquiries::change_status))
        .route("/{id}/quotation", post(inquiries::convert));

    let quotation_routes = Router::new()
        .route("/", get(quotations::list).post(quotations::create))
        .route(
            "/{id}",
            get(quotations::get_by_id)
                .put(quotations::update)
                .delete(quotations::delete),
        )
        .route("/{id}/status", put(quotations::change_status))
        .route("/{id}/send", post(quotations::send));

    Router::new()
        .route("/services", post(catalog::create_service))
        .route("/staff", get(catalog::list_staff))
        .nest("/clients", client_routes)
        .nest("/bookings", booking_routes)
        .nest("/inquiries", inquiry_routes)
        .nest("/quotations", quotation_routes)
}
