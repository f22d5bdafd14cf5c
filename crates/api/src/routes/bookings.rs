//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`. All require authentication.
///
/// ```text
/// GET  /                 -> list_bookings   (?sort=&page=&size=&from=&to=&status=&venue_id=&space_id=)
/// POST /                 -> create_booking
/// GET  /{id}             -> get_booking
/// POST /{id}/cancel      -> cancel_booking
/// GET  /{id}/mail-logs   -> list_mail_logs  (venue manager/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .route("/{id}/mail-logs", get(bookings::list_mail_logs))
}
