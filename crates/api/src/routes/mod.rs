pub mod auth;
pub mod bookings;
pub mod health;
pub mod venues;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/me                       caller as {id, name}
///
/// /venues                        list (public), create (manager/admin)
/// /venues/{id}/spaces            list (public), create (venue manager/admin)
///
/// /bookings                      list (own; admin: all), create
/// /bookings/{id}                 get
/// /bookings/{id}/cancel          cancel (POST)
/// /bookings/{id}/mail-logs       mail attempts (venue manager/admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/venues", venues::router())
        .nest("/bookings", bookings::router())
}
