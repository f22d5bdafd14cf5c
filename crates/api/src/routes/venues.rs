//! Route definitions for `/venues` and their spaces.

use axum::routing::get;
use axum::Router;

use crate::handlers::venues;
use crate::state::AppState;

/// Routes mounted at `/venues`.
///
/// ```text
/// GET  /               -> list_venues   (?sort=&page=&size=)
/// POST /               -> create_venue  (manager/admin)
/// GET  /{id}/spaces    -> list_spaces
/// POST /{id}/spaces    -> create_space  (venue manager/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(venues::list_venues).post(venues::create_venue))
        .route(
            "/{id}/spaces",
            get(venues::list_spaces).post(venues::create_space),
        )
}
