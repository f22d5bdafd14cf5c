use std::sync::Arc;

use venuebook_mail::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything inside is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: venuebook_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Outgoing mail transport (SMTP, or log-only when SMTP is not configured).
    pub mailer: Arc<dyn Mailer>,
}
