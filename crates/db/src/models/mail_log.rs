//! Audit rows for mail-send attempts.

use serde::Serialize;
use sqlx::FromRow;
use venuebook_core::types::{DbId, Timestamp};

/// A row from the `mail_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MailLog {
    pub id: DbId,
    pub recipient: String,
    pub template: String,
    /// `"SENT"` or `"FAILED"`.
    pub status: String,
    pub error_code: Option<String>,
    pub detail: Option<serde_json::Value>,
    pub booking_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for recording one mail outcome.
#[derive(Debug, Clone)]
pub struct CreateMailLog {
    pub recipient: String,
    pub template: String,
    pub status: String,
    pub error_code: Option<String>,
    pub detail: Option<serde_json::Value>,
    pub booking_id: Option<DbId>,
    pub user_id: Option<DbId>,
}
