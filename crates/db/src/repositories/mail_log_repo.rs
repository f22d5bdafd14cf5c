//! Repository for the `mail_logs` table.

use sqlx::PgPool;
use venuebook_core::types::DbId;

use crate::models::mail_log::{CreateMailLog, MailLog};

/// Column list for `mail_logs` queries.
const COLUMNS: &str = "\
    id, recipient, template, status, error_code, detail, booking_id, user_id, created_at";

/// Append-only access to the mail audit log.
pub struct MailLogRepo;

impl MailLogRepo {
    pub async fn record(pool: &PgPool, input: &CreateMailLog) -> Result<MailLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO mail_logs \
                (recipient, template, status, error_code, detail, booking_id, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MailLog>(&query)
            .bind(&input.recipient)
            .bind(&input.template)
            .bind(&input.status)
            .bind(&input.error_code)
            .bind(&input.detail)
            .bind(input.booking_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Mail attempts linked to a booking, oldest first.
    pub async fn list_for_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Vec<MailLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mail_logs WHERE booking_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, MailLog>(&query)
            .bind(booking_id)
            .fetch_all(pool)
            .await
    }
}
