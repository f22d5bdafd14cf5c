//! Sending transactional mail and recording each attempt in `mail_logs`.
//!
//! Delivery never fails the surrounding request: a [`MailException`] becomes a
//! `FAILED` log row, and a failure to write the log row is itself only logged.
//!
//! [`MailException`]: venuebook_mail::MailException

use venuebook_core::types::DbId;
use venuebook_db::models::booking::BookingSummary;
use venuebook_db::models::mail_log::CreateMailLog;
use venuebook_db::repositories::MailLogRepo;
use venuebook_mail::template::{BOOKING_CANCELLED, BOOKING_CONFIRMATION, REGISTRATION_VERIFICATION};
use venuebook_mail::{deliver, MailOutcome, OutgoingMail};

use crate::state::AppState;

/// What a mail is about, for the log row.
#[derive(Debug, Clone, Copy, Default)]
pub struct MailSubject {
    pub booking_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

/// Deliver `mail` and persist the outcome.
pub async fn send_and_record(
    state: &AppState,
    mail: &OutgoingMail,
    subject: MailSubject,
) -> MailOutcome {
    let outcome = deliver(state.mailer.as_ref(), mail).await;

    let entry = log_entry(mail, &outcome, subject);
    if let Err(e) = MailLogRepo::record(&state.pool, &entry).await {
        tracing::error!(
            error = %e,
            to = %mail.to,
            template = %mail.template,
            status = %outcome.status,
            "Failed to record mail log"
        );
    }

    outcome
}

fn log_entry(mail: &OutgoingMail, outcome: &MailOutcome, subject: MailSubject) -> CreateMailLog {
    CreateMailLog {
        recipient: mail.to.clone(),
        template: mail.template.clone(),
        status: outcome.status.as_str().to_string(),
        error_code: outcome.error_code().map(str::to_string),
        detail: outcome.detail_json(),
        booking_id: subject.booking_id,
        user_id: subject.user_id,
    }
}

/// Verification mail sent right after registration.
pub fn registration_mail(email: &str, name: &str) -> OutgoingMail {
    OutgoingMail::new(email, REGISTRATION_VERIFICATION)
        .with("name", name)
        .with("email", email)
}

/// Confirmation mail for a newly created booking.
pub fn booking_confirmation_mail(to: &str, summary: &BookingSummary) -> OutgoingMail {
    booking_mail(to, BOOKING_CONFIRMATION, summary)
}

pub fn booking_cancelled_mail(to: &str, summary: &BookingSummary) -> OutgoingMail {
    booking_mail(to, BOOKING_CANCELLED, summary)
}

fn booking_mail(to: &str, template: &str, summary: &BookingSummary) -> OutgoingMail {
    let name = summary
        .user
        .as_ref()
        .map(|u| u.name.clone())
        .or_else(|| summary.booking.guest_name.clone())
        .unwrap_or_default();

    OutgoingMail::new(to, template)
        .with("booking_id", summary.booking.id)
        .with("name", name)
        .with("space", &summary.space.space.name)
        .with("venue", &summary.space.venue.name)
        .with("start_time", summary.booking.start_time.to_rfc3339())
        .with("end_time", summary.booking.end_time.to_rfc3339())
        .with("status", &summary.booking.status)
}
