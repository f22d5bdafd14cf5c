//! Outbound mail: templates, transports, and the mail failure signal.
//!
//! Delivery never fails the operation that triggered it. Callers go through
//! [`deliver`], which turns a [`MailException`] into
//! [`SendMailStatus::Failed`](venuebook_core::status::SendMailStatus) for the
//! audit log.

pub mod config;
pub mod error;
pub mod mailer;
pub mod outcome;
pub mod template;

pub use config::MailConfig;
pub use error::{MailDetail, MailErrorCode, MailException};
pub use mailer::{mailer_from_env, LogMailer, Mailer, OutgoingMail, SmtpMailer};
pub use outcome::{deliver, MailOutcome};
