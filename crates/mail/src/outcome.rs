//! Downgrading mail failures to a recorded status.

use venuebook_core::status::SendMailStatus;

use crate::error::MailException;
use crate::mailer::{Mailer, OutgoingMail};

/// Result of one delivery attempt, ready to be written to the mail log.
#[derive(Debug, Clone, PartialEq)]
pub struct MailOutcome {
    pub status: SendMailStatus,
    pub error: Option<MailException>,
}

impl MailOutcome {
    pub fn sent() -> Self {
        Self {
            status: SendMailStatus::Sent,
            error: None,
        }
    }

    pub fn failed(error: MailException) -> Self {
        Self {
            status: SendMailStatus::Failed,
            error: Some(error),
        }
    }

    pub fn is_sent(&self) -> bool {
        self.status == SendMailStatus::Sent
    }

    /// `code` of the failure, e.g. `"PROVIDER_REJECTED"`.
    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }

    pub fn detail_json(&self) -> Option<serde_json::Value> {
        self.error
            .as_ref()
            .and_then(|e| e.detail.as_ref())
            .map(|d| d.to_json())
    }
}

/// Attempt delivery. A [`MailException`] is logged and reported as
/// [`SendMailStatus::Failed`]; it never propagates to the caller.
pub async fn deliver(mailer: &dyn Mailer, mail: &OutgoingMail) -> MailOutcome {
    match mailer.send(mail).await {
        Ok(()) => MailOutcome::sent(),
        Err(err) => {
            tracing::warn!(
                to = %mail.to,
                template = %mail.template,
                code = %err.code,
                "Mail delivery failed, recording as FAILED"
            );
            MailOutcome::failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::MailErrorCode;
    use crate::template::BOOKING_CONFIRMATION;

    /// Fails every send with a fixed code and counts attempts.
    struct FailingMailer {
        code: MailErrorCode,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _mail: &OutgoingMail) -> Result<(), MailException> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(MailException::with_detail(
                self.code,
                serde_json::json!({ "reason": "550 mailbox unavailable" }),
            ))
        }
    }

    struct AcceptingMailer;

    #[async_trait]
    impl Mailer for AcceptingMailer {
        async fn send(&self, _mail: &OutgoingMail) -> Result<(), MailException> {
            Ok(())
        }
    }

    fn mail() -> OutgoingMail {
        OutgoingMail::new("lan@example.com", BOOKING_CONFIRMATION)
    }

    #[tokio::test]
    async fn provider_rejection_is_recorded_as_failed() {
        let mailer = FailingMailer {
            code: MailErrorCode::ProviderRejected,
            attempts: AtomicUsize::new(0),
        };

        let outcome = deliver(&mailer, &mail()).await;

        assert_eq!(outcome.status, SendMailStatus::Failed);
        assert_eq!(outcome.error_code(), Some("PROVIDER_REJECTED"));
        assert_eq!(
            outcome.detail_json(),
            Some(serde_json::json!({ "reason": "550 mailbox unavailable" }))
        );
        assert_eq!(mailer.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_is_recorded_as_sent() {
        let outcome = deliver(&AcceptingMailer, &mail()).await;
        assert!(outcome.is_sent());
        assert_eq!(outcome.error_code(), None);
        assert_eq!(outcome.detail_json(), None);
    }

    #[tokio::test]
    async fn every_code_downgrades_to_failed() {
        for code in [
            MailErrorCode::TemplateNotFound,
            MailErrorCode::MalformedRecipient,
            MailErrorCode::ProviderRejected,
            MailErrorCode::TransportFailure,
        ] {
            let mailer = FailingMailer {
                code,
                attempts: AtomicUsize::new(0),
            };
            let outcome = deliver(&mailer, &mail()).await;
            assert_eq!(outcome.status, SendMailStatus::Failed);
            assert_eq!(outcome.error.map(|e| e.code), Some(code));
        }
    }
}
