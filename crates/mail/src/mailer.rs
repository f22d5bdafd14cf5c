//! Mail transports behind the [`Mailer`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;
use crate::error::{MailErrorCode, MailException};
use crate::template::{self, RenderedMail, TemplateContext};

/// A templated mail addressed to one recipient.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub template: String,
    pub context: TemplateContext,
}

impl OutgoingMail {
    pub fn new(to: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            template: template.into(),
            context: TemplateContext::new(),
        }
    }

    /// Add a placeholder value.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn render(&self) -> Result<RenderedMail, MailException> {
        template::render(&self.template, &self.context)
    }
}

/// Delivers rendered mail. Implementations report every failure as a
/// [`MailException`]; they never panic on bad input.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailException>;
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Sends mail through an SMTP relay using STARTTLS.
pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailException> {
        let from: Mailbox = config.from_address.parse().map_err(|e| {
            MailException::with_detail(
                MailErrorCode::MalformedRecipient,
                format!("invalid sender '{}': {e}", config.from_address),
            )
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailException::with_detail(MailErrorCode::TransportFailure, e.to_string()))?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailException> {
        let rendered = mail.render()?;

        let to: Mailbox = mail.to.parse().map_err(|e| {
            MailException::with_detail(
                MailErrorCode::MalformedRecipient,
                format!("invalid recipient '{}': {e}", mail.to),
            )
        })?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(rendered.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(rendered.body)
            .map_err(|e| {
                MailException::with_detail(MailErrorCode::MalformedRecipient, e.to_string())
            })?;

        self.transport
            .send(message)
            .await
            .map_err(|e| classify_smtp_error(&e))?;

        tracing::info!(to = %mail.to, template = %mail.template, "Mail sent");
        Ok(())
    }
}

fn classify_smtp_error(err: &lettre::transport::smtp::Error) -> MailException {
    let code = if err.is_permanent() {
        MailErrorCode::ProviderRejected
    } else {
        MailErrorCode::TransportFailure
    };
    MailException::with_detail(code, err.to_string())
}

// ---------------------------------------------------------------------------
// LogMailer
// ---------------------------------------------------------------------------

/// Renders mail and writes it to the log instead of sending it. Used when
/// SMTP is not configured.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailException> {
        let rendered = mail.render()?;
        if mail.to.parse::<Mailbox>().is_err() {
            return Err(MailException::with_detail(
                MailErrorCode::MalformedRecipient,
                mail.to.clone(),
            ));
        }
        tracing::info!(
            to = %mail.to,
            template = %mail.template,
            subject = %rendered.subject,
            body = %rendered.body,
            "SMTP not configured, mail logged instead of sent"
        );
        Ok(())
    }
}

/// Build the mailer selected by the environment: SMTP when `SMTP_HOST` is
/// set, otherwise [`LogMailer`].
pub fn mailer_from_env() -> Result<Arc<dyn Mailer>, MailException> {
    match MailConfig::from_env() {
        Some(config) => {
            tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP mailer configured");
            Ok(Arc::new(SmtpMailer::new(&config)?))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, outgoing mail will only be logged");
            Ok(Arc::new(LogMailer))
        }
    }
}
