//! The mail failure signal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of reasons a mail could not be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MailErrorCode {
    /// No template is registered under the requested name.
    TemplateNotFound,
    /// Sender or recipient address could not be parsed, or the message
    /// could not be assembled.
    MalformedRecipient,
    /// The SMTP server permanently refused the message.
    ProviderRejected,
    /// Connection, TLS, authentication, or transient server failure.
    TransportFailure,
}

impl MailErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            MailErrorCode::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            MailErrorCode::MalformedRecipient => "MALFORMED_RECIPIENT",
            MailErrorCode::ProviderRejected => "PROVIDER_REJECTED",
            MailErrorCode::TransportFailure => "TRANSPORT_FAILURE",
        }
    }
}

impl fmt::Display for MailErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic payload attached to a [`MailException`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MailDetail {
    Text(String),
    Structured(serde_json::Value),
}

impl MailDetail {
    /// JSON form stored in `mail_logs.detail`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            MailDetail::Text(text) => serde_json::Value::String(text.clone()),
            MailDetail::Structured(value) => value.clone(),
        }
    }
}

impl From<String> for MailDetail {
    fn from(text: String) -> Self {
        MailDetail::Text(text)
    }
}

impl From<&str> for MailDetail {
    fn from(text: &str) -> Self {
        MailDetail::Text(text.to_string())
    }
}

impl From<serde_json::Value> for MailDetail {
    fn from(value: serde_json::Value) -> Self {
        MailDetail::Structured(value)
    }
}

/// Raised by a [`Mailer`](crate::Mailer) when a mail cannot be delivered.
///
/// Branch on [`code`](Self::code); `detail` is for logs only.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("Mail delivery failed: {code}")]
pub struct MailException {
    pub code: MailErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<MailDetail>,
}

impl MailException {
    pub fn new(code: MailErrorCode) -> Self {
        Self { code, detail: None }
    }

    pub fn with_detail(code: MailErrorCode, detail: impl Into<MailDetail>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }
}
