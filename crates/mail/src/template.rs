//! Named plain-text mail templates with `{{key}}` placeholders.

use std::collections::BTreeMap;

use crate::error::{MailErrorCode, MailException};

pub const BOOKING_CONFIRMATION: &str = "booking_confirmation";
pub const BOOKING_CANCELLED: &str = "booking_cancelled";
pub const REGISTRATION_VERIFICATION: &str = "registration_verification";

/// Values substituted into a template.
pub type TemplateContext = BTreeMap<String, String>;

struct Template {
    name: &'static str,
    subject: &'static str,
    body: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template {
        name: BOOKING_CONFIRMATION,
        subject: "[Venuebook] Booking #{{booking_id}} received",
        body: "Hi {{name}},\n\n\
               Your booking of {{space}} at {{venue}} is recorded.\n\
               From: {{start_time}}\n\
               To:   {{end_time}}\n\
               Status: {{status}}\n",
    },
    Template {
        name: BOOKING_CANCELLED,
        subject: "[Venuebook] Booking #{{booking_id}} cancelled",
        body: "Hi {{name}},\n\n\
               Your booking of {{space}} at {{venue}} starting {{start_time}} \
               has been cancelled.\n",
    },
    Template {
        name: REGISTRATION_VERIFICATION,
        subject: "[Venuebook] Confirm your account",
        body: "Hi {{name}},\n\n\
               Thanks for registering. Your account is waiting for \
               verification; reply to this message or contact the venue \
               to confirm {{email}}.\n",
    },
];

/// A rendered subject and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

/// Render a registered template. Placeholders without a value render empty.
pub fn render(name: &str, context: &TemplateContext) -> Result<RenderedMail, MailException> {
    let template = TEMPLATES
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| MailException::with_detail(MailErrorCode::TemplateNotFound, name))?;

    Ok(RenderedMail {
        subject: substitute(template.subject, context),
        body: substitute(template.body, context),
    })
}

fn substitute(text: &str, context: &TemplateContext) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        match after_open.find("}}") {
            Some(close) => {
                let key = after_open[..close].trim();
                if let Some(value) = context.get(key) {
                    out.push_str(value);
                }
                rest = &after_open[close + 2..];
            }
            None => {
                // Unterminated placeholder is kept verbatim.
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
