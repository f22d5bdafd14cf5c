//! Response body returned when inbound request data fails validation.
//!
//! ```json
//! { "statusCode": 400, "message": ["email: must be a valid email"], "error": "Bad Request" }
//! ```
//!
//! `message` is a list when the failures can be attributed to fields and a
//! single string otherwise (malformed JSON, unparsable query string).

use serde::{Deserialize, Serialize};
use validator::{ValidationErrors, ValidationErrorsKind};

/// HTTP status used for every validation failure.
pub const VALIDATION_STATUS_CODE: u16 = 400;

/// Short error-kind label sent alongside [`VALIDATION_STATUS_CODE`].
pub const VALIDATION_ERROR_LABEL: &str = "Bad Request";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationMessage {
    List(Vec<String>),
    Single(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationExceptionResponse {
    pub status_code: u16,
    pub message: ValidationMessage,
    pub error: String,
}

impl ValidationExceptionResponse {
    /// One message per violated rule, ordered by field path. List indices
    /// compare numerically, so `items[2]` comes before `items[10]`.
    pub fn from_errors(errors: &ValidationErrors) -> Self {
        let mut entries = Vec::new();
        collect(errors, &[], &mut entries);
        // Stable sort keeps the rule order within a field.
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            status_code: VALIDATION_STATUS_CODE,
            message: ValidationMessage::List(
                entries
                    .into_iter()
                    .map(|(path, message)| format!("{}: {message}", render_path(&path)))
                    .collect(),
            ),
            error: VALIDATION_ERROR_LABEL.to_string(),
        }
    }

    /// A failure that cannot be attributed to individual fields.
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            status_code: VALIDATION_STATUS_CODE,
            message: ValidationMessage::Single(message.into()),
            error: VALIDATION_ERROR_LABEL.to_string(),
        }
    }
}

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    Field(String),
    Index(usize),
}

fn render_path(path: &[Segment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            Segment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Segment::Index(index) => out.push_str(&format!("[{index}]")),
        }
    }
    out
}

fn collect(errors: &ValidationErrors, prefix: &[Segment], out: &mut Vec<(Vec<Segment>, String)>) {
    for (field, kind) in errors.errors() {
        let mut path = prefix.to_vec();
        path.push(Segment::Field(field.to_string()));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = match &err.message {
                        Some(message) => message.to_string(),
                        None => format!("failed '{}' rule", err.code),
                    };
                    out.push((path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let mut item_path = path.clone();
                    item_path.push(Segment::Index(*index));
                    collect(nested, &item_path, out);
                }
            }
        }
    }
}
