//! Closed sets of status values stored as text columns.
//!
//! Each variant's text is both its database value and its JSON value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_text_status {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Return the stored text value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {} '{other}'",
                        $kind
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_text_status! {
    /// Outcome recorded for every mail-send attempt.
    SendMailStatus ("mail status") {
        Sent = "SENT",
        Failed = "FAILED",
    }
}

define_text_status! {
    /// Registration state of a user account.
    RegistrationType ("registration type") {
        /// Account row created, verification mail not yet delivered.
        NewRegister = "NEW_REGISTER",
        /// Verification mail delivered, waiting for the user to confirm.
        PendingVerify = "PENDING_VERIFY",
    }
}

define_text_status! {
    BookingStatus ("booking status") {
        Pending = "pending",
        Confirmed = "confirmed",
        Cancelled = "cancelled",
    }
}
