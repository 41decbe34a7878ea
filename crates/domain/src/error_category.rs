//! Classification of failed discount validations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::discount::{Discount, DiscountStatus};

/// Why a discount code could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// No discount matches the code.
    InvalidCode,
    /// The discount exists but was switched off.
    Inactive,
    /// The discount is flagged expired or its validity window has ended.
    Expired,
    /// The usage cap has been reached.
    NoUsesLeft,
    /// The backend could not be reached or its answer could not be read.
    NetworkError,
    /// The discount exists but none of the known rules explain the rejection.
    UnknownError,
}

/// How prominently a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// User-facing copy and presentation hints for an [`ErrorCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorDisplay {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub severity: Severity,
    /// True if retrying (another code, or the same request) can succeed.
    pub recoverable: bool,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 6] = [
        ErrorCategory::InvalidCode,
        ErrorCategory::Inactive,
        ErrorCategory::Expired,
        ErrorCategory::NoUsesLeft,
        ErrorCategory::NetworkError,
        ErrorCategory::UnknownError,
    ];

    /// Classifies a rejected validation from the record the backend returned.
    ///
    /// First match wins: missing record, inactive, expired (flag or past
    /// validity end), usage exhausted, then the unknown fallback.
    pub fn classify(record: Option<&Discount>, now: DateTime<Utc>) -> Self {
        let Some(discount) = record else {
            return ErrorCategory::InvalidCode;
        };

        if discount.status == DiscountStatus::Inactive {
            ErrorCategory::Inactive
        } else if discount.status == DiscountStatus::Expired || discount.is_past_validity(now) {
            ErrorCategory::Expired
        } else if discount.is_exhausted() {
            ErrorCategory::NoUsesLeft
        } else {
            ErrorCategory::UnknownError
        }
    }

    pub fn display(&self) -> ErrorDisplay {
        match self {
            ErrorCategory::InvalidCode => ErrorDisplay {
                title: "Invalid code",
                description: "This discount code does not exist. Check the spelling and try again.",
                icon: "x-circle",
                severity: Severity::Error,
                recoverable: true,
            },
            ErrorCategory::Inactive => ErrorDisplay {
                title: "Code not active",
                description: "This discount code is currently not active.",
                icon: "pause-circle",
                severity: Severity::Warning,
                recoverable: false,
            },
            ErrorCategory::Expired => ErrorDisplay {
                title: "Code expired",
                description: "This discount code has expired and can no longer be used.",
                icon: "clock",
                severity: Severity::Warning,
                recoverable: false,
            },
            ErrorCategory::NoUsesLeft => ErrorDisplay {
                title: "Code fully redeemed",
                description: "This discount code has reached its usage limit.",
                icon: "users",
                severity: Severity::Info,
                recoverable: false,
            },
            ErrorCategory::NetworkError => ErrorDisplay {
                title: "Connection problem",
                description: "We could not check your code right now. Please try again.",
                icon: "wifi-off",
                severity: Severity::Error,
                recoverable: true,
            },
            ErrorCategory::UnknownError => ErrorDisplay {
                title: "Code not accepted",
                description: "This discount code cannot be used for this booking.",
                icon: "alert-triangle",
                severity: Severity::Error,
                recoverable: false,
            },
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.display().recoverable
    }

    /// Returns the wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidCode => "INVALID_CODE",
            ErrorCategory::Inactive => "INACTIVE",
            ErrorCategory::Expired => "EXPIRED",
            ErrorCategory::NoUsesLeft => "NO_USES_LEFT",
            ErrorCategory::NetworkError => "NETWORK_ERROR",
            ErrorCategory::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
