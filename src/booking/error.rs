use thiserror::Error;

use super::dates::RejectionReason;
use super::validation::FieldErrorMap;

pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingError {
    #[error("Please correct the highlighted fields")]
    Validation(FieldErrorMap),
    #[error("{0}")]
    InvalidDates(RejectionReason),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Submission(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("A booking is already being submitted")]
    AlreadySubmitting,
    #[error("Cannot {action} from the {step} step")]
    InvalidStep {
        action: &'static str,
        step: &'static str,
    },
}

impl BookingError {
    /// Text shown to the guest in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Network(_) => FALLBACK_MESSAGE.to_string(),
            BookingError::Submission(msg) | BookingError::NotFound(msg) if msg.trim().is_empty() => {
                FALLBACK_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }

    /// Errors after which the guest may press submit again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::Submission(_) | BookingError::Network(_))
    }
}

impl From<reqwest::Error> for BookingError {
    fn from(err: reqwest::Error) -> Self {
        BookingError::Network(err.to_string())
    }
}
