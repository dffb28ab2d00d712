use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures reported by directory and context-switch collaborators.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory unavailable: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },

    #[error("Directory denied request: {message} {location}")]
    Denied {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid directory response: {message} {location}")]
    InvalidResponse {
        message: String,
        location: ErrorLocation,
    },
}

impl DirectoryError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn denied(message: impl Into<String>) -> Self {
        Self::Denied {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
