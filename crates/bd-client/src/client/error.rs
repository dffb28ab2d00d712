use bd_core::DirectoryError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors that can occur during API calls
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error: {message} (status: {status}, code: {code}) {location}")]
    Api {
        status: u16,
        code: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON parse error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Convert reqwest error with context
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ClientError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Convert JSON error with context
    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        ClientError::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Create an API error with location
    #[track_caller]
    pub fn api_error(status: u16, code: String, message: String) -> Self {
        ClientError::Api {
            status,
            code,
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Network failures, timeouts, throttling and 5xx responses may succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { source, .. } => !source.is_builder() && !source.is_decode(),
            Self::Api { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Json { .. } => false,
        }
    }

    /// The caller is not allowed to see or reach the requested tenant.
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Api { status, .. } if matches!(status, 401 | 403 | 404))
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ClientError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ClientError::from_json(err)
    }
}

impl From<ClientError> for DirectoryError {
    #[track_caller]
    fn from(err: ClientError) -> Self {
        if err.is_transient() {
            DirectoryError::unavailable(err.to_string())
        } else if err.is_denied() {
            DirectoryError::denied(err.to_string())
        } else {
            DirectoryError::invalid_response(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
