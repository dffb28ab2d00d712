use bd_core::DirectoryError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures surfaced by the tenancy context store.
///
/// None of these leave the context half-updated: a failed operation keeps the
/// previous selection intact.
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Access denied to {kind} '{id}': {message} {location}")]
    AccessDenied {
        kind: &'static str,
        id: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Directory unavailable during {operation} after {attempts} attempt(s): {message} {location}")]
    DirectoryUnavailable {
        operation: &'static str,
        attempts: u32,
        message: String,
        location: ErrorLocation,
    },

    #[error("Directory rejected {operation}: {source} {location}")]
    DirectoryRejected {
        operation: &'static str,
        #[source]
        source: DirectoryError,
        location: ErrorLocation,
    },

    #[error("Credential does not match the directory: {message} {location}")]
    CredentialMismatch {
        message: String,
        location: ErrorLocation,
    },

    #[error("No active organization {location}")]
    NoActiveContext { location: ErrorLocation },
}

impl ContextError {
    /// Whether the user can simply retry the same operation later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DirectoryUnavailable { .. })
    }

    /// User-facing recovery hint.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::AccessDenied { .. } => {
                "You are not a member of that organization or workspace. \
                   Pick one from the list you have access to."
            }
            Self::DirectoryUnavailable { .. } => {
                "The organization directory could not be reached. \
                   Check your connection and try again."
            }
            Self::DirectoryRejected { .. } => {
                "The server refused the request. \
                   Sign in again if the problem persists."
            }
            Self::CredentialMismatch { .. } => {
                "Your session no longer matches the available workspaces. \
                   Reload to refresh the organization list."
            }
            Self::NoActiveContext { .. } => {
                "No organization is selected yet. \
                   Sign in or choose an organization first."
            }
        }
    }

    #[track_caller]
    pub fn access_denied(kind: &'static str, id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AccessDenied {
            kind,
            id: id.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn directory_unavailable(
        operation: &'static str,
        attempts: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::DirectoryUnavailable {
            operation,
            attempts,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn directory_rejected(operation: &'static str, source: DirectoryError) -> Self {
        Self::DirectoryRejected {
            operation,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn credential_mismatch(message: impl Into<String>) -> Self {
        Self::CredentialMismatch {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn no_active_context() -> Self {
        Self::NoActiveContext {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContextError>;
