use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid organization role: {value} {location}")]
    InvalidOrganizationRole {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid workspace role: {value} {location}")]
    InvalidWorkspaceRole {
        value: String,
        location: ErrorLocation,
    },

    #[error("Unknown permission key: {value} {location}")]
    UnknownPermission {
        value: String,
        location: ErrorLocation,
    },
}

pub type Result<T> = StdResult<T, CoreError>;
