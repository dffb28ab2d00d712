use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_PERSISTENCE_ENABLED, DEFAULT_POINTER_FILENAME,
    DEFAULT_SESSION_FILENAME,
};

use std::path::Path;

use serde::Deserialize;

/// Where the last active (organization, workspace) pointer and the
/// credential issued for it are kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub enabled: bool,
    /// Relative to the config directory
    pub path: String,
    /// Relative to the config directory
    pub session_path: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_PERSISTENCE_ENABLED,
            path: String::from(DEFAULT_POINTER_FILENAME),
            session_path: String::from(DEFAULT_SESSION_FILENAME),
        }
    }
}

impl PersistenceConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        Self::validate_path("persistence.path", &self.path)?;
        Self::validate_path("persistence.session_path", &self.session_path)?;

        if self.path == self.session_path {
            return Err(ConfigError::persistence(
                "persistence.path and persistence.session_path must differ",
            ));
        }

        Ok(())
    }

    fn validate_path(key: &str, path: &str) -> ConfigErrorResult<()> {
        if path.is_empty() {
            return Err(ConfigError::persistence(format!("{key} cannot be empty")));
        }

        if Path::new(path).is_absolute() || path.contains("..") {
            return Err(ConfigError::persistence(format!(
                "{key} must be relative and cannot contain '..'"
            )));
        }

        Ok(())
    }
}
