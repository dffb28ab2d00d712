use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] bd_config::ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] bd_client::ClientError),

    #[error("{0}")]
    Context(#[from] bd_context::ContextError),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session file error at {path:?}: {source}")]
    Session {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("No user id: pass --user-id or set session.user_id in config.toml")]
    MissingUser,
}

impl CliError {
    pub fn session(path: &Path, source: std::io::Error) -> Self {
        Self::Session {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            Self::Context(e) => Some(e.recovery_hint()),
            Self::Session { .. } => {
                Some("Check permissions on the config directory, or run `bd logout` to reset")
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
