mod config;
mod directory_config;
mod error;
mod log_level;
mod logging_config;
mod persistence_config;
mod retry_config;
mod session_config;

pub use config::Config;
pub use directory_config::DirectoryConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use persistence_config::PersistenceConfig;
pub use retry_config::RetryConfig;
pub use session_config::SessionConfig;

const CONFIG_DIR_ENV: &str = "BD_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".bd";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_POINTER_FILENAME: &str = "context.json";
const DEFAULT_SESSION_FILENAME: &str = "session.json";
const DEFAULT_PERSISTENCE_ENABLED: bool = true;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;

#[cfg(test)]
mod tests;
