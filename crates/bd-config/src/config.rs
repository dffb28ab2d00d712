use crate::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR,
    DirectoryConfig, LoggingConfig, PersistenceConfig, RetryConfig, SessionConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub directory: DirectoryConfig,
    pub retry: RetryConfig,
    pub session: SessionConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for BD_CONFIG_DIR env var, else use ./.bd/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply BD_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: BD_CONFIG_DIR env var > ./.bd/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.directory.validate()?;
        self.retry.validate()?;
        self.persistence.validate()?;

        if let Some(user_id) = &self.session.user_id
            && user_id.trim().is_empty()
        {
            return Err(ConfigError::config("session.user_id cannot be blank"));
        }

        Ok(())
    }

    /// Absolute path of the persisted context pointer file.
    pub fn pointer_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.persistence.path))
    }

    /// Absolute path of the file holding the credential adopted by the last switch.
    pub fn session_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.persistence.session_path))
    }

    /// Log configuration summary (NEVER logs the session credential).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  directory: {} (timeout {}s)",
            self.directory.base_url, self.directory.request_timeout_secs
        );
        info!(
            "  retry: attempts={}, initial={}ms, max={}s, backoff={}x, jitter={}",
            self.retry.max_attempts,
            self.retry.initial_delay_ms,
            self.retry.max_delay_secs,
            self.retry.backoff_multiplier,
            self.retry.jitter
        );
        info!(
            "  session: user={}, credential={}",
            self.session.user_id.as_deref().unwrap_or("<none>"),
            if self.session.credential.is_some() {
                "present"
            } else {
                "absent"
            }
        );
        info!(
            "  persistence: {} ({}, {})",
            if self.persistence.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.persistence.path,
            self.persistence.session_path
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Directory
        Self::apply_env_string("BD_DIRECTORY_BASE_URL", &mut self.directory.base_url);
        Self::apply_env_parse(
            "BD_DIRECTORY_REQUEST_TIMEOUT_SECS",
            &mut self.directory.request_timeout_secs,
        );

        // Retry
        Self::apply_env_parse("BD_RETRY_MAX_ATTEMPTS", &mut self.retry.max_attempts);
        Self::apply_env_parse(
            "BD_RETRY_INITIAL_DELAY_MS",
            &mut self.retry.initial_delay_ms,
        );
        Self::apply_env_parse("BD_RETRY_MAX_DELAY_SECS", &mut self.retry.max_delay_secs);
        Self::apply_env_parse(
            "BD_RETRY_BACKOFF_MULTIPLIER",
            &mut self.retry.backoff_multiplier,
        );
        Self::apply_env_bool("BD_RETRY_JITTER", &mut self.retry.jitter);

        // Session
        Self::apply_env_option_string("BD_SESSION_USER_ID", &mut self.session.user_id);
        Self::apply_env_option_string("BD_SESSION_DISPLAY_NAME", &mut self.session.display_name);
        Self::apply_env_option_string("BD_SESSION_EMAIL", &mut self.session.email);
        Self::apply_env_option_string("BD_SESSION_CREDENTIAL", &mut self.session.credential);

        // Persistence
        Self::apply_env_bool("BD_PERSISTENCE_ENABLED", &mut self.persistence.enabled);
        Self::apply_env_string("BD_PERSISTENCE_PATH", &mut self.persistence.path);
        Self::apply_env_string(
            "BD_PERSISTENCE_SESSION_PATH",
            &mut self.persistence.session_path,
        );

        // Logging
        Self::apply_env_parse("BD_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("BD_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("BD_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
