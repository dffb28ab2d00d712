//! bd - tenancy context CLI
//!
//! Resolves the signed-in user's organization and workspace against the
//! directory service and prints the result as JSON.
//!
//! # Examples
//!
//! ```bash
//! # Show the active context
//! bd status --user-id u1 --pretty
//!
//! # Switch organization, then check a permission
//! bd switch-org org_team --user-id u1
//! bd can chatbot:create --user-id u1
//! ```

mod cli;
mod commands;
mod error;
mod logger;
mod session;

#[cfg(test)]
mod tests;

use crate::{
    cli::Cli,
    error::{CliError, Result as CliResult},
    session::{CredentialFile, PersistingSwitcher},
};

use bd_client::Client;
use bd_config::Config;
use bd_context::{
    ContextPointerStore, FilePointerStore, NoopPointerStore, RetryPolicy, TenancyContextStore,
};
use bd_core::User;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::info;
use serde_json::Value;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(&cli).await.and_then(|value| render(&value, cli.pretty));

    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.recovery_hint() {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> CliResult<Value> {
    let config = Config::load()?;
    config.validate()?;

    let log_file = match config.logging.file {
        Some(ref filename) => Some(Config::config_dir()?.join(filename)),
        None => None,
    };
    logger::initialize(config.logging.level, log_file, config.logging.colored)?;
    config.log_summary();

    let user = session_user(&config, cli.user_id.as_deref())?;
    let store = build_store(&config, cli.server.as_deref())?;

    let status = store.initialize(Some(user)).await;
    info!("Tenancy context status: {:?}", status);

    commands::execute(&cli.command, &store).await
}

pub(crate) fn render(value: &Value, pretty: bool) -> CliResult<String> {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    Ok(output?)
}

/// The flag wins over config; display name and email always come from config.
pub(crate) fn session_user(config: &Config, user_id: Option<&str>) -> CliResult<User> {
    let id = user_id
        .map(String::from)
        .or_else(|| config.session.user_id.clone())
        .filter(|id| !id.trim().is_empty())
        .ok_or(CliError::MissingUser)?;

    Ok(User {
        id,
        name: config.session.display_name.clone(),
        email: config.session.email.clone(),
    })
}

/// The credential saved by an earlier switch takes over from the configured
/// sign-in credential; the store drops it again if it no longer fits.
pub(crate) fn build_store(config: &Config, server: Option<&str>) -> CliResult<TenancyContextStore> {
    let base_url = server.unwrap_or(&config.directory.base_url);
    let timeout = config.directory.request_timeout();

    let client = Arc::new(Client::with_timeout(
        base_url,
        config.session.credential.as_deref(),
        timeout,
    )?);

    let (pointers, session): (Arc<dyn ContextPointerStore>, _) = if config.persistence.enabled {
        (
            Arc::new(FilePointerStore::new(config.pointer_path()?)),
            Some(CredentialFile::new(config.session_path()?)),
        )
    } else {
        (Arc::new(NoopPointerStore), None)
    };

    let resumed = match &session {
        Some(file) => file.load()?,
        None => None,
    };

    let switcher = Arc::new(PersistingSwitcher::new(client.clone(), session));
    Ok(TenancyContextStore::new(
        client,
        switcher,
        pointers,
        RetryPolicy::new(&config.retry, timeout),
    )
    .with_credential(resumed))
}
