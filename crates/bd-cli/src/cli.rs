use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "bd")]
#[command(about = "Inspect and switch the active organization and workspace")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Server URL (defaults to directory.base_url from config)
    #[arg(long, global = true)]
    pub(crate) server: Option<String>,

    /// Signed-in user ID (defaults to session.user_id from config)
    #[arg(long, global = true)]
    pub(crate) user_id: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub(crate) pretty: bool,
}
