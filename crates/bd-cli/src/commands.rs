use crate::error::Result as CliResult;

use bd_context::{ContextNotice, SwitchOutcome, TenancyContext, TenancyContextStore};

use clap::Subcommand;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the active organization, workspace and permissions
    Status,

    /// List the organizations the user belongs to
    Orgs,

    /// List the workspaces of the active organization
    Workspaces {
        /// Re-fetch the list and re-check the selected workspace
        #[arg(long)]
        refresh: bool,
    },

    /// Make another organization active
    SwitchOrg {
        /// Organization ID
        id: String,
    },

    /// Make another workspace of the active organization active
    SwitchWorkspace {
        /// Workspace ID
        id: String,
    },

    /// Check a permission key against the active context
    Can {
        /// Permission key, e.g. "chatbot:create"
        permission: String,
    },

    /// Clear the active context and the saved selection
    Logout,
}

#[derive(Serialize)]
struct NoticeReport {
    message: String,
    #[serde(flatten)]
    detail: ContextNotice,
}

#[derive(Serialize)]
struct ContextReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<SwitchOutcome>,
    #[serde(flatten)]
    context: TenancyContext,
    notice: Option<NoticeReport>,
}

pub(crate) async fn execute(command: &Commands, store: &TenancyContextStore) -> CliResult<Value> {
    match command {
        Commands::Status => context_report(store, None).await,
        Commands::Orgs => {
            let context = store.context().await;
            Ok(json!({
                "current": context.current_organization().map(|organization| &organization.id),
                "organizations": context.organizations(),
            }))
        }
        Commands::Workspaces { refresh } => {
            if *refresh {
                store.refresh_workspaces().await?;
            }
            let context = store.context().await;
            Ok(json!({
                "organization": context.current_organization().map(|organization| &organization.id),
                "current": context.current_workspace().map(|workspace| &workspace.id),
                "workspaces": context.workspaces(),
            }))
        }
        Commands::SwitchOrg { id } => {
            let outcome = store.switch_organization(id).await?;
            context_report(store, Some(outcome)).await
        }
        Commands::SwitchWorkspace { id } => {
            let outcome = store.switch_workspace(id).await?;
            context_report(store, Some(outcome)).await
        }
        Commands::Can { permission } => Ok(json!({
            "permission": permission,
            "granted": store.has_permission(permission).await,
        })),
        Commands::Logout => {
            store.teardown().await;
            context_report(store, None).await
        }
    }
}

async fn context_report(
    store: &TenancyContextStore,
    outcome: Option<SwitchOutcome>,
) -> CliResult<Value> {
    let report = ContextReport {
        outcome,
        context: store.context().await,
        notice: store.take_notice().await.map(|notice| NoticeReport {
            message: notice.to_string(),
            detail: notice,
        }),
    };
    Ok(serde_json::to_value(report)?)
}
