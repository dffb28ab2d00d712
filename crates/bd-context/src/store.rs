use crate::context::{ContextNotice, ContextStatus, TenancyContext};
use crate::pointer::{ContextPointerStore, PersistedContext};
use crate::resolve::{select_organization, select_workspace};
use crate::{ContextError, ContextResult, RetryPolicy};

use bd_core::{
    ContextSwitcher, Organization, SessionCredential, TenantDirectory, User, Workspace,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::RwLock;

/// Result of a switch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchOutcome {
    /// The new selection is now active.
    Applied,
    /// A newer request started before this one finished; nothing was applied.
    Superseded,
}

#[derive(Debug, Default)]
struct StoreState {
    context: TenancyContext,
    credential: Option<SessionCredential>,
    notice: Option<ContextNotice>,
    persisted: Option<PersistedContext>,
}

/// A selection computed without holding the state lock.
struct Resolution {
    organization: Organization,
    workspaces: Vec<Workspace>,
    workspace: Option<Workspace>,
    credential: Option<SessionCredential>,
    notice: Option<ContextNotice>,
}

/// Owns the active organization/workspace pair for one signed-in session.
///
/// Every mutating operation takes a ticket from a generation counter before
/// its first network call. Results are committed only if no newer operation
/// has taken a ticket since, so the last request always wins.
pub struct TenancyContextStore {
    directory: Arc<dyn TenantDirectory>,
    switcher: Arc<dyn ContextSwitcher>,
    pointers: Arc<dyn ContextPointerStore>,
    retry: RetryPolicy,
    state: RwLock<StoreState>,
    generation: AtomicU64,
}

impl TenancyContextStore {
    pub fn new(
        directory: Arc<dyn TenantDirectory>,
        switcher: Arc<dyn ContextSwitcher>,
        pointers: Arc<dyn ContextPointerStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            directory,
            switcher,
            pointers,
            retry,
            state: RwLock::new(StoreState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Resume with a credential issued before this store existed.
    ///
    /// The next `initialize` keeps it only if it names the selected pair.
    pub fn with_credential(mut self, credential: Option<SessionCredential>) -> Self {
        if let Some(credential) = credential {
            info!(
                "Resuming session credential for organization {}",
                credential.organization_id
            );
            self.switcher.adopt_credential(Some(&credential));
            self.state.get_mut().credential = Some(credential);
        }
        self
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load organizations and workspaces for `user` and select a pair.
    ///
    /// Never fails: a degraded outcome is reported through the returned
    /// status. Passing `None` clears the context.
    pub async fn initialize(&self, user: Option<User>) -> ContextStatus {
        let Some(user) = user else {
            warn!("Initialize called without a signed-in user; clearing tenancy context");
            self.teardown().await;
            return ContextStatus::Empty;
        };

        let ticket = self.begin();
        info!("Initializing tenancy context for user {}", user.id);

        let persisted = self.load_pointer();
        let result = self.resolve_initial(&user, persisted.as_ref()).await;

        let mut state = self.state.write().await;
        if !self.is_current(ticket) {
            debug!("Initialize for user {} superseded by a newer request", user.id);
            return state.context.status().clone();
        }

        let previous = std::mem::take(&mut state.context);
        let user_changed = previous
            .user()
            .is_some_and(|previous_user| previous_user.id != user.id);
        state.notice = None;
        state.persisted = persisted.clone();

        match result {
            Ok(Some((organizations, resolution))) => {
                state.context = TenancyContext::for_user(user);
                state.context.set_organizations(organizations);
                self.commit(&mut state, resolution);
            }
            Ok(None) => {
                info!("User {} belongs to no organization", user.id);
                state.context = TenancyContext::for_user(user);
                state.context.set_status(ContextStatus::NoAccess);
            }
            Err(e) => {
                warn!("Tenancy context degraded: {e} ({})", e.recovery_hint());
                state.context = degraded_context(previous, user, persisted.as_ref());
            }
        }

        // Initialize never exchanges; a held credential survives only while it
        // still names the selected pair.
        let credential_outdated = state
            .credential
            .as_ref()
            .is_some_and(|credential| !scoped_to_selection(credential, &state.context));
        if user_changed || credential_outdated {
            state.credential = None;
            self.switcher.adopt_credential(None);
        }

        state.context.status().clone()
    }

    /// Clear everything, including the persisted pointer. Safe to repeat.
    ///
    /// Any operation still in flight is superseded.
    pub async fn teardown(&self) {
        let mut state = self.state.write().await;
        self.begin();
        *state = StoreState::default();
        self.switcher.adopt_credential(None);

        if let Err(e) = self.pointers.clear() {
            warn!("Failed to clear context pointer: {e} ({})", e.recovery_hint());
        }
        info!("Tenancy context cleared");
    }

    // =========================================================================
    // Switching
    // =========================================================================

    /// Make `organization_id` active, with its best available workspace.
    pub async fn switch_organization(&self, organization_id: &str) -> ContextResult<SwitchOutcome> {
        let (ticket, organizations, organization, persisted_workspace) = {
            let state = self.state.read().await;
            let Some(organization) = state.context.organization(organization_id).cloned() else {
                return Err(ContextError::access_denied(
                    "organization",
                    organization_id,
                    "not in the user's organization list",
                ));
            };
            (
                self.begin(),
                state.context.organizations().to_vec(),
                organization,
                state
                    .persisted
                    .as_ref()
                    .and_then(|pointer| pointer.workspace_id.clone()),
            )
        };

        info!("Switching to organization {organization_id}");
        let result = self
            .resolve_organization_switch(&organizations, organization, persisted_workspace.as_deref())
            .await;
        self.finish(ticket, "organization", organization_id, result)
            .await
    }

    /// Make `workspace_id` active within the current organization.
    pub async fn switch_workspace(&self, workspace_id: &str) -> ContextResult<SwitchOutcome> {
        let (ticket, organization, workspaces, requested) = {
            let state = self.state.read().await;
            let Some(organization) = state.context.current_organization().cloned() else {
                return Err(ContextError::access_denied(
                    "workspace",
                    workspace_id,
                    "no organization is selected",
                ));
            };
            let Some(requested) = state
                .context
                .workspace(workspace_id)
                .filter(|workspace| workspace.belongs_to(&organization.id))
                .cloned()
            else {
                return Err(ContextError::access_denied(
                    "workspace",
                    workspace_id,
                    format!("not a workspace of organization '{}'", organization.id),
                ));
            };
            (
                self.begin(),
                organization,
                state.context.workspaces().to_vec(),
                requested,
            )
        };

        info!("Switching to workspace {workspace_id}");
        let result = self
            .resolve_workspace_switch(organization, workspaces, requested)
            .await;
        self.finish(ticket, "workspace", workspace_id, result).await
    }

    /// Re-fetch the current organization's workspaces.
    ///
    /// Keeps the selected workspace if it is still listed; otherwise falls
    /// back to the default or first workspace and leaves a notice.
    pub async fn refresh_workspaces(&self) -> ContextResult<SwitchOutcome> {
        let (ticket, organization, current) = {
            let state = self.state.read().await;
            let Some(organization) = state.context.current_organization().cloned() else {
                return Err(ContextError::no_active_context());
            };
            (
                self.begin(),
                organization,
                state.context.current_workspace().cloned(),
            )
        };

        let organization_id = organization.id.clone();
        let result = self.resolve_refresh(organization, current).await;
        self.finish(ticket, "organization", &organization_id, result)
            .await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn context(&self) -> TenancyContext {
        self.state.read().await.context.clone()
    }

    pub async fn current_organization(&self) -> Option<Organization> {
        self.state.read().await.context.current_organization().cloned()
    }

    pub async fn current_workspace(&self) -> Option<Workspace> {
        self.state.read().await.context.current_workspace().cloned()
    }

    pub async fn organizations(&self) -> Vec<Organization> {
        self.state.read().await.context.organizations().to_vec()
    }

    pub async fn workspaces(&self) -> Vec<Workspace> {
        self.state.read().await.context.workspaces().to_vec()
    }

    /// Unknown keys are never granted.
    pub async fn has_permission(&self, key: &str) -> bool {
        self.state.read().await.context.has_permission(key)
    }

    pub async fn status(&self) -> ContextStatus {
        self.state.read().await.context.status().clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.context.user().cloned()
    }

    /// Credential issued by the most recent applied switch.
    pub async fn credential(&self) -> Option<SessionCredential> {
        self.state.read().await.credential.clone()
    }

    /// The pending reassignment notice, if any. Returned once.
    pub async fn take_notice(&self) -> Option<ContextNotice> {
        self.state.write().await.notice.take()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    fn load_pointer(&self) -> Option<PersistedContext> {
        match self.pointers.load() {
            Ok(pointer) => pointer,
            Err(e) => {
                warn!("Ignoring unreadable context pointer: {e} ({})", e.recovery_hint());
                None
            }
        }
    }

    async fn fetch_organizations(&self, user_id: &str) -> ContextResult<Vec<Organization>> {
        let directory = &self.directory;
        self.retry
            .run("list_organizations", move || directory.list_organizations(user_id))
            .await
    }

    async fn fetch_workspaces(&self, organization_id: &str) -> ContextResult<Vec<Workspace>> {
        let directory = &self.directory;
        let listed = self
            .retry
            .run("list_workspaces", move || directory.list_workspaces(organization_id))
            .await?;

        let total = listed.len();
        let workspaces: Vec<Workspace> = listed
            .into_iter()
            .filter(|workspace| workspace.belongs_to(organization_id))
            .collect();
        if workspaces.len() != total {
            warn!(
                "Dropped {} listed workspace(s) not owned by organization {}",
                total - workspaces.len(),
                organization_id
            );
        }
        Ok(workspaces)
    }

    async fn resolve_initial(
        &self,
        user: &User,
        persisted: Option<&PersistedContext>,
    ) -> ContextResult<Option<(Vec<Organization>, Resolution)>> {
        let organizations = self.fetch_organizations(&user.id).await?;

        let Some(organization) = select_organization(
            &organizations,
            persisted.map(|pointer| pointer.organization_id.as_str()),
        )
        .cloned() else {
            return Ok(None);
        };

        let workspaces = self.fetch_workspaces(&organization.id).await?;
        let workspace = select_workspace(
            &workspaces,
            &organization.id,
            persisted.and_then(|pointer| pointer.workspace_id.as_deref()),
        )
        .cloned();

        Ok(Some((
            organizations,
            Resolution {
                organization,
                workspaces,
                workspace,
                credential: None,
                notice: None,
            },
        )))
    }

    async fn resolve_organization_switch(
        &self,
        organizations: &[Organization],
        organization: Organization,
        persisted_workspace: Option<&str>,
    ) -> ContextResult<Resolution> {
        let workspaces = self.fetch_workspaces(&organization.id).await?;
        let target = select_workspace(&workspaces, &organization.id, persisted_workspace).cloned();

        let credential = {
            let switcher = &self.switcher;
            let organization_id = organization.id.as_str();
            let workspace_id = target.as_ref().map(|workspace| workspace.id.as_str());
            self.retry
                .run("switch_organization", move || {
                    switcher.switch_organization(organization_id, workspace_id)
                })
                .await?
        };

        if credential.organization_id == organization.id {
            return adopt_credential(organization, workspaces, target, credential, None);
        }

        let Some(adopted) = organizations
            .iter()
            .find(|candidate| candidate.id == credential.organization_id)
            .cloned()
        else {
            return Err(ContextError::credential_mismatch(format!(
                "credential is scoped to unknown organization '{}'",
                credential.organization_id
            )));
        };

        warn!(
            "Backend scoped credential to organization {} instead of {}",
            adopted.id, organization.id
        );
        let notice = ContextNotice::organization_reassigned(&organization.id, &adopted);
        let adopted_workspaces = self.fetch_workspaces(&adopted.id).await?;
        adopt_credential(adopted, adopted_workspaces, None, credential, Some(notice))
    }

    async fn resolve_workspace_switch(
        &self,
        organization: Organization,
        workspaces: Vec<Workspace>,
        requested: Workspace,
    ) -> ContextResult<Resolution> {
        let credential = self.exchange_workspace(&requested.id).await?;

        if credential.organization_id != organization.id {
            return Err(ContextError::credential_mismatch(format!(
                "workspace switch moved the credential to organization '{}'",
                credential.organization_id
            )));
        }

        adopt_credential(organization, workspaces, Some(requested), credential, None)
    }

    async fn resolve_refresh(
        &self,
        organization: Organization,
        current: Option<Workspace>,
    ) -> ContextResult<Resolution> {
        let workspaces = self.fetch_workspaces(&organization.id).await?;
        let current_id = current.map(|workspace| workspace.id);

        if let Some(listed) = current_id
            .as_deref()
            .and_then(|id| workspaces.iter().find(|workspace| workspace.id == id))
            .cloned()
        {
            return Ok(Resolution {
                organization,
                workspaces,
                workspace: Some(listed),
                credential: None,
                notice: None,
            });
        }

        let Some(fallback) = select_workspace(&workspaces, &organization.id, None).cloned() else {
            let notice = current_id
                .map(|id| ContextNotice::workspace_reassigned(Some(id), None));
            return Ok(Resolution {
                organization,
                workspaces,
                workspace: None,
                credential: None,
                notice,
            });
        };

        if let Some(id) = &current_id {
            warn!(
                "Workspace {id} is no longer listed; falling back to {}",
                fallback.id
            );
        }

        let credential = self.exchange_workspace(&fallback.id).await?;
        if credential.organization_id != organization.id {
            return Err(ContextError::credential_mismatch(format!(
                "workspace switch moved the credential to organization '{}'",
                credential.organization_id
            )));
        }

        let mut resolution =
            adopt_credential(organization, workspaces, Some(fallback), credential, None)?;
        if resolution.notice.is_none() && current_id.is_some() {
            resolution.notice = Some(ContextNotice::workspace_reassigned(
                current_id,
                resolution.workspace.as_ref(),
            ));
        }
        Ok(resolution)
    }

    async fn exchange_workspace(&self, workspace_id: &str) -> ContextResult<SessionCredential> {
        let switcher = &self.switcher;
        self.retry
            .run("switch_workspace", move || switcher.switch_workspace(workspace_id))
            .await
    }

    /// Commit `result` if `ticket` is still the newest; errors leave state untouched.
    async fn finish(
        &self,
        ticket: u64,
        kind: &'static str,
        id: &str,
        result: ContextResult<Resolution>,
    ) -> ContextResult<SwitchOutcome> {
        let mut state = self.state.write().await;

        if !self.is_current(ticket) {
            match &result {
                Ok(_) => debug!("Switch to {kind} {id} superseded by a newer request"),
                Err(e) => debug!("Switch to {kind} {id} superseded; dropping error: {e}"),
            }
            return Ok(SwitchOutcome::Superseded);
        }

        let resolution = result?;
        self.commit(&mut state, resolution);
        Ok(SwitchOutcome::Applied)
    }

    fn commit(&self, state: &mut StoreState, resolution: Resolution) {
        let Resolution {
            organization,
            workspaces,
            workspace,
            credential,
            notice,
        } = resolution;

        let pointer = PersistedContext::new(
            organization.id.clone(),
            workspace.as_ref().map(|workspace| workspace.id.as_str()),
        );

        info!(
            "Active context: organization {} ({:?}), workspace {}",
            organization.id,
            organization.role,
            pointer.workspace_id.as_deref().unwrap_or("<none>")
        );

        state.context.select(organization, workspaces, workspace);
        state.context.set_status(ContextStatus::Ready);
        if let Some(credential) = credential {
            self.switcher.adopt_credential(Some(&credential));
            state.credential = Some(credential);
        }
        if let Some(notice) = notice {
            warn!("{notice}");
            state.notice = Some(notice);
        }

        // A lost write only costs the selection after a restart.
        if let Err(e) = self
            .pointers
            .save(&pointer.organization_id, pointer.workspace_id.as_deref())
        {
            warn!("Failed to persist context pointer: {e} ({})", e.recovery_hint());
        }
        state.persisted = Some(pointer);
    }
}

/// The backend's answer is authoritative: adopt the workspace it scoped the
/// credential to and any roles it reports.
fn adopt_credential(
    mut organization: Organization,
    workspaces: Vec<Workspace>,
    requested: Option<Workspace>,
    credential: SessionCredential,
    notice: Option<ContextNotice>,
) -> ContextResult<Resolution> {
    let mut workspace = match credential.workspace_id.as_deref() {
        Some(id) => match workspaces.iter().find(|workspace| workspace.id == id) {
            Some(workspace) => Some(workspace.clone()),
            None => {
                return Err(ContextError::credential_mismatch(format!(
                    "credential names workspace '{id}' outside organization '{}'",
                    organization.id
                )));
            }
        },
        None => None,
    };

    let requested_id = requested.map(|workspace| workspace.id);
    let adopted_id = workspace.as_ref().map(|workspace| workspace.id.as_str());
    let notice = match notice {
        Some(notice) => Some(notice),
        None if adopted_id != requested_id.as_deref() => {
            warn!(
                "Backend scoped credential to workspace {} instead of {}",
                adopted_id.unwrap_or("<none>"),
                requested_id.as_deref().unwrap_or("<none>")
            );
            Some(ContextNotice::workspace_reassigned(
                requested_id,
                workspace.as_ref(),
            ))
        }
        None => None,
    };

    if let Some(role) = credential.organization_role {
        organization.role = role;
    }
    if let Some(role) = credential.workspace_role
        && let Some(workspace) = workspace.as_mut()
    {
        workspace.role = role;
    }

    Ok(Resolution {
        organization,
        workspaces,
        workspace,
        credential: Some(credential),
        notice,
    })
}

fn scoped_to_selection(credential: &SessionCredential, context: &TenancyContext) -> bool {
    context
        .current_organization()
        .is_some_and(|organization| organization.id == credential.organization_id)
        && context.current_workspace().map(|workspace| workspace.id.as_str())
            == credential.workspace_id.as_deref()
}

/// Fallback when the directory cannot be reached during initialize.
///
/// With a persisted pointer the store goes stale, reusing the previous
/// selection when it is the same user and organization. Otherwise nothing is
/// selected and permissions stay empty.
fn degraded_context(
    previous: TenancyContext,
    user: User,
    persisted: Option<&PersistedContext>,
) -> TenancyContext {
    let Some(pointer) = persisted else {
        let mut context = TenancyContext::for_user(user);
        context.set_status(ContextStatus::Unavailable);
        return context;
    };

    let same_user = previous
        .user()
        .is_some_and(|previous_user| previous_user.id == user.id);
    let same_organization = previous
        .current_organization()
        .is_some_and(|organization| organization.id == pointer.organization_id);

    let mut context = if same_user && same_organization {
        previous
    } else {
        TenancyContext::for_user(user)
    };
    context.set_status(ContextStatus::Stale {
        organization_id: pointer.organization_id.clone(),
        workspace_id: pointer.workspace_id.clone(),
    });
    context
}
