//! In-memory directory and switcher for store tests.

use crate::{ContextPointerStore, RetryPolicy, TenancyContextStore};

use bd_core::{
    ContextSwitcher, DirectoryError, DirectoryResult, Organization, OrganizationRole,
    SessionCredential, TenantDirectory, User, Workspace, WorkspaceRole,
};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

#[derive(Default)]
pub(crate) struct FakeDirectory {
    organizations: Mutex<Vec<Organization>>,
    workspaces: Mutex<HashMap<String, Vec<Workspace>>>,
    unavailable: AtomicBool,
    transient_failures: AtomicU32,
    organization_calls: AtomicU32,
    switch_calls: AtomicU32,
    workspace_calls: Mutex<HashMap<String, u32>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    next_credential: Mutex<Option<SessionCredential>>,
    adopted: Mutex<Option<SessionCredential>>,
}

impl FakeDirectory {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn add_organization(&self, organization: Organization, workspaces: Vec<Workspace>) {
        self.workspaces
            .lock()
            .unwrap()
            .insert(organization.id.clone(), workspaces);
        self.organizations.lock().unwrap().push(organization);
    }

    pub(crate) fn remove_organization(&self, organization_id: &str) {
        self.organizations
            .lock()
            .unwrap()
            .retain(|organization| organization.id != organization_id);
        self.workspaces.lock().unwrap().remove(organization_id);
    }

    pub(crate) fn set_workspaces(&self, organization_id: &str, workspaces: Vec<Workspace>) {
        self.workspaces
            .lock()
            .unwrap()
            .insert(organization_id.to_string(), workspaces);
    }

    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// The next `count` calls fail with a transient error.
    pub(crate) fn fail_next(&self, count: u32) {
        self.transient_failures.store(count, Ordering::SeqCst);
    }

    /// Answer the next switch with this credential instead of echoing the request.
    pub(crate) fn respond_with(&self, credential: SessionCredential) {
        *self.next_credential.lock().unwrap() = Some(credential);
    }

    /// Block `list_workspaces` for this organization until a permit is added.
    pub(crate) fn gate(&self, organization_id: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .unwrap()
            .insert(organization_id.to_string(), gate.clone());
        gate
    }

    pub(crate) fn organization_calls(&self) -> u32 {
        self.organization_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn workspace_calls(&self, organization_id: &str) -> u32 {
        self.workspace_calls
            .lock()
            .unwrap()
            .get(organization_id)
            .copied()
            .unwrap_or(0)
    }

    /// Token the switcher would send on its next request.
    pub(crate) fn adopted_token(&self) -> Option<String> {
        self.adopted
            .lock()
            .unwrap()
            .as_ref()
            .map(|credential| credential.token.clone())
    }

    pub(crate) fn switch_calls(&self) -> u32 {
        self.switch_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> DirectoryResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DirectoryError::unavailable("directory offline"));
        }
        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures
                .store(remaining - 1, Ordering::SeqCst);
            return Err(DirectoryError::unavailable("flaky directory"));
        }
        Ok(())
    }

    fn owner_of(&self, workspace_id: &str) -> Option<String> {
        self.workspaces
            .lock()
            .unwrap()
            .iter()
            .find(|(_, workspaces)| workspaces.iter().any(|w| w.id == workspace_id))
            .map(|(organization_id, _)| organization_id.clone())
    }
}

#[async_trait]
impl TenantDirectory for FakeDirectory {
    async fn list_organizations(&self, _user_id: &str) -> DirectoryResult<Vec<Organization>> {
        self.organization_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.organizations.lock().unwrap().clone())
    }

    async fn list_workspaces(&self, organization_id: &str) -> DirectoryResult<Vec<Workspace>> {
        *self
            .workspace_calls
            .lock()
            .unwrap()
            .entry(organization_id.to_string())
            .or_default() += 1;

        let gate = self.gates.lock().unwrap().get(organization_id).cloned();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|_| DirectoryError::unavailable("gate closed"))?
                .forget();
        }

        self.check_available()?;
        self.workspaces
            .lock()
            .unwrap()
            .get(organization_id)
            .cloned()
            .ok_or_else(|| DirectoryError::denied(format!("no organization {organization_id}")))
    }
}

#[async_trait]
impl ContextSwitcher for FakeDirectory {
    async fn switch_organization(
        &self,
        organization_id: &str,
        workspace_id: Option<&str>,
    ) -> DirectoryResult<SessionCredential> {
        self.switch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        if let Some(credential) = self.next_credential.lock().unwrap().take() {
            return Ok(credential);
        }
        if !self
            .organizations
            .lock()
            .unwrap()
            .iter()
            .any(|organization| organization.id == organization_id)
        {
            return Err(DirectoryError::denied("not a member"));
        }
        Ok(credential(organization_id, workspace_id))
    }

    async fn switch_workspace(&self, workspace_id: &str) -> DirectoryResult<SessionCredential> {
        self.switch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        if let Some(credential) = self.next_credential.lock().unwrap().take() {
            return Ok(credential);
        }
        match self.owner_of(workspace_id) {
            Some(organization_id) => Ok(credential(&organization_id, Some(workspace_id))),
            None => Err(DirectoryError::denied("unknown workspace")),
        }
    }

    fn adopt_credential(&self, credential: Option<&SessionCredential>) {
        *self.adopted.lock().unwrap() = credential.cloned();
    }
}

pub(crate) fn credential(organization_id: &str, workspace_id: Option<&str>) -> SessionCredential {
    SessionCredential {
        token: format!("token-{organization_id}-{}", workspace_id.unwrap_or("none")),
        organization_id: organization_id.to_string(),
        workspace_id: workspace_id.map(String::from),
        organization_role: None,
        workspace_role: None,
    }
}

pub(crate) fn user() -> User {
    User::new("u1")
}

/// `p` (default, owner) with `p-main`; `t` (admin) with `t-a` and default `t-b`;
/// `m` (member) with `m-x`.
pub(crate) fn standard_directory() -> Arc<FakeDirectory> {
    let directory = FakeDirectory::new();
    directory.add_organization(
        Organization::new("p", "Personal", OrganizationRole::Owner).as_default(),
        vec![Workspace::new("p-main", "Main", "p", WorkspaceRole::Admin).as_default()],
    );
    directory.add_organization(
        Organization::new("t", "Team", OrganizationRole::Admin),
        vec![
            Workspace::new("t-a", "Alpha", "t", WorkspaceRole::Editor),
            Workspace::new("t-b", "Beta", "t", WorkspaceRole::Viewer).as_default(),
        ],
    );
    directory.add_organization(
        Organization::new("m", "Member Org", OrganizationRole::Member),
        vec![Workspace::new("m-x", "X", "m", WorkspaceRole::Viewer)],
    );
    directory
}

pub(crate) fn store_with(
    directory: &Arc<FakeDirectory>,
    pointers: Arc<dyn ContextPointerStore>,
) -> TenancyContextStore {
    TenancyContextStore::new(
        directory.clone(),
        directory.clone(),
        pointers,
        RetryPolicy::immediate(3, Duration::from_secs(2)),
    )
}
