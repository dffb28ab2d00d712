use crate::{ClientError, ClientResult};

use bd_core::{
    ContextSwitcher, DirectoryResult, Organization, SessionCredential, TenantDirectory, Workspace,
};

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client as ReqwestClient, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize)]
struct OrganizationsResponse {
    organizations: Vec<Organization>,
}

#[derive(Deserialize)]
struct WorkspacesResponse {
    workspaces: Vec<Workspace>,
}

/// HTTP client for the tenant directory and context-switch API.
///
/// Holds the bearer credential from sign-in and, once the tenancy store
/// commits a switch, the credential it adopted. Switch calls never replace
/// the credential on their own.
pub struct Client {
    pub base_url: String,
    sign_in: Option<String>,
    credential: RwLock<Option<String>>,
    client: ReqwestClient,
}

impl Client {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Server URL (e.g., "http://127.0.0.1:8000")
    /// * `credential` - Optional bearer credential from the sign-in flow
    pub fn new(base_url: &str, credential: Option<&str>) -> Self {
        Self::with_client(base_url, credential, ReqwestClient::new())
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: &str,
        credential: Option<&str>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, credential, client))
    }

    fn with_client(base_url: &str, credential: Option<&str>, client: ReqwestClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sign_in: credential.map(String::from),
            credential: RwLock::new(credential.map(String::from)),
            client,
        }
    }

    /// The bearer credential sent with every request, if any.
    pub fn credential(&self) -> Option<String> {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Send `credential` from now on; `None` goes back to the sign-in credential.
    pub fn adopt_credential(&self, credential: Option<&SessionCredential>) {
        let token = match credential {
            Some(credential) => Some(credential.token.clone()),
            None => self.sign_in.clone(),
        };
        debug!(
            "Bearer credential {}",
            if credential.is_some() {
                "replaced by switch"
            } else {
                "reset to sign-in"
            }
        );
        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Build a request with the bearer credential, when held
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);

        if let Some(token) = self.credential() {
            req = req.bearer_auth(token);
        }

        req
    }

    /// Execute request, map error bodies, and decode the success body
    async fn execute<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
            let error = body.get("error");
            let code = error
                .and_then(|e| e.get("code"))
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| format!("HTTP_{}", status.as_u16()));
            let message = error
                .and_then(|e| e.get("message"))
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            return Err(ClientError::api_error(status.as_u16(), code, message));
        }

        Ok(serde_json::from_str(&text)?)
    }

    // =========================================================================
    // Directory Operations
    // =========================================================================

    /// List the organizations a user belongs to, in backend order
    pub async fn list_organizations(&self, user_id: &str) -> ClientResult<Vec<Organization>> {
        let req = self.request(
            Method::GET,
            &format!("/api/v1/users/{}/organizations", user_id),
        );
        let body: OrganizationsResponse = self.execute(req).await?;
        debug!(
            "Directory listed {} organizations for user {}",
            body.organizations.len(),
            user_id
        );
        Ok(body.organizations)
    }

    /// List the workspaces of an organization, in backend order
    pub async fn list_workspaces(&self, organization_id: &str) -> ClientResult<Vec<Workspace>> {
        let req = self.request(
            Method::GET,
            &format!("/api/v1/organizations/{}/workspaces", organization_id),
        );
        let body: WorkspacesResponse = self.execute(req).await?;
        debug!(
            "Directory listed {} workspaces for organization {}",
            body.workspaces.len(),
            organization_id
        );
        Ok(body.workspaces)
    }

    // =========================================================================
    // Context Switch Operations
    // =========================================================================

    /// Exchange the credential for one scoped to another organization
    pub async fn switch_organization(
        &self,
        organization_id: &str,
        workspace_id: Option<&str>,
    ) -> ClientResult<SessionCredential> {
        #[derive(Serialize)]
        struct SwitchOrganizationRequest<'a> {
            organization_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            workspace_id: Option<&'a str>,
        }

        let body = SwitchOrganizationRequest {
            organization_id,
            workspace_id,
        };
        let req = self
            .request(Method::POST, "/api/v1/context/switch-organization")
            .json(&body);
        self.execute(req).await
    }

    /// Exchange the credential for one scoped to another workspace
    pub async fn switch_workspace(&self, workspace_id: &str) -> ClientResult<SessionCredential> {
        #[derive(Serialize)]
        struct SwitchWorkspaceRequest<'a> {
            workspace_id: &'a str,
        }

        let req = self
            .request(Method::POST, "/api/v1/context/switch-workspace")
            .json(&SwitchWorkspaceRequest { workspace_id });
        self.execute(req).await
    }
}

#[async_trait]
impl TenantDirectory for Client {
    async fn list_organizations(&self, user_id: &str) -> DirectoryResult<Vec<Organization>> {
        Ok(Client::list_organizations(self, user_id).await?)
    }

    async fn list_workspaces(&self, organization_id: &str) -> DirectoryResult<Vec<Workspace>> {
        Ok(Client::list_workspaces(self, organization_id).await?)
    }
}

#[async_trait]
impl ContextSwitcher for Client {
    async fn switch_organization(
        &self,
        organization_id: &str,
        workspace_id: Option<&str>,
    ) -> DirectoryResult<SessionCredential> {
        Ok(Client::switch_organization(self, organization_id, workspace_id).await?)
    }

    async fn switch_workspace(&self, workspace_id: &str) -> DirectoryResult<SessionCredential> {
        Ok(Client::switch_workspace(self, workspace_id).await?)
    }

    fn adopt_credential(&self, credential: Option<&SessionCredential>) {
        Client::adopt_credential(self, credential);
    }
}
