//! Carries the credential issued by a switch across `bd` invocations.

use crate::error::{CliError, Result as CliResult};

use bd_client::Client;
use bd_core::{ContextSwitcher, DirectoryResult, SessionCredential};

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: i32 = 1;
#[cfg(unix)]
const SESSION_FILE_MODE: u32 = 0o600; // Owner read/write only

#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(flatten)]
    credential: SessionCredential,
    saved_at: String,
    schema_version: i32,
}

/// JSON file holding the most recently adopted session credential.
#[derive(Debug, Clone)]
pub(crate) struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// An unreadable file is ignored so the sign-in credential still applies.
    pub(crate) fn load(&self) -> CliResult<Option<SessionCredential>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CliError::session(&self.path, e)),
        };

        match serde_json::from_str::<StoredSession>(&contents) {
            Ok(stored) => {
                debug!(
                    "Loaded session credential for organization {} (saved {})",
                    stored.credential.organization_id, stored.saved_at
                );
                Ok(Some(stored.credential))
            }
            Err(e) => {
                warn!("Ignoring unreadable session file {:?}: {e}", self.path);
                Ok(None)
            }
        }
    }

    /// Temp file, fsync, then rename over the old session.
    pub(crate) fn save(&self, credential: &SessionCredential) -> CliResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| CliError::session(&dir, e))?;

        let temp_path = self.path.with_extension(format!("tmp.{}", std::process::id()));
        let stored = StoredSession {
            credential: credential.clone(),
            saved_at: chrono::Utc::now().to_rfc3339(),
            schema_version: SCHEMA_VERSION,
        };
        let json = serde_json::to_string_pretty(&stored)?;

        {
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            options.mode(SESSION_FILE_MODE);

            let mut file = options
                .open(&temp_path)
                .map_err(|e| CliError::session(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| CliError::session(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| CliError::session(&temp_path, e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CliError::session(&self.path, e)
        })?;

        debug!(
            "Saved session credential for organization {}",
            credential.organization_id
        );
        Ok(())
    }

    pub(crate) fn clear(&self) -> CliResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared session credential at {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CliError::session(&self.path, e)),
        }
    }
}

/// Switches through the HTTP client and writes every credential the store
/// adopts to the session file, so the next run resumes with it.
pub(crate) struct PersistingSwitcher {
    client: Arc<Client>,
    file: Option<CredentialFile>,
}

impl PersistingSwitcher {
    pub(crate) fn new(client: Arc<Client>, file: Option<CredentialFile>) -> Self {
        Self { client, file }
    }
}

#[async_trait]
impl ContextSwitcher for PersistingSwitcher {
    async fn switch_organization(
        &self,
        organization_id: &str,
        workspace_id: Option<&str>,
    ) -> DirectoryResult<SessionCredential> {
        ContextSwitcher::switch_organization(self.client.as_ref(), organization_id, workspace_id)
            .await
    }

    async fn switch_workspace(&self, workspace_id: &str) -> DirectoryResult<SessionCredential> {
        ContextSwitcher::switch_workspace(self.client.as_ref(), workspace_id).await
    }

    fn adopt_credential(&self, credential: Option<&SessionCredential>) {
        self.client.adopt_credential(credential);

        let Some(file) = &self.file else {
            return;
        };
        let result = match credential {
            Some(credential) => file.save(credential),
            None => file.clear(),
        };
        // The in-memory credential is already switched; only the next run loses it.
        if let Err(e) = result {
            warn!("Failed to update session file {:?}: {e}", file.path());
        }
    }
}
