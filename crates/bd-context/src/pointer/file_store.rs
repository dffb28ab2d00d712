use crate::pointer::{ContextPointerStore, PersistedContext, PointerError, PointerResult};

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";
const SCHEMA_VERSION: i32 = 1;

/// On-disk shape of the pointer file.
#[derive(Debug, Serialize, Deserialize)]
struct StoredPointer {
    organization_id: String,
    #[serde(default)]
    workspace_id: Option<String>,
    saved_at: String,
    schema_version: i32,
}

/// JSON file holding the context pointer.
#[derive(Debug, Clone)]
pub struct FilePointerStore {
    path: PathBuf,
}

impl FilePointerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("context.json"))
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Moves an unreadable pointer file aside as `<name>.corrupted.<timestamp>`.
    pub fn backup_corrupted(&self) -> PointerResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let backup_path = self
            .parent_dir()
            .join(format!("{}.corrupted.{timestamp}", self.file_name()));

        fs::rename(&self.path, &backup_path).map_err(PointerError::backup_failed)?;

        warn!("Backed up corrupted context pointer to {backup_path:?}");
        Ok(Some(backup_path))
    }
}

impl ContextPointerStore for FilePointerStore {
    fn load(&self) -> PointerResult<Option<PersistedContext>> {
        if !self.path.exists() {
            debug!("No context pointer at {:?}", self.path);
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| PointerError::file_read(self.path.clone(), e))?;

        match serde_json::from_str::<StoredPointer>(&contents) {
            Ok(stored) if !stored.organization_id.trim().is_empty() => {
                info!(
                    "Loaded context pointer: org={} workspace={} (schema v{})",
                    stored.organization_id,
                    stored.workspace_id.as_deref().unwrap_or("<none>"),
                    stored.schema_version
                );
                Ok(Some(PersistedContext {
                    organization_id: stored.organization_id,
                    workspace_id: stored.workspace_id,
                }))
            }
            Ok(_) => {
                warn!("Context pointer at {:?} has no organization", self.path);
                self.backup_corrupted()?;
                Ok(None)
            }
            Err(e) => {
                warn!("Context pointer corrupted at {:?}: {e}", self.path);
                self.backup_corrupted()?;
                Ok(None)
            }
        }
    }

    /// Temp file, fsync, then rename over the old pointer.
    fn save(&self, organization_id: &str, workspace_id: Option<&str>) -> PointerResult<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| PointerError::dir_creation(dir.clone(), e))?;

        let temp_path = dir.join(format!("{}.tmp.{}", self.file_name(), std::process::id()));

        let stored = StoredPointer {
            organization_id: organization_id.to_string(),
            workspace_id: workspace_id.map(String::from),
            saved_at: chrono::Utc::now().to_rfc3339(),
            schema_version: SCHEMA_VERSION,
        };
        let json = serde_json::to_string_pretty(&stored)?;

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| PointerError::file_write(temp_path.clone(), e))?;

            file.write_all(json.as_bytes())
                .map_err(|e| PointerError::file_write(temp_path.clone(), e))?;

            file.sync_all()
                .map_err(|e| PointerError::file_write(temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            PointerError::atomic_rename(temp_path, self.path.clone(), e)
        })?;

        debug!(
            "Saved context pointer: org={} workspace={}",
            organization_id,
            workspace_id.unwrap_or("<none>")
        );
        Ok(())
    }

    fn clear(&self) -> PointerResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared context pointer at {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PointerError::file_remove(self.path.clone(), e)),
        }
    }
}
