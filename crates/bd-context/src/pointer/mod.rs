//! Durable pointer to the last selected organization and workspace.
//!
//! Only identifiers are stored. Names, roles and permissions are always
//! re-fetched from the directory.

mod error;
mod file_store;
mod memory_store;

pub use error::{PointerError, Result as PointerResult};
pub use file_store::FilePointerStore;
pub use memory_store::{MemoryPointerStore, NoopPointerStore};

use serde::{Deserialize, Serialize};

/// The persisted identifiers, as loaded back at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedContext {
    pub organization_id: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
}

impl PersistedContext {
    pub fn new(organization_id: impl Into<String>, workspace_id: Option<&str>) -> Self {
        Self {
            organization_id: organization_id.into(),
            workspace_id: workspace_id.map(String::from),
        }
    }
}

/// Storage for the context pointer.
///
/// A missing pointer is `Ok(None)`, not an error. Implementations that find
/// unreadable contents should recover (backup, then `Ok(None)`) rather than
/// fail the load.
pub trait ContextPointerStore: Send + Sync {
    fn load(&self) -> PointerResult<Option<PersistedContext>>;

    fn save(&self, organization_id: &str, workspace_id: Option<&str>) -> PointerResult<()>;

    fn clear(&self) -> PointerResult<()>;
}
