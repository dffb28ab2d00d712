use crate::pointer::{ContextPointerStore, PersistedContext, PointerError, PointerResult};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Pointer store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryPointerStore {
    pointer: Mutex<Option<PersistedContext>>,
    fail_writes: AtomicBool,
}

impl MemoryPointerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pointer(organization_id: &str, workspace_id: Option<&str>) -> Self {
        Self {
            pointer: Mutex::new(Some(PersistedContext::new(organization_id, workspace_id))),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent save and clear fail, as a full disk would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn current(&self) -> Option<PersistedContext> {
        self.pointer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_writable(&self) -> PointerResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PointerError::unavailable("writes disabled"));
        }
        Ok(())
    }
}

impl ContextPointerStore for MemoryPointerStore {
    fn load(&self) -> PointerResult<Option<PersistedContext>> {
        Ok(self.current())
    }

    fn save(&self, organization_id: &str, workspace_id: Option<&str>) -> PointerResult<()> {
        self.check_writable()?;
        *self.pointer.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(PersistedContext::new(organization_id, workspace_id));
        Ok(())
    }

    fn clear(&self) -> PointerResult<()> {
        self.check_writable()?;
        *self.pointer.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Pointer store used when persistence is disabled. Forgets everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPointerStore;

impl ContextPointerStore for NoopPointerStore {
    fn load(&self) -> PointerResult<Option<PersistedContext>> {
        Ok(None)
    }

    fn save(&self, _organization_id: &str, _workspace_id: Option<&str>) -> PointerResult<()> {
        Ok(())
    }

    fn clear(&self) -> PointerResult<()> {
        Ok(())
    }
}
