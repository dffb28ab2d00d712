//! Tenancy context: which organization and workspace the session acts as,
//! and the permissions that follow from that pair.

pub mod context;
pub mod error;
pub mod pointer;
pub mod resolve;
pub mod retry;
pub mod store;

pub use context::{ContextNotice, ContextStatus, TenancyContext};
pub use error::{ContextError, Result as ContextResult};
pub use pointer::{
    ContextPointerStore, FilePointerStore, MemoryPointerStore, NoopPointerStore,
    PersistedContext, PointerError, PointerResult,
};
pub use retry::RetryPolicy;
pub use store::{SwitchOutcome, TenancyContextStore};

#[cfg(test)]
mod tests;
