//! HTTP implementation of the tenant directory and context-switch endpoints.

pub(crate) mod client;

#[cfg(test)]
mod tests;

pub use client::{Client, ClientError, ClientResult};
