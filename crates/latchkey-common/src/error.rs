//! Error types for Latchkey
//!
//! This module defines:
//! - `StoreError`: failures reported by a store client
//! - `LockError`: failures surfaced by lock acquisition and release

use std::time::Duration;

/// Failures reported by a store client.
///
/// A store failure is never retried by the lock; it propagates to the
/// caller as-is. Resilience (reconnects, retries) belongs to the store
/// client implementation, not to callers.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failures surfaced by lock operations.
#[derive(thiserror::Error, Debug)]
pub enum LockError {
    /// A blocking acquisition ran past its deadline without winning the key.
    /// Carries the contended key and the timeout that was exceeded.
    #[error("timeout on lock '{key}' exceeded {timeout:?}")]
    Timeout { key: String, timeout: Duration },

    #[error(transparent)]
    Store(#[from] StoreError),
}
