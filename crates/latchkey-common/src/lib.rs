//! Latchkey Common - shared types and helpers
//!
//! This crate provides the foundational pieces used across the Latchkey
//! workspace:
//! - Error types (`StoreError`, `LockError`)
//! - Wall-clock helpers
//! - Default tuning constants

pub mod error;
pub mod time;

// Re-exports for convenience
pub use error::{LockError, StoreError};
pub use time::epoch_secs;

use std::time::Duration;

/// Default longest wait for a blocking lock acquisition
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default delay between lock acquisition attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
