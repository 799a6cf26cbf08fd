//! Latchkey Lock - store-coordinated mutual exclusion
//!
//! This crate provides:
//! - `Lock`: one mutual-exclusion resource keyed into a shared store
//! - Polling acquisition with timeout and a non-blocking mode
//! - Staleness recovery for keys left behind by crashed holders
//! - A scoped runner that attempts release on every exit path

pub mod config;
pub mod lock;
pub mod marker;

// Re-export commonly used types
pub use config::{AcquireOptions, LockConfig};
pub use lock::Lock;
pub use marker::Marker;
