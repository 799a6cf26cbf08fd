//! Latchkey Store - store client contract and implementations
//!
//! This crate provides:
//! - `StoreClient`: the atomic single-key primitives the lock protocol
//!   consumes
//! - `MemoryStore`: DashMap-backed implementation for tests and
//!   single-process embedding
//! - `Keyspace`: field-name-to-key addressing
//! - An optional process-wide default store handle

pub mod client;
pub mod global;
pub mod keyspace;
pub mod memory;

// Re-export commonly used types
pub use client::StoreClient;
pub use global::{global_store, set_global_store};
pub use keyspace::Keyspace;
pub use memory::MemoryStore;
