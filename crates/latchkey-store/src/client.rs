//! Store client contract
//!
//! A `StoreClient` exposes the single-key primitives the rest of the
//! workspace builds on. Implementations must provide linearizable,
//! per-key semantics; no multi-key transaction is ever required.

use std::time::Duration;

use async_trait::async_trait;

use latchkey_common::StoreError;

/// Atomic single-key operations over a shared store.
///
/// Every mutual-exclusion guarantee the lock offers rests on the atomicity
/// of [`set_if_absent`](StoreClient::set_if_absent) and
/// [`get_and_set`](StoreClient::get_and_set) as implemented here. Failures
/// are reported once and not retried.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Atomically set `key` to `value` only if the key is absent.
    ///
    /// Returns `true` iff the value was written.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// Read the current value under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Atomically replace the value under `key`, returning the prior value.
    ///
    /// The key is created if absent (returning `None`). Stale-lock reclaim
    /// decides ownership races on the value returned here, so this must be
    /// a single atomic step on the backing store; a read-then-write
    /// emulation forfeits reclaim exclusivity.
    async fn get_and_set(&self, key: &str, value: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key` unconditionally.
    ///
    /// Returns `true` iff a key was removed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Attach a time-to-live to an existing key.
    ///
    /// Returns `false` if the key is absent. Not used by the lock protocol,
    /// which encodes its deadline in the stored value instead.
    async fn set_expiry(&self, key: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Remaining time-to-live under `key`.
    ///
    /// `None` if the key is absent or carries no expiry.
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError>;
}
