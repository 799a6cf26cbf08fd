//! Distributed lock over a shared store
//!
//! A `Lock` coordinates mutual exclusion between independent processes
//! through a single key in a shared store. Acquisition polls
//! `set_if_absent`; when an expiration policy is configured, a key whose
//! marker deadline has passed can be taken over from a crashed holder with
//! one atomic `get_and_set`.
//!
//! Limitations inherited from the protocol, kept on purpose:
//! - No fencing token: the marker is the only ownership record, so a holder
//!   cannot distinguish its own still-valid lock from one re-acquired by
//!   another process after expiry.
//! - No fairness: any waiter may win any poll cycle; a specific waiter can
//!   starve under contention.
//! - The staleness read and the reclaiming `get_and_set` are two separate
//!   store operations; contenders that observe the same stale marker can
//!   each receive a stale prior value and each conclude they won. Closing
//!   that window takes a compare-and-swap or a fencing token, neither of
//!   which this protocol has.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tracing::{debug, error, warn};

use latchkey_common::{LockError, epoch_secs};
use latchkey_store::StoreClient;

use crate::config::{AcquireOptions, LockConfig};
use crate::marker::Marker;

/// One mutual-exclusion resource, identified by its store key.
#[derive(Clone)]
pub struct Lock {
    store: Arc<dyn StoreClient>,
    key: String,
    config: LockConfig,
}

impl Lock {
    /// Create a lock over `key` on an explicit store handle.
    pub fn new(store: Arc<dyn StoreClient>, key: impl Into<String>, config: LockConfig) -> Self {
        Self {
            store,
            key: key.into(),
            config,
        }
    }

    /// Create a lock on the process-wide default store, if one is installed.
    pub fn with_global(key: impl Into<String>, config: LockConfig) -> Option<Self> {
        latchkey_store::global_store().map(|store| Self::new(store, key, config))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.config.poll_interval
    }

    pub fn has_expiration(&self) -> bool {
        self.config.has_expiration()
    }

    /// The marker this lock would store on its next acquisition attempt.
    pub fn next_marker(&self) -> Marker {
        Marker::next(self.config.expiration)
    }

    /// Advisory query: does the key exist with a marker that is still
    /// current? Not atomic with respect to acquisition; the answer can be
    /// outdated by the time the caller acts on it.
    pub async fn is_held(&self) -> Result<bool, LockError> {
        match self.store.get(&self.key).await? {
            Some(raw) => Ok(Marker::parse(&raw).is_current(epoch_secs())),
            None => Ok(false),
        }
    }

    /// Delete the key regardless of who holds it.
    ///
    /// Administrative escape hatch: this breaks any critical section
    /// currently running under the lock elsewhere.
    pub async fn force_clear(&self) -> Result<(), LockError> {
        self.store.delete(&self.key).await?;
        warn!(key = %self.key, "lock forcibly cleared");
        Ok(())
    }

    /// Run `work` under the lock with the configured timeout and poll
    /// interval. See [`Lock::lock_with`].
    pub async fn lock<F, Fut, T>(&self, work: F) -> Result<Option<T>, LockError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.lock_with(AcquireOptions::default(), work).await
    }

    /// Acquire the lock, run `work`, then release.
    ///
    /// Returns `Ok(Some(value))` with the work's output. When the effective
    /// timeout is zero the single attempt either wins or returns `Ok(None)`
    /// without invoking `work`; a blocking acquisition that runs past its
    /// timeout fails with [`LockError::Timeout`].
    ///
    /// The release attempt runs on every exit path of `work`, including a
    /// panic, which is resumed afterwards unchanged. Release deletes the
    /// key unless the marker written at acquisition carries a deadline that
    /// has already passed; by then the key may hold a newer contender's
    /// marker.
    pub async fn lock_with<F, Fut, T>(
        &self,
        options: AcquireOptions,
        work: F,
    ) -> Result<Option<T>, LockError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let poll_interval = options.poll_interval.unwrap_or(self.config.poll_interval);

        let Some(marker) = self.acquire(timeout, poll_interval).await? else {
            return Ok(None);
        };

        let outcome = AssertUnwindSafe(work()).catch_unwind().await;
        let released = self.release(&marker).await;

        match outcome {
            Ok(value) => {
                released?;
                Ok(Some(value))
            }
            Err(payload) => {
                if let Err(release_err) = released {
                    error!(key = %self.key, error = %release_err, "release failed after panicking critical section");
                }
                panic::resume_unwind(payload)
            }
        }
    }

    /// Polling acquisition.
    ///
    /// `Some(marker)` on success with the marker that was written; `None`
    /// when `timeout` is zero and the single attempt lost.
    async fn acquire(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Option<Marker>, LockError> {
        let non_blocking = timeout.is_zero();
        let start = Instant::now();

        loop {
            let candidate = self.next_marker();
            if self.store.set_if_absent(&self.key, &candidate.encode()).await? {
                debug!(key = %self.key, "lock acquired");
                return Ok(Some(candidate));
            }

            if self.config.has_expiration()
                && let Some(reclaimed) = self.try_reclaim().await?
            {
                return Ok(Some(reclaimed));
            }

            if non_blocking {
                return Ok(None);
            }
            if start.elapsed() >= timeout {
                return Err(LockError::Timeout {
                    key: self.key.clone(),
                    timeout,
                });
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Take over a key whose marker deadline has passed.
    ///
    /// The value returned by the swap, not the earlier read, decides whether
    /// the takeover won. A missing prior value also wins: the swap created
    /// the key.
    async fn try_reclaim(&self) -> Result<Option<Marker>, LockError> {
        let current = match self.store.get(&self.key).await? {
            Some(raw) => Marker::parse(&raw),
            None => return Ok(None),
        };
        if !current.is_stale(epoch_secs()) {
            return Ok(None);
        }

        let replacement = self.next_marker();
        let prior = self.store.get_and_set(&self.key, &replacement.encode()).await?;
        let won = match prior {
            Some(raw) => Marker::parse(&raw).is_stale(epoch_secs()),
            None => true,
        };
        if won {
            warn!(key = %self.key, "reclaimed lock with passed deadline");
            return Ok(Some(replacement));
        }
        Ok(None)
    }

    /// Delete the key unless the acquisition marker's deadline has already
    /// passed; a later contender may own the key by then.
    async fn release(&self, marker: &Marker) -> Result<(), LockError> {
        let still_ours = match marker.deadline() {
            None => true,
            Some(deadline) => deadline > epoch_secs(),
        };
        if still_ours {
            self.store.delete(&self.key).await?;
            debug!(key = %self.key, "lock released");
        } else {
            debug!(key = %self.key, "release skipped delete, marker deadline already passed");
        }
        Ok(())
    }
}
