//! Lock configuration models

use std::time::Duration;

use serde::{Deserialize, Serialize};

use latchkey_common::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};

/// Configuration for a [`Lock`](crate::Lock).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Longest a blocking acquisition will wait; zero means try exactly once
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Delay between acquisition attempts while waiting
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// When set, stored markers carry an absolute deadline and a crashed
    /// holder's key becomes reclaimable once the deadline passes. Without
    /// it the lock never expires on its own.
    #[serde(default)]
    pub expiration: Option<Duration>,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,             // 5s
            poll_interval: DEFAULT_POLL_INTERVAL, // 100ms
            expiration: None,
        }
    }
}

impl LockConfig {
    pub fn has_expiration(&self) -> bool {
        self.expiration.is_some()
    }
}

/// Per-call overrides for one acquisition.
///
/// Unset fields fall back to the owning lock's configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AcquireOptions {
    #[serde(default)]
    pub timeout: Option<Duration>,

    #[serde(default)]
    pub poll_interval: Option<Duration>,
}
