//! Lock marker encoding
//!
//! The value stored under a lock's key is the only record of ownership:
//! either an absolute epoch-seconds deadline, or the sentinel `1` meaning
//! held with no deadline.

use std::time::Duration;

use latchkey_common::epoch_secs;

/// Sentinel stored when the lock carries no expiration policy.
const HELD_SENTINEL: &str = "1";

/// Parsed form of the value stored under a lock key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marker {
    /// Held with no deadline; only an explicit release or an administrative
    /// clear frees the key.
    Held,

    /// Held until the given epoch-seconds deadline, after which the key is
    /// eligible for reclaim.
    Deadline(f64),
}

impl Marker {
    /// Marker to write for a fresh acquisition.
    ///
    /// With an expiration policy the stored deadline is
    /// `now + expiration + 1` in epoch seconds; without one, the sentinel.
    pub fn next(expiration: Option<Duration>) -> Self {
        match expiration {
            Some(ttl) => Marker::Deadline(epoch_secs() + ttl.as_secs_f64() + 1.0),
            None => Marker::Held,
        }
    }

    /// Parse a stored value.
    ///
    /// Anything that is neither the sentinel nor a readable number is
    /// treated as a deadline that has already passed.
    pub fn parse(raw: &str) -> Self {
        if raw == HELD_SENTINEL {
            Marker::Held
        } else {
            Marker::Deadline(raw.parse().unwrap_or(0.0))
        }
    }

    /// Wire form written to the store.
    pub fn encode(&self) -> String {
        match self {
            Marker::Held => HELD_SENTINEL.to_string(),
            Marker::Deadline(deadline) => deadline.to_string(),
        }
    }

    /// The encoded deadline, when one exists.
    pub fn deadline(&self) -> Option<f64> {
        match self {
            Marker::Held => None,
            Marker::Deadline(deadline) => Some(*deadline),
        }
    }

    /// A marker is stale once its deadline has passed. A sentinel has no
    /// deadline and is never stale.
    pub fn is_stale(&self, now: f64) -> bool {
        matches!(self, Marker::Deadline(deadline) if *deadline < now)
    }

    /// Whether a key carrying this marker counts as held at `now`.
    pub fn is_current(&self, now: f64) -> bool {
        match self {
            Marker::Held => true,
            Marker::Deadline(deadline) => *deadline >= now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_without_expiration_is_sentinel() {
        let marker = Marker::next(None);
        assert_eq!(marker, Marker::Held);
        assert_eq!(marker.encode(), "1");
        assert_eq!(marker.deadline(), None);
    }

    #[test]
    fn test_next_with_expiration_lands_past_nominal_expiry() {
        let before = epoch_secs();
        let marker = Marker::next(Some(Duration::from_secs(30)));
        let deadline = marker.deadline().unwrap();
        assert!(deadline >= before + 31.0);
        assert!(deadline < before + 32.0);
    }

    #[test]
    fn test_parse_sentinel() {
        assert_eq!(Marker::parse("1"), Marker::Held);
    }

    #[test]
    fn test_parse_timestamp() {
        let marker = Marker::parse("1723012345.25");
        assert_eq!(marker, Marker::Deadline(1723012345.25));
    }

    #[test]
    fn test_parse_garbage_reads_as_passed_deadline() {
        let marker = Marker::parse("not-a-number");
        assert!(marker.is_stale(epoch_secs()));
        assert!(!marker.is_current(epoch_secs()));
    }

    #[test]
    fn test_encode_parse_round_trip() {
        let marker = Marker::next(Some(Duration::from_millis(200)));
        assert_eq!(Marker::parse(&marker.encode()), marker);
    }

    #[test]
    fn test_staleness() {
        let now = epoch_secs();
        assert!(Marker::Deadline(now - 1.0).is_stale(now));
        assert!(!Marker::Deadline(now + 60.0).is_stale(now));
        assert!(!Marker::Held.is_stale(now));
    }

    #[test]
    fn test_currency() {
        let now = epoch_secs();
        assert!(Marker::Held.is_current(now));
        assert!(Marker::Deadline(now + 60.0).is_current(now));
        assert!(!Marker::Deadline(now - 1.0).is_current(now));
    }
}
