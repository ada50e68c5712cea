//! Last-activity table keyed by user identifier.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

/// Outcome of recording a request against the activity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// The request may proceed.
    Allowed,
    /// The user was idle longer than the timeout; the session is gone.
    Expired,
}

impl Activity {
    /// Check if the session expired.
    pub fn is_expired(&self) -> bool {
        matches!(self, Activity::Expired)
    }
}

/// Point-in-time counters for the activity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityStats {
    /// Number of users currently tracked.
    pub tracked: usize,

    /// Entries a sweep at the same instant would remove.
    pub stale: usize,
}

/// Tracks the last accepted request time for each user.
///
/// Each user id maps to a single millisecond timestamp. Operations on the
/// same key run under that key's shard lock, so a read-check-write for one
/// user is atomic and two racing requests can never both observe the same
/// stale timestamp.
#[derive(Debug)]
pub struct ActivityTable {
    /// Last accepted activity per user.
    entries: DashMap<String, u64>,

    /// Idle timeout in milliseconds.
    idle_timeout_ms: u64,
}

impl ActivityTable {
    /// Create an empty table with the given idle timeout.
    pub fn new(idle_timeout_ms: u64) -> Self {
        Self {
            entries: DashMap::new(),
            idle_timeout_ms,
        }
    }

    /// Record a request from `user_id` observed at `now`.
    ///
    /// An empty user id is never tracked and always allowed.
    pub fn record_and_check(&self, user_id: &str, now: u64) -> Activity {
        if user_id.is_empty() {
            return Activity::Allowed;
        }

        match self.entries.entry(user_id.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(now);
                trace!(user_id = %user_id, now, "Activity window opened");
                Activity::Allowed
            }
            Entry::Occupied(mut occupied) => {
                let last_seen = *occupied.get();
                if self.is_stale(last_seen, now) {
                    occupied.remove();
                    trace!(user_id = %user_id, last_seen, now, "Activity window expired");
                    Activity::Expired
                } else {
                    // A request stamped slightly earlier may lose the race for the lock.
                    *occupied.get_mut() = last_seen.max(now);
                    Activity::Allowed
                }
            }
        }
    }

    /// Remove every entry idle for longer than the timeout at `now`.
    ///
    /// Returns the number of entries removed. An entry whose age equals the
    /// timeout exactly is kept.
    pub fn sweep(&self, now: u64) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, last_seen| {
            let keep = !self.is_stale(*last_seen, now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Last accepted activity for a user, without refreshing it.
    pub fn last_seen(&self, user_id: &str) -> Option<u64> {
        self.entries.get(user_id).map(|entry| *entry.value())
    }

    /// Get the number of tracked users.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no users are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count tracked and stale entries as of `now`.
    pub fn stats(&self, now: u64) -> ActivityStats {
        let mut tracked = 0;
        let mut stale = 0;
        for entry in self.entries.iter() {
            tracked += 1;
            if self.is_stale(*entry.value(), now) {
                stale += 1;
            }
        }
        ActivityStats { tracked, stale }
    }

    fn is_stale(&self, last_seen: u64, now: u64) -> bool {
        now.saturating_sub(last_seen) > self.idle_timeout_ms
    }
}
