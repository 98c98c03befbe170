//! The cooperative order-import lock.
//!
//! Order import and inventory sync must not interleave: a stock snapshot
//! taken while orders are being created would double-count reserved
//! quantities. The lock is a value in the external state store that all
//! participants poll and voluntarily respect.
//!
//! Acquisition is read-then-write, not compare-and-swap — two processes
//! can in principle both observe "unlocked" and both write "locked". This
//! race is accepted: concurrency is low, and a holder that crashes
//! without releasing is healed by the staleness override, which lets a
//! waiter steal a lock whose timestamp has not moved for `stale_after`.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};
use crate::state::{state_keys, StateStore};

const LOCKED: &str = "locked";
const UNLOCKED: &str = "unlocked";

/// Tunables for lock acquisition.
#[derive(Debug, Clone)]
pub struct LockConfig {
    /// Number of acquisition attempts before giving up.
    pub max_attempts: u32,
    /// Sleep between attempts.
    pub poll_interval: Duration,
    /// Age after which a held lock is considered abandoned and stolen.
    pub stale_after: Duration,
}

impl LockConfig {
    /// Creates the production configuration: 20 one-second attempts,
    /// steal after one minute.
    pub fn new() -> Self {
        Self {
            max_attempts: 20,
            poll_interval: Duration::from_secs(1),
            stale_after: Duration::from_secs(60),
        }
    }

    /// Sets the number of acquisition attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the sleep between attempts.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the staleness threshold.
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The order-import lock.
pub struct ImportLock;

impl ImportLock {
    /// Acquires the lock, polling the state store up to the configured
    /// attempt budget.
    ///
    /// Returns a guard that releases the lock when dropped; release
    /// failures are logged, never raised, so cleanup can never mask a
    /// primary error or wedge subsequent runs.
    pub fn acquire<'a, S: StateStore + ?Sized>(
        store: &'a S,
        config: &LockConfig,
    ) -> SyncResult<LockGuard<'a, S>> {
        for attempt in 0..config.max_attempts {
            if attempt > 0 {
                std::thread::sleep(config.poll_interval);
            }

            match store.get(state_keys::LOCK_ORDER_PULL)? {
                Some(entry) if entry.value == LOCKED => {
                    let age = chrono::Utc::now().signed_duration_since(entry.updated_at);
                    if age.num_milliseconds() >= config.stale_after.as_millis() as i64 {
                        warn!(age_secs = age.num_seconds(), "stealing stale import lock");
                        store.put(state_keys::LOCK_ORDER_PULL, LOCKED)?;
                        return Ok(LockGuard { store });
                    }
                    debug!(attempt, "import lock held, waiting");
                }
                _ => {
                    // Absent or unlocked
                    store.put(state_keys::LOCK_ORDER_PULL, LOCKED)?;
                    return Ok(LockGuard { store });
                }
            }
        }

        Err(SyncError::LockTimeout {
            attempts: config.max_attempts,
        })
    }

    /// Non-blocking advisory check: is the lock currently recorded as
    /// held? Staleness is deliberately ignored here — a sync run that
    /// sees "locked" simply skips and lets the next run pick up.
    pub fn is_held<S: StateStore + ?Sized>(store: &S) -> SyncResult<bool> {
        Ok(store
            .get(state_keys::LOCK_ORDER_PULL)?
            .is_some_and(|entry| entry.value == LOCKED))
    }

    /// Explicitly releases the lock without holding a guard.
    ///
    /// The unlock callback route uses this to clear a lock left behind by
    /// a crashed holder.
    pub fn force_release<S: StateStore + ?Sized>(store: &S) -> SyncResult<()> {
        store.put(state_keys::LOCK_ORDER_PULL, UNLOCKED)
    }
}

/// Holds the import lock; releasing happens on drop.
pub struct LockGuard<'a, S: StateStore + ?Sized> {
    store: &'a S,
}

impl<S: StateStore + ?Sized> std::fmt::Debug for LockGuard<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").finish_non_exhaustive()
    }
}

impl<S: StateStore + ?Sized> Drop for LockGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(err) = self.store.put(state_keys::LOCK_ORDER_PULL, UNLOCKED) {
            warn!("cannot unlock order importing: {err}");
        }
    }
}
