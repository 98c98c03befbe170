//! The external key/value state store boundary.
//!
//! The host persists two named slots for the connector: the sync cursor
//! and the import lock. The store is the only cross-process shared
//! mutable state and is accessed with plain read-then-write semantics;
//! there is no conditional-write primitive at this boundary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::SyncResult;

/// Names of the persisted state slots.
pub mod state_keys {
    /// Upper bound of the last successfully scanned order window.
    pub const ORDER_LAST_SYNC_AT: &str = "order_last_sync_at";
    /// The cooperative order-import lock.
    pub const LOCK_ORDER_PULL: &str = "lock_order_pull";
    /// Whether the fulfillment callback has been registered with the
    /// storefront.
    pub const FULFILLMENT_SERVICE_REGISTERED: &str = "fulfillment_service_registered";
}

/// A stored value together with its last write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    /// The stored string value.
    pub value: String,
    /// When the value was last written.
    pub updated_at: DateTime<Utc>,
}

impl StateEntry {
    /// Creates an entry stamped with the given write time.
    pub fn new(value: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            updated_at,
        }
    }
}

/// A persisted key/value state store.
///
/// # Invariants
///
/// - `put` stamps the entry with the current time
/// - `get` returns exactly the last value written for that key
/// - Implementations must be `Send + Sync`; the store is shared across
///   concurrent invocations of the connector
pub trait StateStore: Send + Sync {
    /// Reads a slot.
    fn get(&self, key: &str) -> SyncResult<Option<StateEntry>>;

    /// Writes a slot, stamping `updated_at = now`.
    fn put(&self, key: &str, value: &str) -> SyncResult<()>;
}

/// An in-memory state store.
///
/// Suitable for tests and single-process embedding; a real deployment
/// backs this trait with the host's persistent store.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: RwLock<HashMap<String, StateEntry>>,
}

impl MemoryStateStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a slot with an explicit timestamp.
    ///
    /// Lets tests backdate the lock entry to exercise staleness handling
    /// without sleeping.
    pub fn put_with_timestamp(&self, key: &str, value: &str, updated_at: DateTime<Utc>) {
        self.entries
            .write()
            .insert(key.to_string(), StateEntry::new(value, updated_at));
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> SyncResult<Option<StateEntry>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> SyncResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), StateEntry::new(value, Utc::now()));
        Ok(())
    }
}
