//! # ordsync Engine
//!
//! The synchronization core between a storefront and a warehouse.
//!
//! This crate provides:
//! - Incremental, cursor-windowed order polling with per-task isolation
//! - Idempotent order import with an optional transform hook
//! - A cooperative, staleness-aware import lock over external state
//! - Ordered first-match-wins shipping-method classification
//! - Inventory snapshot/adjustment paths and shipment event handlers
//!
//! ## Architecture
//!
//! A [`Connector`] owns the storefront session client, the warehouse
//! boundary, and the persisted state for one invocation. A scheduled
//! trigger calls [`Connector::sync_orders`], which scans the remote
//! window, queues one import task per changed order, advances the
//! cursor, and drives each task through [`Connector::import_order`].
//! Webhook deliveries enter through [`Connector::handle_event`].
//!
//! ## Key Invariants
//!
//! - The sync cursor never moves backward, and only moves once a whole
//!   window has been drained
//! - An order reference already present on the warehouse is never
//!   imported twice
//! - Order creation happens under the import lock, and the lock is
//!   released on every path out
//! - A failure in one order's import never aborts the rest of the batch

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod config;
mod connector;
mod error;
mod events;
mod inventory;
mod lock;
mod reconciler;
mod state;
mod sync;
mod transform;
mod warehouse;

pub use classifier::{classify, ShippingLine};
pub use config::EngineConfig;
pub use connector::Connector;
pub use error::{SyncError, SyncResult};
pub use lock::{ImportLock, LockConfig, LockGuard};
pub use state::{state_keys, MemoryStateStore, StateEntry, StateStore};
pub use sync::SyncReport;
pub use transform::{OrderTransform, TransformOutcome};
pub use warehouse::{InventoryRow, WarehouseApi, WarehouseOrder};
