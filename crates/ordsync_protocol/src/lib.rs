//! # ordsync Protocol
//!
//! Wire-facing types shared by the ordsync client and engine.
//!
//! This crate provides:
//! - Remote order records (`OrderSummary`, `OrderInfo`, `OrderItem`)
//! - Order drafts submitted to the warehouse (`OrderDraft`)
//! - The ordered shipping-method rule list (`ShippingRule`)
//! - Webhook events and their routing to internal tasks
//! - The shipment external-id codec (`ShipmentExternalId`)
//!
//! This is a pure data crate with no I/O operations.
//!
//! ## Key Invariants
//!
//! - `updated_at` timestamps are `YYYY-MM-DD HH:MM:SS` strings whose
//!   lexicographic order is chronological order
//! - A draft item's quantity is the remaining fulfillable quantity,
//!   floored at zero
//! - `ShipmentExternalId::parse` and `encode` are inverse functions

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod events;
mod order;
mod rules;
mod shipment;

pub use events::{route_event, EventTopic, StockAdjustment, SyncTask, WebhookEvent};
pub use order::{Address, DraftItem, DraftOptions, OrderDraft, OrderInfo, OrderItem, OrderSummary};
pub use rules::{parse_rules, RuleField, RuleOperator, ShippingRule};
pub use shipment::{order_source, parse_order_source, ShipmentExternalId, SOURCE_PREFIX};

/// Timestamp format used by the storefront API for `updated_at` filters
/// and values (`YYYY-MM-DD HH:MM:SS`, UTC).
pub const REMOTE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
