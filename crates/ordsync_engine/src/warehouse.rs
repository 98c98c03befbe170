//! The fulfillment-platform boundary.
//!
//! The warehouse owns local orders, products, inventory, and shipments.
//! The engine only ever talks to it through this trait; tests supply an
//! in-memory implementation.

use serde_json::Value;

use ordsync_protocol::OrderDraft;

use crate::error::SyncResult;

/// A local order record on the warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseOrder {
    /// Warehouse-assigned order number.
    pub unique_id: String,
    /// The storefront order reference it was created from.
    pub order_ref: String,
    /// Creation time as reported by the warehouse.
    pub created_at: Option<String>,
}

/// One inventory row on the warehouse.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    /// Stock keeping unit.
    pub sku: String,
    /// Quantity available for sale.
    pub qty_available: f64,
}

/// Calls the engine makes against the fulfillment platform.
pub trait WarehouseApi: Send + Sync {
    /// Finds orders created from the given storefront reference.
    fn order_search(&self, order_ref: &str) -> SyncResult<Vec<WarehouseOrder>>;

    /// Creates a local order from a finished draft.
    fn order_create(&self, draft: &OrderDraft) -> SyncResult<WarehouseOrder>;

    /// Fetches a product record; an unknown sku is `Ok(None)`, not an
    /// error (transform hooks tolerate missing products).
    fn product_info(&self, sku: &str) -> SyncResult<Option<Value>>;

    /// Lists inventory, optionally restricted to one sku pattern.
    fn inventory_list(&self, sku_filter: Option<&str>) -> SyncResult<Vec<InventoryRow>>;

    /// Updates a shipment record, e.g. to rewrite its external id after
    /// tracking numbers have been communicated.
    fn shipment_update(&self, shipment_id: &str, payload: Value) -> SyncResult<()>;
}
