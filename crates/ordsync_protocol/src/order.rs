//! Remote order records and the order draft submitted to the warehouse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shipment::order_source;

/// One row of a storefront `order.list` page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Public order number on the storefront.
    pub increment_id: String,
    /// Current storefront order status.
    pub status: String,
    /// Last modification time, `YYYY-MM-DD HH:MM:SS` UTC.
    pub updated_at: String,
}

impl OrderSummary {
    /// Creates a new order summary row.
    pub fn new(
        increment_id: impl Into<String>,
        status: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            increment_id: increment_id.into(),
            status: status.into(),
            updated_at: updated_at.into(),
        }
    }
}

/// Full `order.info` payload for a single storefront order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo {
    /// Public order number on the storefront.
    pub increment_id: String,
    /// Current storefront order status.
    pub status: String,
    /// Carrier/method code selected at checkout, e.g. `flatrate_flatrate`.
    #[serde(default)]
    pub shipping_method: Option<String>,
    /// Human-readable shipping description shown to the customer.
    #[serde(default)]
    pub shipping_description: Option<String>,
    /// Destination address.
    pub shipping_address: Address,
    /// Ordered items, including non-shippable rows.
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A postal address as the storefront sends it.
///
/// The storefront transmits the street as a single newline-joined string;
/// the warehouse expects it under `street1`, so [`Address::with_street1`]
/// copies it over when a draft is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Recipient first name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    /// Recipient last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Newline-joined street lines as sent by the storefront.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// First street line expected by the warehouse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street1: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Region or state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    /// ISO country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    /// Contact telephone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

impl Address {
    /// Returns a copy with `street1` populated from `street`.
    pub fn with_street1(mut self) -> Self {
        if self.street1.is_none() {
            self.street1 = self.street.clone();
        }
        self
    }

    /// Returns true if no field of the address is set.
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none()
            && self.lastname.is_none()
            && self.company.is_none()
            && self.street.is_none()
            && self.street1.is_none()
            && self.city.is_none()
            && self.region.is_none()
            && self.postcode.is_none()
            && self.country_id.is_none()
            && self.telephone.is_none()
    }
}

/// One ordered item row as the storefront sends it.
///
/// Composite products produce multiple rows (a parent row plus its simple
/// children); only rows of type `simple` are shippable. Virtual and
/// downloadable rows are never shippable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Stock keeping unit.
    pub sku: String,
    /// Storefront product type (`simple`, `configurable`, `bundle`, ...).
    #[serde(default)]
    pub product_type: Option<String>,
    /// Storefront order-item row id, if provided.
    #[serde(default)]
    pub item_id: Option<String>,
    /// Quantity ordered.
    #[serde(default)]
    pub qty_ordered: f64,
    /// Quantity canceled.
    #[serde(default)]
    pub qty_canceled: f64,
    /// Quantity refunded.
    #[serde(default)]
    pub qty_refunded: f64,
    /// Quantity already shipped.
    #[serde(default)]
    pub qty_shipped: f64,
}

impl OrderItem {
    /// Remaining quantity that still needs fulfillment:
    /// `ordered - canceled - refunded - shipped`, floored at zero.
    pub fn fulfillable_qty(&self) -> f64 {
        (self.qty_ordered - self.qty_canceled - self.qty_refunded - self.qty_shipped).max(0.0)
    }

    /// Returns true if this row can be fulfilled at all: it must be a
    /// `simple` product with a positive remaining quantity.
    pub fn is_fulfillable(&self) -> bool {
        self.product_type.as_deref() == Some("simple") && self.fulfillable_qty() > 0.0
    }
}

/// One item of an [`OrderDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftItem {
    /// Stock keeping unit.
    pub sku: String,
    /// Quantity to fulfill.
    pub qty: f64,
    /// Reference to the originating storefront order-item row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_item_ref: Option<String>,
    /// Product record attached for the transform hook's benefit; always
    /// stripped before submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<serde_json::Value>,
    /// Set by the transform hook to drop this item from the draft.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,
}

/// Options attached to a warehouse `order.create` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftOptions {
    /// The storefront order number; the idempotency key for import.
    pub order_ref: String,
    /// Shipping method selected by the classifier.
    pub shipping_method: String,
    /// Source marker, `storefront:<increment_id>`.
    pub source: String,
}

/// A local order about to be submitted to the warehouse.
///
/// Built from a storefront [`OrderInfo`], optionally rewritten by the
/// configured transform hook, and discarded after submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Target warehouse store; `None` selects the default store.
    pub store: Option<String>,
    /// Items to fulfill.
    pub items: Vec<DraftItem>,
    /// Destination address.
    pub address: Address,
    /// Order options.
    pub options: DraftOptions,
    /// Draft creation time.
    pub timestamp: DateTime<Utc>,
    /// Set by the transform hook to abandon the whole order.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,
}

impl OrderDraft {
    /// Builds a draft from a storefront order.
    ///
    /// Non-fulfillable item rows are dropped and quantities computed per
    /// [`OrderItem::fulfillable_qty`]. The returned draft may have an empty
    /// item list; callers decide whether that means "nothing to import".
    pub fn from_order_info(order: &OrderInfo, shipping_method: String, now: DateTime<Utc>) -> Self {
        let items = order
            .items
            .iter()
            .filter(|item| item.is_fulfillable())
            .map(|item| DraftItem {
                sku: item.sku.clone(),
                qty: item.fulfillable_qty(),
                order_item_ref: item.item_id.clone(),
                product: None,
                skip: false,
            })
            .collect();

        Self {
            store: None,
            items,
            address: order.shipping_address.clone().with_street1(),
            options: DraftOptions {
                order_ref: order.increment_id.clone(),
                shipping_method,
                source: order_source(&order.increment_id),
            },
            timestamp: now,
            skip: false,
        }
    }

    /// Checks the structural contract a transform hook must preserve:
    /// non-empty items, a non-empty address, and a non-empty order
    /// reference.
    pub fn validate(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err("draft has no items".into());
        }
        if self.address.is_empty() {
            return Err("draft has no address".into());
        }
        if self.options.order_ref.is_empty() {
            return Err("draft has no order reference".into());
        }
        Ok(())
    }

    /// Removes items marked `skip` by the transform hook and strips the
    /// product records that were attached for the hook's benefit.
    ///
    /// Returns the skus of the removed items.
    pub fn prune_skipped(&mut self) -> Vec<String> {
        let mut skipped = Vec::new();
        self.items.retain(|item| {
            if item.skip {
                skipped.push(item.sku.clone());
                false
            } else {
                true
            }
        });
        for item in &mut self.items {
            item.product = None;
        }
        skipped
    }
}
