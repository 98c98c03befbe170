//! Webhook events delivered by the warehouse and their routing to
//! internal sync tasks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shipment::{parse_order_source, ShipmentExternalId};

/// The webhook topics the connector consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventTopic {
    /// Warehouse inventory was adjusted out-of-band.
    InventoryAdjustment,
    /// A delivery was committed, reserving stock.
    DeliveryCommitted,
    /// A shipment was packed and is ready to be recorded.
    ShipmentPacked,
    /// A shipment left the warehouse with tracking numbers.
    ShipmentShipped,
    /// A shipment was reverted before leaving the warehouse.
    ShipmentReverted,
    /// Shipping labels for a shipment were voided.
    ShipmentLabelsVoided,
}

/// A webhook event as delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event topic.
    pub topic: EventTopic,
    /// Source marker of the record the event concerns.
    #[serde(default)]
    pub source: String,
    /// Raw event payload.
    #[serde(default)]
    pub payload: Value,
}

impl WebhookEvent {
    /// Creates a new event.
    pub fn new(topic: EventTopic, source: impl Into<String>, payload: Value) -> Self {
        Self {
            topic,
            source: source.into(),
            payload,
        }
    }
}

/// A single stock adjustment extracted from an inventory event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Stock keeping unit.
    pub sku: String,
    /// Signed quantity delta.
    pub qty_adjust: f64,
}

/// The internal work item an inbound event routes to.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncTask {
    /// Import one storefront order into the warehouse.
    ImportOrder {
        /// The storefront order increment id.
        order_ref: String,
    },
    /// Apply stock adjustments to the storefront.
    AdjustInventory {
        /// Per-sku deltas; already filtered of empty rows.
        adjustments: Vec<StockAdjustment>,
    },
    /// Record a packed shipment on the storefront order.
    CompleteShipment {
        /// The storefront order increment id.
        order_ref: String,
        /// Raw shipment payload forwarded to the storefront.
        payload: Value,
    },
    /// Communicate tracking numbers for an already-recorded shipment.
    AddTracking {
        /// Parsed external id of the storefront shipment.
        external_id: ShipmentExternalId,
        /// The warehouse shipment id whose external id is updated after
        /// tracking has been communicated.
        warehouse_shipment_id: String,
        /// Raw shipment payload with the tracking numbers.
        payload: Value,
    },
    /// Revert a storefront shipment that will not go out as recorded.
    RevertShipment {
        /// The storefront order increment id.
        order_ref: String,
        /// Raw shipment payload.
        payload: Value,
    },
}

/// Extracts stock adjustments from an inventory event payload.
///
/// The payload shape is `{"stock_adjustments": {"<sku>": {"qty_adjust": n,
/// ...}, ...}}`. Rows with an empty sku or a zero delta are dropped.
fn stock_adjustments(payload: &Value) -> Vec<StockAdjustment> {
    let Some(map) = payload.get("stock_adjustments").and_then(Value::as_object) else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(sku, change)| {
            let qty_adjust = change.get("qty_adjust").and_then(Value::as_f64)?;
            if sku.is_empty() || qty_adjust == 0.0 {
                return None;
            }
            Some(StockAdjustment {
                sku: sku.clone(),
                qty_adjust,
            })
        })
        .collect()
}

/// Routes an inbound event to the task it implies.
///
/// Shipment events are filtered on our source marker: an event whose
/// source (or external id, for shipped events) does not carry the
/// `storefront:` prefix belongs to another integration and routes to
/// `None`.
pub fn route_event(event: &WebhookEvent) -> Option<SyncTask> {
    match event.topic {
        EventTopic::InventoryAdjustment | EventTopic::DeliveryCommitted => {
            Some(SyncTask::AdjustInventory {
                adjustments: stock_adjustments(&event.payload),
            })
        }
        EventTopic::ShipmentPacked => {
            let order_ref = parse_order_source(&event.source)?.to_string();
            Some(SyncTask::CompleteShipment {
                order_ref,
                payload: event.payload.clone(),
            })
        }
        EventTopic::ShipmentShipped => {
            let external_id = event
                .payload
                .get("external_id")
                .and_then(Value::as_str)
                .and_then(ShipmentExternalId::parse)?;
            let warehouse_shipment_id = event
                .payload
                .get("shipment_id")
                .and_then(Value::as_str)?
                .to_string();
            Some(SyncTask::AddTracking {
                external_id,
                warehouse_shipment_id,
                payload: event.payload.clone(),
            })
        }
        EventTopic::ShipmentReverted | EventTopic::ShipmentLabelsVoided => {
            let order_ref = parse_order_source(&event.source)?.to_string();
            Some(SyncTask::RevertShipment {
                order_ref,
                payload: event.payload.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inventory_events_extract_adjustments() {
        let event = WebhookEvent::new(
            EventTopic::InventoryAdjustment,
            "",
            json!({"stock_adjustments": {
                "WIDGET": {"qty_adjust": 5.0, "qty_available": 95.0},
                "GADGET": {"qty_adjust": 0.0},
                "": {"qty_adjust": 3.0}
            }}),
        );
        let Some(SyncTask::AdjustInventory { adjustments }) = route_event(&event) else {
            panic!("expected adjust task");
        };
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].sku, "WIDGET");
        assert_eq!(adjustments[0].qty_adjust, 5.0);
    }

    #[test]
    fn packed_events_require_our_source_marker() {
        let ours = WebhookEvent::new(
            EventTopic::ShipmentPacked,
            "storefront:100000123",
            json!({"shipment_id": "7"}),
        );
        let Some(SyncTask::CompleteShipment { order_ref, .. }) = route_event(&ours) else {
            panic!("expected complete task");
        };
        assert_eq!(order_ref, "100000123");

        let theirs = WebhookEvent::new(
            EventTopic::ShipmentPacked,
            "shopify:100000123",
            json!({"shipment_id": "7"}),
        );
        assert_eq!(route_event(&theirs), None);
    }

    #[test]
    fn shipped_events_route_on_external_id() {
        let event = WebhookEvent::new(
            EventTopic::ShipmentShipped,
            "storefront:100000123",
            json!({"external_id": "storefront:55", "shipment_id": "9001"}),
        );
        let Some(SyncTask::AddTracking {
            external_id,
            warehouse_shipment_id,
            ..
        }) = route_event(&event)
        else {
            panic!("expected tracking task");
        };
        assert_eq!(external_id.shipment_id, "55");
        assert!(!external_id.tracking_added);
        assert_eq!(warehouse_shipment_id, "9001");

        let foreign = WebhookEvent::new(
            EventTopic::ShipmentShipped,
            "storefront:100000123",
            json!({"external_id": "othersystem:55", "shipment_id": "9001"}),
        );
        assert_eq!(route_event(&foreign), None);
    }

    #[test]
    fn voided_labels_route_to_revert() {
        let event = WebhookEvent::new(
            EventTopic::ShipmentLabelsVoided,
            "storefront:100000200",
            json!({}),
        );
        assert!(matches!(
            route_event(&event),
            Some(SyncTask::RevertShipment { order_ref, .. }) if order_ref == "100000200"
        ));
    }

    #[test]
    fn topics_deserialize_from_kebab_case() {
        let topic: EventTopic = serde_json::from_str("\"shipment-labels-voided\"").unwrap();
        assert_eq!(topic, EventTopic::ShipmentLabelsVoided);
    }
}
