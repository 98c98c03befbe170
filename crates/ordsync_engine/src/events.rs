//! Dispatch of inbound webhook events to their handlers.

use serde_json::json;
use tracing::{debug, info, warn};

use ordsync_client::RpcTransport;
use ordsync_protocol::{route_event, ShipmentExternalId, SyncTask, WebhookEvent};

use crate::connector::{Connector, STATUS_FAILED_TO_SUBMIT, STATUS_SUBMITTED};
use crate::error::{SyncError, SyncResult};
use crate::state::StateStore;
use crate::warehouse::WarehouseApi;

impl<T: RpcTransport, W: WarehouseApi, S: StateStore> Connector<T, W, S> {
    /// Handles one inbound event end to end.
    ///
    /// Events that do not carry our source marker route to nothing and
    /// are ignored.
    pub fn handle_event(&mut self, event: &WebhookEvent) -> SyncResult<()> {
        match route_event(event) {
            Some(task) => self.run_task(task),
            None => {
                debug!(topic = ?event.topic, source = %event.source, "ignoring foreign event");
                Ok(())
            }
        }
    }

    /// Runs one internal sync task.
    pub fn run_task(&mut self, task: SyncTask) -> SyncResult<()> {
        match task {
            SyncTask::ImportOrder { order_ref } => self.import_order(&order_ref),
            SyncTask::AdjustInventory { adjustments } => self.adjust_inventory(&adjustments),
            SyncTask::CompleteShipment { order_ref, payload } => {
                self.complete_shipment(&order_ref, payload)
            }
            SyncTask::AddTracking {
                external_id,
                warehouse_shipment_id,
                payload,
            } => self.add_tracking(&external_id, &warehouse_shipment_id, payload),
            SyncTask::RevertShipment { order_ref, .. } => self.revert_shipment(&order_ref),
        }
    }

    /// Records a packed warehouse shipment on the storefront order.
    fn complete_shipment(
        &mut self,
        order_ref: &str,
        payload: serde_json::Value,
    ) -> SyncResult<()> {
        let order = self.storefront.order_info(order_ref)?;
        match order.status.as_str() {
            STATUS_SUBMITTED => {}
            STATUS_FAILED_TO_SUBMIT => {
                warn!(
                    "order {order_ref} was failed_to_submit; completing it anyway"
                );
            }
            other => {
                return Err(SyncError::Storefront(format!(
                    "order {order_ref} status is '{other}', expected '{STATUS_SUBMITTED}'"
                )));
            }
        }

        let shipment_id = self
            .storefront
            .shipment_create_with_tracking(order_ref, payload)?;
        info!("created storefront shipment # {shipment_id} for order # {order_ref}");
        Ok(())
    }

    /// Communicates tracking numbers for an already-recorded shipment,
    /// then marks the warehouse shipment so redelivered events become
    /// no-ops.
    fn add_tracking(
        &mut self,
        external_id: &ShipmentExternalId,
        warehouse_shipment_id: &str,
        payload: serde_json::Value,
    ) -> SyncResult<()> {
        if external_id.tracking_added {
            debug!(
                "tracking for shipment {} already communicated",
                external_id.shipment_id
            );
            return Ok(());
        }

        self.storefront
            .shipment_add_track(&external_id.shipment_id, payload)?;

        let updated = external_id.with_tracking_added();
        self.warehouse.shipment_update(
            warehouse_shipment_id,
            json!({"external_id": updated.encode()}),
        )?;
        info!(
            "added tracking to storefront shipment # {}",
            external_id.shipment_id
        );
        Ok(())
    }

    /// Reverts a storefront shipment that will not go out as recorded.
    fn revert_shipment(&mut self, order_ref: &str) -> SyncResult<()> {
        self.storefront.shipment_revert(order_ref)?;
        warn!("reverted shipment state of order # {order_ref}");
        Ok(())
    }
}
