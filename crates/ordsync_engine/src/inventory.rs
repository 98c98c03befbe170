//! Inventory paths: the delegated full sync, the locked snapshot, and
//! per-sku adjustments.

use std::collections::BTreeMap;

use tracing::info;

use ordsync_client::RpcTransport;
use ordsync_protocol::StockAdjustment;

use crate::connector::Connector;
use crate::error::{SyncError, SyncResult};
use crate::lock::ImportLock;
use crate::state::StateStore;
use crate::warehouse::WarehouseApi;

impl<T: RpcTransport, W: WarehouseApi, S: StateStore> Connector<T, W, S> {
    /// Triggers the storefront-side atomic inventory sync and returns
    /// its human-readable summary (counts of unchanged / updated /
    /// errored skus).
    ///
    /// The storefront owns the comparison: it queries our snapshot
    /// endpoint (which holds the import lock) so the reconciliation is
    /// atomic with respect to order import.
    pub fn sync_inventory(&mut self) -> SyncResult<String> {
        let response = self.storefront.trigger_inventory_sync()?;
        if !response.success {
            return Err(SyncError::Storefront(response.message));
        }
        info!("inventory sync: {}", response.message);
        Ok(response.message)
    }

    /// Takes a warehouse inventory snapshot while holding the import
    /// lock, so no order import can consume stock mid-read.
    ///
    /// Returns available quantities per sku, floored to whole units.
    pub fn inventory_snapshot(
        &mut self,
        sku_filter: Option<&str>,
    ) -> SyncResult<BTreeMap<String, i64>> {
        let rows = {
            let _guard = ImportLock::acquire(&self.state, &self.config.lock)?;
            self.warehouse.inventory_list(sku_filter)
        }?;

        Ok(rows
            .into_iter()
            .map(|row| (row.sku, row.qty_available as i64))
            .collect())
    }

    /// Applies stock adjustments to the storefront, one sku at a time.
    pub fn adjust_inventory(&mut self, adjustments: &[StockAdjustment]) -> SyncResult<()> {
        for adjustment in adjustments {
            if adjustment.sku.is_empty() || adjustment.qty_adjust == 0.0 {
                continue;
            }
            self.storefront
                .stock_adjust(&adjustment.sku, adjustment.qty_adjust)?;
            info!(
                "adjusted inventory for {}: {:+.4}",
                adjustment.sku, adjustment.qty_adjust
            );
        }
        Ok(())
    }
}
