//! Idempotent import of a single storefront order into the warehouse.

use chrono::Utc;
use tracing::{debug, error, info};

use ordsync_client::RpcTransport;
use ordsync_protocol::OrderDraft;

use crate::classifier::{classify, ShippingLine};
use crate::connector::{Connector, STATUS_FAILED_TO_SUBMIT, STATUS_SUBMITTED};
use crate::error::{SyncError, SyncResult};
use crate::lock::ImportLock;
use crate::state::StateStore;
use crate::warehouse::WarehouseApi;

/// Transform-script output is clipped to this many characters in
/// comments unless developer mode is on.
const SCRIPT_OUTPUT_LIMIT: usize = 2000;

/// A draft that passed every pre-submission step.
struct PreparedImport {
    draft: OrderDraft,
    script_output: Option<String>,
}

impl<T: RpcTransport, W: WarehouseApi, S: StateStore> Connector<T, W, S> {
    /// Imports one storefront order, idempotently per order reference.
    ///
    /// An order already present on the warehouse is re-acknowledged with
    /// a status comment and nothing else. An order with nothing to
    /// fulfill, or skipped entirely by the transform hook, is abandoned
    /// silently. Everything else either creates exactly one warehouse
    /// order or fails with a `failed_to_submit` comment on the source
    /// order.
    pub fn import_order(&mut self, order_ref: &str) -> SyncResult<()> {
        let prepared = match self.prepare_import(order_ref) {
            Ok(Some(prepared)) => prepared,
            Ok(None) => return Ok(()),
            Err(err) => {
                // Best-effort failure comment; the original error wins
                self.comment_best_effort(
                    order_ref,
                    STATUS_FAILED_TO_SUBMIT,
                    &format!("Order could not be submitted: {err}"),
                );
                return Err(err);
            }
        };
        self.submit(order_ref, prepared)
    }

    /// Runs every pre-submission step: idempotency check, draft build,
    /// classification, and the transform hook. `Ok(None)` means there is
    /// nothing to do, which is not an error.
    fn prepare_import(&mut self, order_ref: &str) -> SyncResult<Option<PreparedImport>> {
        let existing = self.warehouse.order_search(order_ref)?;
        if let Some(existing) = existing.first() {
            debug!("order {order_ref} already imported as {}", existing.unique_id);
            let message = match &existing.created_at {
                Some(at) => format!(
                    "Order already submitted as warehouse order # {} at {at}",
                    existing.unique_id
                ),
                None => format!(
                    "Order already submitted as warehouse order # {}",
                    existing.unique_id
                ),
            };
            self.comment_best_effort(order_ref, STATUS_SUBMITTED, &message);
            return Ok(None);
        }

        let order = self.storefront.order_info(order_ref)?;

        if !order.items.iter().any(|item| item.is_fulfillable()) {
            debug!("order {order_ref} has no importable items");
            return Ok(None);
        }

        let lines = [ShippingLine {
            method: order.shipping_method.clone(),
            description: order.shipping_description.clone(),
        }];
        let shipping_method = classify(&self.rules, &lines)?;

        let draft = OrderDraft::from_order_info(&order, shipping_method, Utc::now());

        let Some(hook) = self.transform.as_deref() else {
            return Ok(Some(PreparedImport {
                draft,
                script_output: None,
            }));
        };

        // Attach product records for the hook's benefit; an unknown sku
        // leaves the product empty rather than failing the import
        let mut draft = draft;
        for item in &mut draft.items {
            item.product = self.warehouse.product_info(&item.sku)?;
        }

        let outcome = hook.apply(draft, &order).map_err(SyncError::Transform)?;
        let mut draft = outcome.draft;

        draft.validate().map_err(|msg| {
            SyncError::Transform(format!(
                "the order transform did not return the data expected: {msg}"
            ))
        })?;

        if draft.skip {
            info!("order {order_ref} has been skipped by the transform");
            return Ok(None);
        }

        for sku in draft.prune_skipped() {
            debug!("sku {sku} has been skipped by the transform");
        }
        if draft.items.is_empty() {
            info!("all skus of order {order_ref} skipped by the transform");
            return Ok(None);
        }

        Ok(Some(PreparedImport {
            draft,
            script_output: outcome.output,
        }))
    }

    /// Creates the warehouse order under the import lock and records the
    /// outcome on the source order.
    fn submit(&mut self, order_ref: &str, prepared: PreparedImport) -> SyncResult<()> {
        let created = {
            let _guard = ImportLock::acquire(&self.state, &self.config.lock)?;
            self.warehouse.order_create(&prepared.draft)
            // the guard releases here, success or failure
        };

        match created {
            Ok(order) => {
                let message = format!("Created warehouse order # {}", order.unique_id);
                info!("order {order_ref}: {message}");
                self.comment_best_effort(order_ref, STATUS_SUBMITTED, &message);
                if let Some(output) = prepared.script_output {
                    let clipped = self.clip_script_output(output);
                    self.comment_best_effort(order_ref, STATUS_SUBMITTED, &clipped);
                }
                Ok(())
            }
            Err(err) => {
                let message = format!("Order could not be submitted: {err}");
                error!("order {order_ref}: {message}");
                self.comment_best_effort(order_ref, STATUS_FAILED_TO_SUBMIT, &message);
                // A creation failure is a data error; retrying risks a
                // duplicate submission
                Err(SyncError::OrderCreate(err.to_string()))
            }
        }
    }

    fn clip_script_output(&self, output: String) -> String {
        if self.config.verbose || output.chars().count() <= SCRIPT_OUTPUT_LIMIT {
            output
        } else {
            let clipped: String = output.chars().take(SCRIPT_OUTPUT_LIMIT).collect();
            format!("{clipped}…")
        }
    }
}
