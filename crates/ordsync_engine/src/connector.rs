//! The connector: owns the storefront client, the warehouse boundary,
//! and the persisted state, and composes the sync components.

use tracing::warn;

use ordsync_client::{Credentials, RpcTransport, SessionClient};
use ordsync_protocol::ShippingRule;

use crate::config::EngineConfig;
use crate::error::SyncResult;
use crate::state::{state_keys, StateStore};
use crate::transform::OrderTransform;
use crate::warehouse::WarehouseApi;

/// Storefront order status once the warehouse order exists.
pub(crate) const STATUS_SUBMITTED: &str = "submitted";
/// Storefront order status when submission failed.
pub(crate) const STATUS_FAILED_TO_SUBMIT: &str = "failed_to_submit";

/// The synchronization connector.
///
/// One instance per invocation: a scheduled sync, a webhook delivery, or
/// a manual CLI run. The storefront client inside is lazily initialized
/// and owned here — there is no ambient singleton — so the RPC session
/// lives exactly as long as the connector.
pub struct Connector<T: RpcTransport, W: WarehouseApi, S: StateStore> {
    pub(crate) config: EngineConfig,
    pub(crate) storefront: SessionClient<T>,
    pub(crate) warehouse: W,
    pub(crate) state: S,
    pub(crate) rules: Vec<ShippingRule>,
    pub(crate) transform: Option<Box<dyn OrderTransform>>,
}

impl<T: RpcTransport, W: WarehouseApi, S: StateStore> Connector<T, W, S> {
    /// Creates a connector. Fails fast on missing credentials or an
    /// unparsable shipping-rule list.
    pub fn new(config: EngineConfig, transport: T, warehouse: W, state: S) -> SyncResult<Self> {
        let credentials = Credentials::new(&config.api_user, &config.api_key)?;
        let rules = config.shipping_rules()?;
        Ok(Self {
            storefront: SessionClient::new(transport, credentials),
            warehouse,
            state,
            rules,
            transform: None,
            config,
        })
    }

    /// Installs an order-transform hook.
    pub fn with_transform(mut self, hook: Box<dyn OrderTransform>) -> Self {
        self.transform = Some(hook);
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The persisted state store.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Fetches storefront version information, one line per component.
    pub fn connection_diagnostics(&mut self) -> SyncResult<Vec<String>> {
        let info = self.storefront.platform_info()?;
        let field = |key: &str| {
            info.get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or("undefined")
                .to_string()
        };
        Ok(vec![
            format!("Platform Edition: {}", field("edition")),
            format!("Platform Version: {}", field("version")),
            format!("Sync Extension Version: {}", field("sync_version")),
        ])
    }

    /// Registers this connector as the storefront's fulfillment service.
    pub fn register_fulfillment_service(&mut self, callback_url: &str) -> SyncResult<()> {
        if self
            .storefront
            .set_config("warehouse_api_url", Some(callback_url))?
        {
            self.state
                .put(state_keys::FULFILLMENT_SERVICE_REGISTERED, "1")?;
        }
        Ok(())
    }

    /// Unregisters the fulfillment service.
    pub fn unregister_fulfillment_service(&mut self) -> SyncResult<()> {
        self.storefront.set_config("warehouse_api_url", None)?;
        self.state
            .put(state_keys::FULFILLMENT_SERVICE_REGISTERED, "0")
    }

    /// Whether the fulfillment service has been registered.
    pub fn is_fulfillment_service_registered(&self) -> SyncResult<bool> {
        Ok(self
            .state
            .get(state_keys::FULFILLMENT_SERVICE_REGISTERED)?
            .is_some_and(|entry| entry.value == "1"))
    }

    /// Posts a status comment to a storefront order, best-effort: a
    /// failure here is logged and swallowed so it can never mask the
    /// error that prompted the comment.
    pub(crate) fn comment_best_effort(&mut self, order_ref: &str, status: &str, message: &str) {
        if let Err(err) = self.storefront.order_add_comment(order_ref, status, message) {
            warn!("cannot add comment to order {order_ref}: {err}");
        }
    }
}
