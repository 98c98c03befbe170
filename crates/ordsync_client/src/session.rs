//! Session lifecycle and typed storefront API wrappers.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use ordsync_protocol::{OrderInfo, OrderSummary};

use crate::error::{ClientError, ClientResult};
use crate::transport::RpcTransport;

/// Storefront API credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// API user name.
    pub username: String,
    /// API key.
    pub api_key: String,
}

impl Credentials {
    /// Creates credentials, rejecting empty values up front.
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> ClientResult<Self> {
        let username = username.into();
        let api_key = api_key.into();
        if username.is_empty() || api_key.is_empty() {
            return Err(ClientError::Config(
                "api username and key are required".into(),
            ));
        }
        Ok(Self { username, api_key })
    }
}

/// Response of the storefront-side atomic inventory sync.
#[derive(Debug, Clone, Deserialize)]
pub struct InventorySyncResponse {
    /// Whether the storefront completed the sync.
    pub success: bool,
    /// Human-readable summary (counts of unchanged/updated/errored skus).
    #[serde(default)]
    pub message: String,
}

/// A session-authenticated storefront client.
///
/// The session token is created lazily on the first call and renewed at
/// most once per logical call when the remote reports it expired. The
/// token lives only as long as this value; dropping the client attempts a
/// best-effort logout.
pub struct SessionClient<T: RpcTransport> {
    transport: T,
    credentials: Credentials,
    session: Option<String>,
}

impl<T: RpcTransport> SessionClient<T> {
    /// Creates a client; no network traffic happens until the first call.
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            session: None,
        }
    }

    /// Invokes a raw storefront method.
    ///
    /// A session-expired fault discards the session and retries exactly
    /// once with a fresh login; any other fault is surfaced as
    /// [`ClientError::Fault`].
    pub fn call(&mut self, method: &str, params: Value) -> ClientResult<Value> {
        self.call_inner(method, params, true)
    }

    fn call_inner(&mut self, method: &str, params: Value, can_retry: bool) -> ClientResult<Value> {
        let session = self.ensure_session()?.to_string();
        match self.transport.call(&session, method, params.clone()) {
            Ok(result) => Ok(result),
            Err(fault) if fault.is_session_expired() && can_retry => {
                debug!(method, "session expired, renewing once");
                self.session = None;
                self.call_inner(method, params, false)
            }
            Err(fault) => Err(ClientError::Fault {
                code: fault.code,
                message: fault.message,
            }),
        }
    }

    /// Invokes a method and decodes the result into `Res`.
    pub fn call_typed<Res: DeserializeOwned>(
        &mut self,
        method: &str,
        params: Value,
    ) -> ClientResult<Res> {
        let result = self.call(method, params)?;
        serde_json::from_value(result).map_err(|e| ClientError::Decode(format!("{method}: {e}")))
    }

    fn ensure_session(&mut self) -> ClientResult<&str> {
        if self.session.is_none() {
            let token = self
                .transport
                .login(&self.credentials.username, &self.credentials.api_key)
                .map_err(|fault| ClientError::Auth(fault.message))?;
            self.session = Some(token);
        }
        Ok(self.session.as_deref().unwrap_or_default())
    }

    // ----- typed storefront surface -----

    /// Fetches full order details by increment id.
    pub fn order_info(&mut self, increment_id: &str) -> ClientResult<OrderInfo> {
        self.call_typed("order.info", json!([increment_id]))
    }

    /// Lists orders matching the given filter document.
    pub fn order_list(&mut self, filters: Value) -> ClientResult<Vec<OrderSummary>> {
        self.call_typed("order.list", json!([filters]))
    }

    /// Adds a status comment to an order.
    pub fn order_add_comment(
        &mut self,
        increment_id: &str,
        status: &str,
        comment: &str,
    ) -> ClientResult<bool> {
        self.call_typed("order.addComment", json!([increment_id, status, comment]))
    }

    /// Adjusts the stock level of a sku by a signed delta.
    pub fn stock_adjust(&mut self, sku: &str, delta: f64) -> ClientResult<bool> {
        self.call_typed("stock_item.adjust", json!([sku, delta]))
    }

    /// Creates a storefront shipment with tracking from a warehouse
    /// shipment payload; returns the new shipment increment id.
    pub fn shipment_create_with_tracking(
        &mut self,
        order_increment_id: &str,
        payload: Value,
    ) -> ClientResult<String> {
        self.call_typed(
            "shipment.createWithTracking",
            json!([order_increment_id, payload]),
        )
    }

    /// Adds tracking numbers to an existing storefront shipment.
    pub fn shipment_add_track(
        &mut self,
        shipment_increment_id: &str,
        payload: Value,
    ) -> ClientResult<bool> {
        self.call_typed("shipment.addTrack", json!([shipment_increment_id, payload]))
    }

    /// Reverts the shipment state of an order that will not ship as
    /// recorded.
    pub fn shipment_revert(&mut self, order_increment_id: &str) -> ClientResult<bool> {
        self.call_typed("shipment.revert", json!([order_increment_id]))
    }

    /// Fetches platform version information for diagnostics.
    pub fn platform_info(&mut self) -> ClientResult<Value> {
        self.call("platform.info", json!([]))
    }

    /// Sets a storefront-side sync configuration value; `None` clears it.
    pub fn set_config(&mut self, key: &str, value: Option<&str>) -> ClientResult<bool> {
        self.call_typed("sync.set_config", json!([key, value]))
    }

    /// Triggers the storefront-side atomic inventory sync.
    pub fn trigger_inventory_sync(&mut self) -> ClientResult<InventorySyncResponse> {
        self.call_typed("sync.inventory", json!([]))
    }
}

impl<T: RpcTransport> Drop for SessionClient<T> {
    fn drop(&mut self) {
        // Already expired sessions fail to log out; that is fine.
        if let Some(session) = self.session.take() {
            if let Err(fault) = self.transport.logout(&session) {
                debug!(code = fault.code, "logout failed: {}", fault.message);
            }
        }
    }
}
