//! Blocking HTTP adapters for the two remote platforms.
//!
//! Both platforms speak JSON-RPC-style envelopes over POST:
//! `{"method": ..., "params": ..., "session": ...}` in,
//! `{"result": ...}` or `{"fault": {"code": ..., "message": ...}}` out.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use ordsync_client::{RpcFault, RpcTransport};
use ordsync_engine::{InventoryRow, SyncError, SyncResult, WarehouseApi, WarehouseOrder};
use ordsync_protocol::OrderDraft;

/// Fault code used for transport-level failures (network, bad JSON) that
/// never reached the remote dispatcher.
const TRANSPORT_FAULT: i32 = -1;

fn http_client() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(90))
        .user_agent(concat!("ordsync/", env!("CARGO_PKG_VERSION")))
        .build()
}

fn post_envelope(
    client: &reqwest::blocking::Client,
    url: &str,
    body: Value,
) -> Result<Value, RpcFault> {
    let response = client
        .post(url)
        .json(&body)
        .send()
        .map_err(|e| RpcFault::new(TRANSPORT_FAULT, e.to_string()))?;
    let envelope: Value = response
        .json()
        .map_err(|e| RpcFault::new(TRANSPORT_FAULT, format!("bad response body: {e}")))?;

    if let Some(fault) = envelope.get("fault") {
        let code = fault.get("code").and_then(Value::as_i64).unwrap_or(0) as i32;
        let message = fault
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown fault")
            .to_string();
        debug!(code, "storefront fault: {message}");
        return Err(RpcFault::new(code, message));
    }

    Ok(envelope.get("result").cloned().unwrap_or(Value::Null))
}

/// Storefront transport over HTTP.
pub struct HttpRpcTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRpcTransport {
    /// Creates a transport for the given endpoint.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
        })
    }
}

impl RpcTransport for HttpRpcTransport {
    fn login(&self, username: &str, api_key: &str) -> Result<String, RpcFault> {
        let result = post_envelope(
            &self.client,
            &self.base_url,
            json!({"method": "login", "params": [username, api_key]}),
        )?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RpcFault::new(TRANSPORT_FAULT, "login did not return a session token"))
    }

    fn call(&self, session: &str, method: &str, params: Value) -> Result<Value, RpcFault> {
        post_envelope(
            &self.client,
            &self.base_url,
            json!({"method": method, "params": params, "session": session}),
        )
    }

    fn logout(&self, session: &str) -> Result<bool, RpcFault> {
        let result = post_envelope(
            &self.client,
            &self.base_url,
            json!({"method": "logout", "params": [], "session": session}),
        )?;
        Ok(result.as_bool().unwrap_or(false))
    }
}

/// Warehouse API over HTTP with key authentication.
pub struct HttpWarehouse {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl HttpWarehouse {
    /// Creates a warehouse client for the given endpoint.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn call(&self, method: &str, params: Value) -> SyncResult<Value> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&json!({"method": method, "params": params}))
            .send()
            .map_err(|e| SyncError::Warehouse(e.to_string()))?;
        let envelope: Value = response
            .json()
            .map_err(|e| SyncError::Warehouse(format!("bad response body: {e}")))?;

        if let Some(error) = envelope.get("error").and_then(Value::as_str) {
            return Err(SyncError::Warehouse(error.to_string()));
        }
        Ok(envelope.get("result").cloned().unwrap_or(Value::Null))
    }

    fn decode<T: serde::de::DeserializeOwned>(method: &str, value: Value) -> SyncResult<T> {
        serde_json::from_value(value)
            .map_err(|e| SyncError::Warehouse(format!("{method}: unexpected response: {e}")))
    }
}

#[derive(Debug, serde::Deserialize)]
struct WireOrder {
    unique_id: String,
    order_ref: String,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<WireOrder> for WarehouseOrder {
    fn from(order: WireOrder) -> Self {
        WarehouseOrder {
            unique_id: order.unique_id,
            order_ref: order.order_ref,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct WireInventoryRow {
    sku: String,
    qty_available: f64,
}

impl WarehouseApi for HttpWarehouse {
    fn order_search(&self, order_ref: &str) -> SyncResult<Vec<WarehouseOrder>> {
        let result = self.call("order.search", json!([{"order_ref": order_ref}]))?;
        let orders: Vec<WireOrder> = Self::decode("order.search", result)?;
        Ok(orders.into_iter().map(Into::into).collect())
    }

    fn order_create(&self, draft: &OrderDraft) -> SyncResult<WarehouseOrder> {
        let params = json!([draft.store, draft.items, draft.address, draft.options]);
        let result = self.call("order.create", params)?;
        Ok(Self::decode::<WireOrder>("order.create", result)?.into())
    }

    fn product_info(&self, sku: &str) -> SyncResult<Option<Value>> {
        match self.call("product.info", json!([sku])) {
            Ok(Value::Null) => Ok(None),
            Ok(product) => Ok(Some(product)),
            Err(err) => Err(err),
        }
    }

    fn inventory_list(&self, sku_filter: Option<&str>) -> SyncResult<Vec<InventoryRow>> {
        let result = self.call("inventory.list", json!([sku_filter]))?;
        let rows: Vec<WireInventoryRow> = Self::decode("inventory.list", result)?;
        Ok(rows
            .into_iter()
            .map(|row| InventoryRow {
                sku: row.sku,
                qty_available: row.qty_available,
            })
            .collect())
    }

    fn shipment_update(&self, shipment_id: &str, payload: Value) -> SyncResult<()> {
        self.call("shipment.update", json!([shipment_id, payload]))?;
        Ok(())
    }
}
