//! Configuration for the connector.

use ordsync_protocol::{parse_rules, ShippingRule};

use crate::error::{SyncError, SyncResult};
use crate::lock::LockConfig;

/// Configuration for a connector instance.
///
/// Mirrors the host's configuration surface: API endpoint and
/// credentials, the auto-fulfillment status filter, the shipping-method
/// rule list, and sync tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Storefront API base URL.
    pub api_url: String,
    /// Storefront API user.
    pub api_user: String,
    /// Storefront API key.
    pub api_key: String,
    /// Statuses eligible for automatic fulfillment: empty/absent disables
    /// automatic import, otherwise a single status or a comma-delimited
    /// list. Labels are normalized before use.
    pub auto_fulfill_statuses: Option<String>,
    /// The persisted shipping-method rule list as a JSON array.
    pub shipping_rules_json: Option<String>,
    /// Optional fixed start date (`YYYY-MM-DD`) for manual syncs.
    pub sync_orders_since: Option<String>,
    /// Developer mode: full transform-script output in comments.
    pub verbose: bool,
    /// Remote page size for order scans.
    pub page_size: usize,
    /// How far back a first-ever sync looks, in days.
    pub lookback_days: i64,
    /// Import-lock tunables.
    pub lock: LockConfig,
}

impl EngineConfig {
    /// Creates a configuration with production defaults.
    pub fn new(
        api_url: impl Into<String>,
        api_user: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_user: api_user.into(),
            api_key: api_key.into(),
            auto_fulfill_statuses: None,
            shipping_rules_json: None,
            sync_orders_since: None,
            verbose: false,
            page_size: 100,
            lookback_days: 5,
            lock: LockConfig::new(),
        }
    }

    /// Sets the auto-fulfillment status filter.
    pub fn with_auto_fulfill(mut self, statuses: impl Into<String>) -> Self {
        self.auto_fulfill_statuses = Some(statuses.into());
        self
    }

    /// Sets the shipping-method rule list (JSON array).
    pub fn with_shipping_rules(mut self, json: impl Into<String>) -> Self {
        self.shipping_rules_json = Some(json.into());
        self
    }

    /// Sets the manual-sync start date.
    pub fn with_sync_orders_since(mut self, date: impl Into<String>) -> Self {
        self.sync_orders_since = Some(date.into());
        self
    }

    /// Enables developer mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the remote page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the lock tunables.
    pub fn with_lock(mut self, lock: LockConfig) -> Self {
        self.lock = lock;
        self
    }

    /// Returns true if the connection settings are all present.
    pub fn has_connection_config(&self) -> bool {
        !self.api_url.is_empty() && !self.api_user.is_empty() && !self.api_key.is_empty()
    }

    /// Parses the configured shipping rules, preserving their order.
    pub fn shipping_rules(&self) -> SyncResult<Vec<ShippingRule>> {
        match self.shipping_rules_json.as_deref() {
            None | Some("") => Ok(Vec::new()),
            Some(json) => parse_rules(json)
                .map_err(|e| SyncError::Configuration(format!("invalid shipping rules: {e}"))),
        }
    }

    /// The normalized status filter: comma-split, trimmed, case-folded,
    /// spaces mapped to underscores ("Ready To Ship" → "ready_to_ship").
    /// An empty result disables automatic import.
    pub fn status_filter(&self) -> Vec<String> {
        self.auto_fulfill_statuses
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase().replace(' ', "_"))
            .collect()
    }
}
