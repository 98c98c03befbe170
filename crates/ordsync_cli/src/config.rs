//! CLI configuration file loading.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use ordsync_engine::EngineConfig;

/// Endpoint settings for one remote platform.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the platform's RPC endpoint.
    pub api_url: String,
    /// API user (storefront) — unused for the warehouse.
    #[serde(default)]
    pub api_user: String,
    /// API key.
    pub api_key: String,
}

/// The on-disk configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Storefront endpoint and credentials.
    pub storefront: EndpointConfig,
    /// Warehouse endpoint and credentials.
    pub warehouse: EndpointConfig,
    /// Statuses eligible for automatic fulfillment.
    #[serde(default)]
    pub auto_fulfill_statuses: Option<String>,
    /// Ordered shipping-method rule list.
    #[serde(default)]
    pub shipping_rules: Option<Value>,
    /// Fixed start date (`YYYY-MM-DD`) for manual syncs.
    #[serde(default)]
    pub sync_orders_since: Option<String>,
    /// Developer mode.
    #[serde(default)]
    pub verbose: bool,
}

impl ConfigFile {
    /// Loads and parses the configuration file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read config file {}: {e}", path.display()))?;
        let config: ConfigFile = serde_json::from_str(&raw)
            .map_err(|e| format!("cannot parse config file {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Builds the engine configuration from this file.
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::new(
            &self.storefront.api_url,
            &self.storefront.api_user,
            &self.storefront.api_key,
        )
        .with_verbose(self.verbose);
        if let Some(statuses) = &self.auto_fulfill_statuses {
            config = config.with_auto_fulfill(statuses.clone());
        }
        if let Some(rules) = &self.shipping_rules {
            config = config.with_shipping_rules(rules.to_string());
        }
        if let Some(since) = &self.sync_orders_since {
            config = config.with_sync_orders_since(since.clone());
        }
        config
    }
}
