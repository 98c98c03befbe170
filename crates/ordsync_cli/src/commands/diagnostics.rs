//! Diagnostics command implementation.

use crate::CliConnector;

/// Prints storefront connection diagnostics.
pub fn run(connector: &mut CliConnector) -> Result<(), Box<dyn std::error::Error>> {
    if !connector.config().has_connection_config() {
        return Err("connection is not configured".into());
    }
    for line in connector.connection_diagnostics()? {
        println!("{line}");
    }
    Ok(())
}
