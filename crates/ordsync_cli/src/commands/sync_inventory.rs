//! Sync-inventory command implementation.

use crate::CliConnector;

/// Triggers the storefront-side inventory sync and prints its summary.
pub fn run(connector: &mut CliConnector) -> Result<(), Box<dyn std::error::Error>> {
    let summary = connector.sync_inventory()?;
    println!("{summary}");
    Ok(())
}
