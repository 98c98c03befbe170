//! Snapshot command implementation.

use crate::CliConnector;

/// Prints a locked warehouse inventory snapshot.
pub fn run(
    connector: &mut CliConnector,
    sku: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = connector.inventory_snapshot(sku)?;
    if snapshot.is_empty() {
        println!("No inventory rows");
        return Ok(());
    }
    for (sku, qty) in &snapshot {
        println!("{sku}\t{qty}");
    }
    Ok(())
}
