//! Import-order command implementation.

use crate::CliConnector;

/// Imports a single storefront order by increment id.
pub fn run(connector: &mut CliConnector, order_ref: &str) -> Result<(), Box<dyn std::error::Error>> {
    connector.import_order(order_ref)?;
    println!("Order {order_ref} processed");
    Ok(())
}
