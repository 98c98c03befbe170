//! Sync-orders command implementation.

use crate::CliConnector;

/// Runs an incremental order sync and prints the outcome.
pub fn run(
    connector: &mut CliConnector,
    since: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = connector.sync_orders(since)?;

    if let Some((from, to)) = &report.window {
        println!("Window: {from} .. {to}");
    }
    println!("{}", report.summary());

    if report.failed > 0 {
        return Err(format!("{} order(s) failed to import", report.failed).into());
    }
    Ok(())
}
