//! ordsync CLI
//!
//! Operator tool for the storefront/warehouse connector.
//!
//! # Commands
//!
//! - `sync-orders` - Run an incremental order sync
//! - `sync-inventory` - Trigger the storefront-side inventory sync
//! - `import-order` - Import one storefront order by increment id
//! - `snapshot` - Print a locked warehouse inventory snapshot
//! - `diagnostics` - Show storefront connection information

mod commands;
mod config;
mod http;
mod state_file;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ordsync_engine::Connector;

use crate::config::ConfigFile;
use crate::http::{HttpRpcTransport, HttpWarehouse};
use crate::state_file::JsonFileStateStore;

/// The connector type the CLI drives.
pub type CliConnector = Connector<HttpRpcTransport, HttpWarehouse, JsonFileStateStore>;

/// ordsync command-line connector tools.
#[derive(Parser)]
#[command(name = "ordsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(global = true, short, long, default_value = "ordsync.json")]
    config: PathBuf,

    /// Path to the JSON state file (cursor and lock)
    #[arg(global = true, short, long, default_value = "ordsync-state.json")]
    state: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an incremental order sync
    SyncOrders {
        /// Start date (YYYY-MM-DD); overrides the persisted cursor
        #[arg(long)]
        since: Option<String>,
    },

    /// Trigger the storefront-side inventory sync
    SyncInventory,

    /// Import one storefront order by increment id
    ImportOrder {
        /// The storefront order increment id
        order_ref: String,
    },

    /// Print a locked warehouse inventory snapshot
    Snapshot {
        /// Restrict the snapshot to one sku
        #[arg(long)]
        sku: Option<String>,
    },

    /// Show storefront connection information
    Diagnostics,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if matches!(cli.command, Commands::Version) {
        println!("ordsync CLI v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let file = ConfigFile::load(&cli.config)?;
    let engine_config = file.engine_config().with_verbose(cli.verbose || file.verbose);

    let transport = HttpRpcTransport::new(&file.storefront.api_url)?;
    let warehouse = HttpWarehouse::new(&file.warehouse.api_url, &file.warehouse.api_key)?;
    let state = JsonFileStateStore::new(&cli.state);
    let mut connector = Connector::new(engine_config, transport, warehouse, state)?;

    match cli.command {
        Commands::SyncOrders { since } => {
            commands::sync_orders::run(&mut connector, since.as_deref())?;
        }
        Commands::SyncInventory => {
            commands::sync_inventory::run(&mut connector)?;
        }
        Commands::ImportOrder { order_ref } => {
            commands::import_order::run(&mut connector, &order_ref)?;
        }
        Commands::Snapshot { sku } => {
            commands::snapshot::run(&mut connector, sku.as_deref())?;
        }
        Commands::Diagnostics => {
            commands::diagnostics::run(&mut connector)?;
        }
        Commands::Version => unreachable!("handled above"),
    }

    Ok(())
}
