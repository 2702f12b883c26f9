//! Narra Home CLI - Catalog management and warehouse stock tools.
//!
//! # Usage
//!
//! ```bash
//! # Write a starter catalog to the configured path
//! narra-cli catalog init
//!
//! # Verify stock record invariants
//! narra-cli catalog check
//!
//! # Availability breakdown for a product
//! narra-cli stock show -p 1
//!
//! # Receive five units into Oroquieta
//! narra-cli stock restock -p 1 --variant NSB-WAL-Q -w Oroquieta -q 5
//!
//! # Reserve three units, oldest stock first
//! narra-cli stock reserve -p 1 --variant NSB-WAL-Q -q 3
//! ```
//!
//! # Commands
//!
//! - `catalog init` - Write a starter catalog file
//! - `catalog check` - Verify stock record invariants
//! - `stock show` - Availability breakdown per unit and warehouse
//! - `stock set` - Overwrite totals for one warehouse (recorded as a correction)
//! - `stock restock` - Receive new stock as a fresh batch
//! - `stock reserve` - Reserve units against pending orders
//! - `stock release` - Release previously reserved units
//! - `stock batches` - List the batch ledger, oldest first

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod audit_log;
mod commands;
mod config;

#[derive(Parser)]
#[command(name = "narra-cli")]
#[command(author, version, about = "Narra Home CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the catalog file
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect and mutate warehouse stock
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Write a starter catalog to the configured path
    Init {
        /// Overwrite an existing catalog file
        #[arg(long)]
        force: bool,
    },
    /// Verify every stock record in the catalog
    Check,
}

#[derive(Subcommand)]
enum StockAction {
    /// Show the availability breakdown for a product
    Show {
        /// Product ID
        #[arg(short, long)]
        product: i32,
    },
    /// Overwrite totals for one warehouse (recorded as a correction)
    Set {
        /// Product ID
        #[arg(short, long)]
        product: i32,

        /// Warehouse site (Lorenzo or Oroquieta)
        #[arg(short, long)]
        warehouse: String,

        /// New on-hand quantity
        #[arg(short, long)]
        quantity: i64,

        /// New reserved count
        #[arg(short, long)]
        reserved: i64,

        /// Variant ID to target
        #[arg(long)]
        variant: Option<String>,

        /// Size label to target (legacy size-option products)
        #[arg(long)]
        size: Option<String>,
    },
    /// Receive new stock into a warehouse
    Restock {
        /// Product ID
        #[arg(short, long)]
        product: i32,

        /// Warehouse site (Lorenzo or Oroquieta)
        #[arg(short, long)]
        warehouse: String,

        /// Units received
        #[arg(short, long)]
        quantity: i64,

        /// Variant ID to target
        #[arg(long)]
        variant: Option<String>,

        /// Size label to target (legacy size-option products)
        #[arg(long)]
        size: Option<String>,

        /// Free-form note stored on the batch
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Reserve units against pending orders (oldest stock first)
    Reserve {
        /// Product ID
        #[arg(short, long)]
        product: i32,

        /// Units to reserve
        #[arg(short, long)]
        quantity: i64,

        /// Variant ID to target
        #[arg(long)]
        variant: Option<String>,

        /// Size label to target (legacy size-option products)
        #[arg(long)]
        size: Option<String>,
    },
    /// Release previously reserved units
    Release {
        /// Product ID
        #[arg(short, long)]
        product: i32,

        /// Units to release
        #[arg(short, long)]
        quantity: i64,

        /// Variant ID to target
        #[arg(long)]
        variant: Option<String>,

        /// Size label to target (legacy size-option products)
        #[arg(long)]
        size: Option<String>,
    },
    /// List the batch ledger for a unit, oldest first
    Batches {
        /// Product ID
        #[arg(short, long)]
        product: i32,

        /// Variant ID to target
        #[arg(long)]
        variant: Option<String>,

        /// Size label to target (legacy size-option products)
        #[arg(long)]
        size: Option<String>,
    },
}

fn main() {
    // Initialize tracing; RUST_LOG overrides the default info level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Init { force } => commands::catalog::init(force)?,
            CatalogAction::Check => commands::catalog::check()?,
        },
        Commands::Stock { action } => match action {
            StockAction::Show { product } => commands::stock::show(product)?,
            StockAction::Set {
                product,
                warehouse,
                quantity,
                reserved,
                variant,
                size,
            } => commands::stock::set(product, &warehouse, quantity, reserved, variant, size)?,
            StockAction::Restock {
                product,
                warehouse,
                quantity,
                variant,
                size,
                notes,
            } => commands::stock::restock(product, &warehouse, quantity, variant, size, notes)?,
            StockAction::Reserve {
                product,
                quantity,
                variant,
                size,
            } => commands::stock::reserve(product, quantity, variant, size)?,
            StockAction::Release {
                product,
                quantity,
                variant,
                size,
            } => commands::stock::release(product, quantity, variant, size)?,
            StockAction::Batches {
                product,
                variant,
                size,
            } => commands::stock::batches(product, variant, size)?,
        },
    }
    Ok(())
}
