//! Command implementations for the Narra Home CLI.

pub mod catalog;
pub mod stock;

use narra_home_core::{ProductId, VariantId, Warehouse};
use narra_home_inventory::StockError;
use narra_home_inventory::audit::AuditError;
use narra_home_inventory::catalog::Catalog;
use narra_home_inventory::models::Product;
use narra_home_inventory::mutation::StockTarget;
use narra_home_inventory::store::{JsonFileStore, StoreError};
use thiserror::Error;

use crate::config::{CliConfig, ConfigError};

/// Errors shared by every CLI command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Store(#[from] StoreError),

    #[error("Stock operation failed: {0}")]
    Stock(#[from] StockError),

    /// The catalog write succeeded but the audit line did not. The operator
    /// has to reconcile the trail by hand, so this surfaces as a failure.
    #[error("Mutation saved, but writing the audit entry failed: {0}")]
    Audit(#[from] AuditError),

    #[error("Catalog already exists at {path}; pass --force to overwrite")]
    CatalogExists {
        /// Path that refused the write.
        path: String,
    },

    #[error("Found {0} stock record(s) violating invariants")]
    Violations(usize),

    #[error("{0}")]
    InvalidArgument(String),
}

/// Load configuration and point a store at the configured catalog file.
pub(crate) fn open_store() -> Result<(CliConfig, JsonFileStore), CommandError> {
    let config = CliConfig::from_env()?;
    let store = JsonFileStore::new(&config.catalog_path);
    Ok((config, store))
}

/// Resolve a product or fail with the ID in the message.
pub(crate) fn lookup(catalog: &Catalog, product_id: i32) -> Result<&Product, CommandError> {
    let id = ProductId::new(product_id);
    catalog
        .product(id)
        .ok_or_else(|| CommandError::Stock(StockError::NotFound(format!("product {id}"))))
}

/// Turn the `--variant` / `--size` flag pair into a stock target.
///
/// # Errors
///
/// Rejects the call when both flags are given; a unit is addressed by one
/// or the other, never both.
pub(crate) fn build_target(
    variant: Option<String>,
    size: Option<String>,
) -> Result<StockTarget, CommandError> {
    match (variant, size) {
        (Some(_), Some(_)) => Err(CommandError::InvalidArgument(
            "pass either --variant or --size, not both".to_string(),
        )),
        (Some(id), None) => Ok(StockTarget::Variant(VariantId::new(id))),
        (None, Some(label)) => Ok(StockTarget::Size(label)),
        (None, None) => Ok(StockTarget::Product),
    }
}

/// Parse a warehouse name given on the command line.
pub(crate) fn parse_warehouse(name: &str) -> Result<Warehouse, CommandError> {
    name.parse::<Warehouse>()
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))
}
