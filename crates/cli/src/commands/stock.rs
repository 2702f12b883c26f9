//! Stock inspection and mutation commands.
//!
//! Mutation commands load the catalog, apply one write through
//! [`StockService`], save the file, and then append an audit entry. The
//! audit line is written only after a successful save so the trail never
//! records a write that is not on disk.
//!
//! # Usage
//!
//! ```bash
//! # Availability breakdown for a product
//! narra-cli stock show -p 1
//!
//! # Overwrite totals for one warehouse (recorded as a correction)
//! narra-cli stock set -p 1 --variant NSB-WAL-Q -w Lorenzo -q 10 -r 2
//!
//! # Receive new stock
//! narra-cli stock restock -p 1 --variant NSB-WAL-Q -w Oroquieta -q 5 -n "July delivery"
//!
//! # Reserve and release against pending orders
//! narra-cli stock reserve -p 1 --variant NSB-WAL-Q -q 3
//! narra-cli stock release -p 1 --variant NSB-WAL-Q -q 1
//!
//! # Batch ledger for a unit, oldest first
//! narra-cli stock batches -p 1 --variant NSB-WAL-Q
//! ```
//!
//! # Environment Variables
//!
//! - `NARRA_CATALOG` - Path to the catalog JSON file
//! - `NARRA_AUDIT_LOG` - Audit trail destination (default: narra-audit.jsonl)
//! - `NARRA_ACTOR` - Operator name stamped on audit entries (default: admin)

use tracing::info;

use narra_home_core::ProductId;
use narra_home_inventory::audit::{AuditEntry, AuditSink};
use narra_home_inventory::catalog::Catalog;
use narra_home_inventory::fifo;
use narra_home_inventory::mutation::{self, StockMutation, StockService, StockTarget};
use narra_home_inventory::resolver;
use narra_home_inventory::store::{CatalogStore, JsonFileStore};

use crate::audit_log::JsonlAuditLog;
use crate::config::CliConfig;

use super::CommandError;

/// Show the availability breakdown for a product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the product does
/// not exist.
pub fn show(product_id: i32) -> Result<(), CommandError> {
    let (_config, store) = super::open_store()?;
    let catalog = store.load()?;
    let product = super::lookup(&catalog, product_id)?;

    let flag = if product.active { "" } else { " [inactive]" };
    info!("{} (#{}){} - {}", product.name, product.id, flag, product.category);
    info!("Total available: {}", resolver::total_stock(product));

    let units = resolver::unit_stocks(product);
    for (unit, breakdown) in units.iter().zip(resolver::availability(product)) {
        let flag = if breakdown.active { "" } else { " [inactive]" };
        info!("{}{}: {} available", breakdown.label, flag, breakdown.available);
        for site in &breakdown.sites {
            info!(
                "  {}: {} on hand, {} reserved, {} available",
                site.warehouse, site.quantity, site.reserved, site.available
            );
        }
        match fifo::most_recent_batch(unit.stocks) {
            Some(latest) => info!(
                "  latest receipt: batch {} at {} on {}",
                latest.batch_id,
                latest.warehouse,
                latest.received_at.format("%Y-%m-%d")
            ),
            None => info!("  no recorded stock movements"),
        }
    }
    Ok(())
}

/// Overwrite quantity and reserved for one warehouse.
///
/// The write is recorded in the ledger as a correction checkpoint.
///
/// # Errors
///
/// Returns an error on bad totals, an unknown product or unit, or a
/// failed save.
pub fn set(
    product_id: i32,
    warehouse: &str,
    quantity: i64,
    reserved: i64,
    variant: Option<String>,
    size: Option<String>,
) -> Result<(), CommandError> {
    let (config, store) = super::open_store()?;
    let warehouse = super::parse_warehouse(warehouse)?;
    let target = super::build_target(variant, size)?;
    let mut catalog = store.load()?;

    let id = ProductId::new(product_id);
    let mut service = StockService::new(&mut catalog);
    let mutation = match &target {
        StockTarget::Variant(variant_id) => {
            service.update_variant_stock(id, variant_id, warehouse, quantity, reserved)?
        }
        StockTarget::Size(label) => {
            service.update_warehouse_stock(id, warehouse, quantity, reserved, Some(label.as_str()))?
        }
        StockTarget::Product => {
            service.update_warehouse_stock(id, warehouse, quantity, reserved, None)?
        }
    };

    finish_mutation(&config, &store, &catalog, &mutation)
}

/// Receive new stock into a warehouse as a fresh batch.
///
/// # Errors
///
/// Returns an error on a non-positive quantity, an unknown product or
/// unit, or a failed save.
pub fn restock(
    product_id: i32,
    warehouse: &str,
    quantity: i64,
    variant: Option<String>,
    size: Option<String>,
    notes: Option<String>,
) -> Result<(), CommandError> {
    let (config, store) = super::open_store()?;
    let warehouse = super::parse_warehouse(warehouse)?;
    let target = super::build_target(variant, size)?;
    let mut catalog = store.load()?;

    let mut service = StockService::new(&mut catalog);
    let mutation =
        service.restock(ProductId::new(product_id), &target, warehouse, quantity, notes)?;

    finish_mutation(&config, &store, &catalog, &mutation)
}

/// Reserve units against pending orders, oldest stock first.
///
/// # Errors
///
/// Returns an error when fewer than `quantity` units are available across
/// all warehouses, or on a failed save.
pub fn reserve(
    product_id: i32,
    quantity: i64,
    variant: Option<String>,
    size: Option<String>,
) -> Result<(), CommandError> {
    let (config, store) = super::open_store()?;
    let target = super::build_target(variant, size)?;
    let mut catalog = store.load()?;

    let mut service = StockService::new(&mut catalog);
    let mutation = service.reserve(ProductId::new(product_id), &target, quantity)?;

    finish_mutation(&config, &store, &catalog, &mutation)
}

/// Release previously reserved units.
///
/// # Errors
///
/// Returns an error when fewer than `quantity` units are reserved, or on
/// a failed save.
pub fn release(
    product_id: i32,
    quantity: i64,
    variant: Option<String>,
    size: Option<String>,
) -> Result<(), CommandError> {
    let (config, store) = super::open_store()?;
    let target = super::build_target(variant, size)?;
    let mut catalog = store.load()?;

    let mut service = StockService::new(&mut catalog);
    let mutation = service.release(ProductId::new(product_id), &target, quantity)?;

    finish_mutation(&config, &store, &catalog, &mutation)
}

/// List the batch ledger for one unit, oldest first across warehouses.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the unit does not
/// exist.
pub fn batches(
    product_id: i32,
    variant: Option<String>,
    size: Option<String>,
) -> Result<(), CommandError> {
    let (_config, store) = super::open_store()?;
    let catalog = store.load()?;
    let product = super::lookup(&catalog, product_id)?;
    let target = super::build_target(variant, size)?;
    let stocks = mutation::target_stocks(product, &target)?;

    let entries = fifo::list_batches(stocks);
    if entries.is_empty() {
        info!("No batches recorded for {target} on {}", product.name);
        return Ok(());
    }

    info!("Batches for {target} on {}, oldest first:", product.name);
    for entry in entries {
        let superseded = if entry.superseded { " [superseded]" } else { "" };
        let notes = entry
            .batch
            .notes
            .as_deref()
            .map(|n| format!(" - {n}"))
            .unwrap_or_default();
        info!(
            "  {} {} {} at {}: {} on hand, {} reserved{}{}",
            entry.batch.received_at.format("%Y-%m-%d"),
            entry.batch.id,
            entry.batch.origin,
            entry.warehouse,
            entry.batch.quantity,
            entry.batch.reserved,
            superseded,
            notes,
        );
    }
    Ok(())
}

/// Save the catalog, then append the audit entry.
///
/// Ordering matters here. A failed save leaves the audit trail untouched;
/// a failed audit write after a successful save surfaces as
/// [`CommandError::Audit`] so the operator knows the trail is behind the
/// file.
fn finish_mutation(
    config: &CliConfig,
    store: &JsonFileStore,
    catalog: &Catalog,
    mutation: &StockMutation,
) -> Result<(), CommandError> {
    store.save(catalog)?;

    let mut audit = JsonlAuditLog::new(&config.audit_log_path);
    audit.record(&AuditEntry::from_mutation(config.actor.clone(), mutation))?;

    info!(
        catalog = %config.catalog_path.display(),
        "Saved and recorded in the audit trail"
    );
    Ok(())
}
