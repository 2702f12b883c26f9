//! Catalog file management commands.
//!
//! # Usage
//!
//! ```bash
//! # Write a starter catalog to the configured path
//! narra-cli catalog init
//!
//! # Overwrite an existing file
//! narra-cli catalog init --force
//!
//! # Verify every stock record in the catalog
//! narra-cli catalog check
//! ```
//!
//! # Environment Variables
//!
//! - `NARRA_CATALOG` - Path to the catalog JSON file

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::{error, info};

use narra_home_core::{ProductId, VariantId, Warehouse};
use narra_home_inventory::StockError;
use narra_home_inventory::catalog::Catalog;
use narra_home_inventory::models::{Product, SizeOption, StockModel, Variant, WarehouseStock};
use narra_home_inventory::mutation::{StockService, StockTarget};
use narra_home_inventory::resolver;
use narra_home_inventory::store::CatalogStore;

use super::CommandError;

/// Write a starter catalog to the configured path.
///
/// Refuses to touch an existing file unless `force` is set.
///
/// # Errors
///
/// Returns an error if the file exists without `--force`, or if the
/// catalog cannot be written.
pub fn init(force: bool) -> Result<(), CommandError> {
    let (config, store) = super::open_store()?;

    if config.catalog_path.exists() && !force {
        return Err(CommandError::CatalogExists {
            path: config.catalog_path.display().to_string(),
        });
    }

    let catalog = seed_catalog()?;
    store.save(&catalog)?;

    info!(
        path = %config.catalog_path.display(),
        products = catalog.len(),
        "Catalog written"
    );
    Ok(())
}

/// Verify every stock record in the configured catalog.
///
/// Walks each product's sellable units and checks batch and flat totals
/// against the consistency rules. Violations are reported, never repaired.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or any record fails
/// verification.
pub fn check() -> Result<(), CommandError> {
    let (_config, store) = super::open_store()?;
    let catalog = store.load()?;

    let mut violations = 0usize;
    for product in &catalog.products {
        for unit in resolver::unit_stocks(product) {
            for ws in unit.stocks {
                if let Err(err) = ws.verify() {
                    violations += 1;
                    error!(product = %product.id, unit = %unit.label, "{err}");
                }
            }
        }
    }

    if violations > 0 {
        return Err(CommandError::Violations(violations));
    }

    info!(products = catalog.len(), "Catalog check passed");
    Ok(())
}

/// Build the starter catalog.
///
/// One product per stock shape, with received stock flowing through the
/// ledger so the file starts with real batch history. The chair keeps
/// pre-ledger flat stock on purpose; its first restock will checkpoint
/// the carried totals.
fn seed_catalog() -> Result<Catalog, StockError> {
    let bed = ProductId::new(1);
    let mattress = ProductId::new(2);

    let mut chair_pool = WarehouseStock::new(Warehouse::Lorenzo);
    chair_pool.quantity = 4;
    chair_pool.reserved = 1;
    chair_pool.updated_at = Some(
        Utc.with_ymd_and_hms(2024, 11, 20, 8, 0, 0)
            .single()
            .expect("valid seed timestamp"),
    );

    let mut catalog = Catalog::new(vec![
        Product::new(
            bed,
            "Narra Sleigh Bed",
            "Beds",
            StockModel::Variants(vec![
                seed_variant("NSB-WAL-Q", "Queen", "Walnut", Decimal::new(42_500, 0)),
                seed_variant("NSB-WAL-K", "King", "Walnut", Decimal::new(48_900, 0)),
                discontinued(seed_variant(
                    "NSB-MAH-Q",
                    "Queen",
                    "Mahogany",
                    Decimal::new(44_200, 0),
                )),
            ]),
        ),
        Product::new(
            mattress,
            "Banig Roll-Up Mattress",
            "Mattresses",
            StockModel::LegacySizes(vec![
                SizeOption {
                    size: "Queen".to_string(),
                    price: Some(Decimal::new(18_750, 0)),
                    warehouse_stock: Vec::new(),
                },
                SizeOption {
                    size: "King".to_string(),
                    price: Some(Decimal::new(21_500, 0)),
                    warehouse_stock: Vec::new(),
                },
            ]),
        ),
        Product::new(
            ProductId::new(3),
            "Rattan Lounge Chair",
            "Seating",
            StockModel::Flat(vec![chair_pool]),
        ),
    ]);

    let mut service = StockService::new(&mut catalog);

    let queen = StockTarget::Variant(VariantId::new("NSB-WAL-Q"));
    let king = StockTarget::Variant(VariantId::new("NSB-WAL-K"));
    let mahogany = StockTarget::Variant(VariantId::new("NSB-MAH-Q"));

    service.restock(
        bed,
        &queen,
        Warehouse::Lorenzo,
        8,
        Some("initial receiving".to_string()),
    )?;
    service.restock(bed, &queen, Warehouse::Oroquieta, 4, None)?;
    service.restock(
        bed,
        &king,
        Warehouse::Lorenzo,
        5,
        Some("initial receiving".to_string()),
    )?;
    service.restock(bed, &mahogany, Warehouse::Lorenzo, 3, None)?;

    service.update_warehouse_stock(mattress, Warehouse::Lorenzo, 12, 0, Some("Queen"))?;
    service.update_warehouse_stock(mattress, Warehouse::Oroquieta, 6, 1, Some("King"))?;

    Ok(catalog)
}

fn seed_variant(id: &str, size: &str, color: &str, price: Decimal) -> Variant {
    Variant {
        id: VariantId::new(id),
        size: Some(size.to_string()),
        color: color.to_string(),
        price,
        active: true,
        warehouse_stock: Vec::new(),
    }
}

fn discontinued(mut variant: Variant) -> Variant {
    variant.active = false;
    variant
}
