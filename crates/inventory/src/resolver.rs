//! Read-side availability resolution across the three product stock shapes.
//!
//! Everything here is read-only. Invariant violations discovered while
//! aggregating are reported through `tracing` and the stored record is left
//! exactly as loaded; clamping keeps the reported figures non-negative.

use narra_home_core::Warehouse;
use serde::Serialize;

use crate::models::{Product, SizeOption, StockModel, Variant, WarehouseStock};

/// Total sellable units for a product across both known warehouses.
///
/// Dispatch follows the product's stock shape:
///
/// 1. Variants: sum over active variants only.
/// 2. Legacy size options: sum over all options.
/// 3. Flat: sum over the product's own warehouse entries.
///
/// Stock held under unknown warehouse names stays in the record but is
/// excluded from the total.
#[must_use]
pub fn total_stock(product: &Product) -> i64 {
    match &product.stock {
        StockModel::Variants(variants) => variants
            .iter()
            .filter(|variant| variant.active)
            .map(variant_stock)
            .sum(),
        StockModel::LegacySizes(options) => options
            .iter()
            .map(|option| known_available(&option.warehouse_stock))
            .sum(),
        StockModel::Flat(stocks) => known_available(stocks),
    }
}

/// Sellable units for one variant across both known warehouses.
#[must_use]
pub fn variant_stock(variant: &Variant) -> i64 {
    known_available(&variant.warehouse_stock)
}

/// Find a variant by exact size and color.
///
/// `size: None` only matches variants that have no size; it is not a
/// wildcard.
#[must_use]
pub fn find_variant<'a>(
    product: &'a Product,
    size: Option<&str>,
    color: &str,
) -> Option<&'a Variant> {
    let StockModel::Variants(variants) = &product.stock else {
        return None;
    };
    variants
        .iter()
        .find(|variant| variant.size.as_deref() == size && variant.color == color)
}

/// Find a legacy size option by its exact label.
#[must_use]
pub fn find_size_option<'a>(product: &'a Product, size: &str) -> Option<&'a SizeOption> {
    let StockModel::LegacySizes(options) = &product.stock else {
        return None;
    };
    options.iter().find(|option| option.size == size)
}

/// One sellable unit of a product: its display label, active flag, and the
/// warehouse entries backing it.
#[derive(Debug)]
pub struct UnitStocks<'a> {
    /// Display label: variant color/size, legacy size label, or `base stock`.
    pub label: String,

    /// Inactive units contribute nothing to product totals.
    pub active: bool,

    /// The unit's warehouse entries, in catalog order.
    pub stocks: &'a [WarehouseStock],
}

/// Every sellable unit of a product, in catalog order.
///
/// Inactive variants are included; callers that aggregate must honor the
/// `active` flag the way [`total_stock`] does.
#[must_use]
pub fn unit_stocks(product: &Product) -> Vec<UnitStocks<'_>> {
    match &product.stock {
        StockModel::Variants(variants) => variants
            .iter()
            .map(|variant| UnitStocks {
                label: variant_label(variant),
                active: variant.active,
                stocks: &variant.warehouse_stock,
            })
            .collect(),
        StockModel::LegacySizes(options) => options
            .iter()
            .map(|option| UnitStocks {
                label: format!("Size {}", option.size),
                active: true,
                stocks: &option.warehouse_stock,
            })
            .collect(),
        StockModel::Flat(stocks) => vec![UnitStocks {
            label: "base stock".to_owned(),
            active: true,
            stocks,
        }],
    }
}

/// Availability at one warehouse for a sellable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAvailability {
    /// The site the figures belong to.
    pub warehouse: Warehouse,
    /// Units on hand.
    pub quantity: i64,
    /// Units reserved against pending orders.
    pub reserved: i64,
    /// Sellable units, clamped at zero.
    pub available: i64,
}

/// Availability breakdown for one sellable unit of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAvailability {
    /// Display label for the unit.
    pub label: String,

    /// Inactive units show their real figures here but contribute nothing
    /// to [`total_stock`].
    pub active: bool,

    /// Per-site figures for the known warehouses, in catalog order.
    pub sites: Vec<SiteAvailability>,

    /// Sellable units across the known sites.
    pub available: i64,
}

/// Per-unit availability breakdown for a product, in catalog order.
#[must_use]
pub fn availability(product: &Product) -> Vec<UnitAvailability> {
    unit_stocks(product)
        .into_iter()
        .map(|unit| {
            let sites: Vec<SiteAvailability> = unit
                .stocks
                .iter()
                .filter_map(|ws| {
                    let warehouse = ws.site()?;
                    Some(SiteAvailability {
                        warehouse,
                        quantity: ws.total_quantity(),
                        reserved: ws.total_reserved(),
                        available: checked_available(ws),
                    })
                })
                .collect();
            let available = sites.iter().map(|site| site.available).sum();
            UnitAvailability {
                label: unit.label,
                active: unit.active,
                sites,
                available,
            }
        })
        .collect()
}

/// Availability summed over the entries at known sites.
fn known_available(stocks: &[WarehouseStock]) -> i64 {
    stocks
        .iter()
        .filter(|ws| ws.site().is_some())
        .map(checked_available)
        .sum()
}

/// Per-site availability with invariant reporting.
fn checked_available(ws: &WarehouseStock) -> i64 {
    if let Err(error) = ws.verify() {
        tracing::warn!(warehouse = %ws.warehouse, %error, "stock record violates invariants");
    }
    ws.available()
}

fn variant_label(variant: &Variant) -> String {
    match &variant.size {
        Some(size) => format!("{} / {}", variant.color, size),
        None => variant.color.clone(),
    }
}
