//! Products, variants, and legacy size options.

use narra_home_core::{ProductId, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::warehouse_stock::WarehouseStock;

/// A purchasable configuration of a product: a color plus an optional size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Variant ID, unique within the product.
    pub id: VariantId,

    /// Size label, e.g. `"Queen"`. `None` for single-size products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Color or finish, e.g. `"Walnut"`.
    pub color: String,

    /// Retail price in PHP.
    pub price: Decimal,

    /// Inactive variants stay listed in the catalog but contribute nothing
    /// to availability totals.
    pub active: bool,

    /// Per-warehouse stock for this variant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warehouse_stock: Vec<WarehouseStock>,
}

/// A size-keyed stock entry on products created before variants existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeOption {
    /// Size label the entry is keyed by.
    pub size: String,

    /// Retail price in PHP. Some very old records never carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    /// Per-warehouse stock for this size.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warehouse_stock: Vec<WarehouseStock>,
}

/// The three stock shapes a product can carry.
///
/// Exactly one shape is populated per product. Files are decoded with the
/// shape precedence the catalog has always used (variants win, then legacy
/// size options, then flat warehouse stock), so a vestigial empty `variants`
/// array on a legacy record does not hide its size options.
#[derive(Debug, Clone, PartialEq)]
pub enum StockModel {
    /// Current shape: purchasable variants, each with its own stock.
    Variants(Vec<Variant>),

    /// Legacy shape: size-keyed stock entries.
    LegacySizes(Vec<SizeOption>),

    /// Oldest shape: one flat stock list on the product itself.
    Flat(Vec<WarehouseStock>),
}

impl StockModel {
    /// Shape name as it appears in stored records, for log lines and
    /// error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Variants(_) => "variants",
            Self::LegacySizes(_) => "sizeOptions",
            Self::Flat(_) => "warehouseStock",
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    /// Product ID.
    pub id: ProductId,

    /// Display name, e.g. `"Narra Sleigh Bed"`.
    pub name: String,

    /// Catalog category, e.g. `"Bedroom"`.
    pub category: String,

    /// Soft-delete flag for the product as a whole.
    pub active: bool,

    /// Stock in whichever of the three shapes this product uses.
    pub stock: StockModel,
}

impl Product {
    /// Create an active product.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        stock: StockModel,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            active: true,
            stock,
        }
    }
}

/// Stored layout of a product.
///
/// All three stock fields are optional in the file; the `From` conversions
/// below enforce the one-shape rule in both directions.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: ProductId,
    name: String,
    category: String,
    active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variants: Option<Vec<Variant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size_options: Option<Vec<SizeOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warehouse_stock: Option<Vec<WarehouseStock>>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let stock = if let Some(variants) = record.variants.filter(|v| !v.is_empty()) {
            StockModel::Variants(variants)
        } else if let Some(options) = record.size_options.filter(|o| !o.is_empty()) {
            StockModel::LegacySizes(options)
        } else {
            StockModel::Flat(record.warehouse_stock.unwrap_or_default())
        };

        Self {
            id: record.id,
            name: record.name,
            category: record.category,
            active: record.active,
            stock,
        }
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        let (variants, size_options, warehouse_stock) = match product.stock {
            StockModel::Variants(variants) => (Some(variants), None, None),
            StockModel::LegacySizes(options) => (None, Some(options), None),
            StockModel::Flat(stocks) => {
                // A product with no stock at all stays field-free on disk
                let stocks = if stocks.is_empty() { None } else { Some(stocks) };
                (None, None, stocks)
            }
        };

        Self {
            id: product.id,
            name: product.name,
            category: product.category,
            active: product.active,
            variants,
            size_options,
            warehouse_stock,
        }
    }
}
