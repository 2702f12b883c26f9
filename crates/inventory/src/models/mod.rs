//! Catalog data models.
//!
//! Products come in three stock shapes (variants, legacy size options, flat
//! warehouse stock); all three bottom out in per-warehouse
//! [`WarehouseStock`] entries carrying flat totals plus the batch ledger.

pub mod batch;
pub mod product;
pub mod warehouse_stock;

pub use batch::{Batch, BatchOrigin};
pub use product::{Product, SizeOption, StockModel, Variant};
pub use warehouse_stock::WarehouseStock;
