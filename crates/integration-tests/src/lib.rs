//! Integration tests for Narra Home.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p narra-home-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `stock_flow` - Mutation flows through the stock service
//! - `catalog_roundtrip` - Catalog persistence through the JSON store
//! - `audit_trail` - Audit entries paired with mutations
//!
//! The fixtures below use fixed timestamps so ordering assertions stay
//! deterministic across runs.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use narra_home_core::{BatchId, ProductId, VariantId, Warehouse};
use narra_home_inventory::catalog::Catalog;
use narra_home_inventory::models::{
    Batch, Product, SizeOption, StockModel, Variant, WarehouseStock,
};

/// Fixed timestamp `n` days into July 2025.
///
/// # Panics
///
/// Panics on a day number outside the month; fixtures stay within it.
#[must_use]
pub fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, n, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// A received batch with the reserved count already applied.
#[must_use]
pub fn received_batch(
    seq: u64,
    quantity: i64,
    reserved: i64,
    received_at: DateTime<Utc>,
) -> Batch {
    let mut batch = Batch::received(BatchId::from_seq(seq), quantity, received_at, None);
    batch.reserved = reserved;
    batch
}

/// A warehouse entry with its flat totals mirroring the given batches.
#[must_use]
pub fn pool(
    warehouse: Warehouse,
    quantity: i64,
    reserved: i64,
    batches: Vec<Batch>,
) -> WarehouseStock {
    let mut ws = WarehouseStock::new(warehouse);
    ws.quantity = quantity;
    ws.reserved = reserved;
    ws.updated_at = batches.iter().map(|batch| batch.received_at).max();
    ws.batches = batches;
    ws
}

/// A pre-ledger warehouse entry: flat totals, no batches, aged timestamp.
#[must_use]
pub fn legacy_pool(warehouse: Warehouse, quantity: i64, reserved: i64) -> WarehouseStock {
    let mut ws = WarehouseStock::new(warehouse);
    ws.quantity = quantity;
    ws.reserved = reserved;
    ws.updated_at = Some(day(1));
    ws
}

/// Catalog with one product per stock shape.
///
/// The bed carries batch history across both sites so FIFO assertions
/// have something to bite on:
///
/// - `NSB-WAL-Q`: Lorenzo `B-000001` (day 2, 8 units) and `B-000004`
///   (day 8, 4 units), Oroquieta `B-000002` (day 4, 5 units)
/// - `NSB-WAL-K`: Lorenzo `B-000003` (day 6, 3 units)
///
/// The mattress and the chair predate the ledger and keep flat totals
/// only.
#[must_use]
pub fn showroom_catalog() -> Catalog {
    let queen = Variant {
        id: VariantId::new("NSB-WAL-Q"),
        size: Some("Queen".to_string()),
        color: "Walnut".to_string(),
        price: Decimal::new(42_500, 0),
        active: true,
        warehouse_stock: vec![
            pool(
                Warehouse::Lorenzo,
                12,
                0,
                vec![
                    received_batch(1, 8, 0, day(2)),
                    received_batch(4, 4, 0, day(8)),
                ],
            ),
            pool(
                Warehouse::Oroquieta,
                5,
                0,
                vec![received_batch(2, 5, 0, day(4))],
            ),
        ],
    };
    let king = Variant {
        id: VariantId::new("NSB-WAL-K"),
        size: Some("King".to_string()),
        color: "Walnut".to_string(),
        price: Decimal::new(48_900, 0),
        active: true,
        warehouse_stock: vec![pool(
            Warehouse::Lorenzo,
            3,
            0,
            vec![received_batch(3, 3, 0, day(6))],
        )],
    };

    Catalog::new(vec![
        Product::new(
            ProductId::new(1),
            "Narra Sleigh Bed",
            "Beds",
            StockModel::Variants(vec![queen, king]),
        ),
        Product::new(
            ProductId::new(2),
            "Banig Roll-Up Mattress",
            "Mattresses",
            StockModel::LegacySizes(vec![
                SizeOption {
                    size: "Queen".to_string(),
                    price: Some(Decimal::new(18_750, 0)),
                    warehouse_stock: vec![legacy_pool(Warehouse::Lorenzo, 6, 1)],
                },
                SizeOption {
                    size: "King".to_string(),
                    price: Some(Decimal::new(21_500, 0)),
                    warehouse_stock: vec![legacy_pool(Warehouse::Oroquieta, 4, 0)],
                },
            ]),
        ),
        Product::new(
            ProductId::new(3),
            "Rattan Lounge Chair",
            "Seating",
            StockModel::Flat(vec![legacy_pool(Warehouse::Lorenzo, 4, 1)]),
        ),
    ])
}
