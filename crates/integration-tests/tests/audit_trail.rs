//! Audit entries paired with catalog mutations.
//!
//! The CLI appends one entry per saved mutation; these tests pin the
//! pairing and the wire format the trail is written in.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use narra_home_core::{ProductId, VariantId, Warehouse};
use narra_home_inventory::audit::{AuditEntry, AuditSink, MemoryAuditLog};
use narra_home_inventory::mutation::{StockOperation, StockService, StockTarget};

use narra_home_integration_tests::showroom_catalog;

fn queen_target() -> StockTarget {
    StockTarget::Variant(VariantId::new("NSB-WAL-Q"))
}

#[test]
fn test_every_saved_mutation_gets_one_entry() {
    let mut catalog = showroom_catalog();
    let mut service = StockService::new(&mut catalog);
    let mut log = MemoryAuditLog::new();

    let bed = ProductId::new(1);
    let mutations = [
        service
            .restock(bed, &queen_target(), Warehouse::Lorenzo, 2, None)
            .unwrap(),
        service.reserve(bed, &queen_target(), 4).unwrap(),
        service.release(bed, &queen_target(), 1).unwrap(),
        service
            .update_variant_stock(bed, &VariantId::new("NSB-WAL-Q"), Warehouse::Oroquieta, 6, 0)
            .unwrap(),
    ];
    for mutation in &mutations {
        log.record(&AuditEntry::from_mutation("maria", mutation)).unwrap();
    }

    let entries = log.entries();
    assert_eq!(entries.len(), 4);

    let operations: Vec<StockOperation> = entries.iter().map(|entry| entry.operation).collect();
    assert_eq!(
        operations,
        [
            StockOperation::Restock,
            StockOperation::Reservation,
            StockOperation::Release,
            StockOperation::Correction,
        ]
    );
    assert!(entries.iter().all(|entry| entry.actor == "maria"));
    assert!(entries.iter().all(|entry| entry.product_id == bed));

    // Entries are independently identifiable.
    assert_ne!(entries[0].id, entries[1].id);
}

#[test]
fn test_entry_detail_mirrors_the_mutation() {
    let mut catalog = showroom_catalog();
    let mut service = StockService::new(&mut catalog);

    let mutation = service
        .restock(
            ProductId::new(1),
            &queen_target(),
            Warehouse::Lorenzo,
            2,
            Some("July delivery".to_string()),
        )
        .unwrap();
    let entry = AuditEntry::from_mutation("jun", &mutation);

    assert_eq!(entry.detail, mutation.to_string());
    assert!(entry.detail.contains("B-000005"));
    assert!(entry.detail.contains("Narra Sleigh Bed"));
}

#[test]
fn test_entry_wire_format() {
    let mut catalog = showroom_catalog();
    let mut service = StockService::new(&mut catalog);

    let mutation = service.reserve(ProductId::new(1), &queen_target(), 2).unwrap();
    let entry = AuditEntry::from_mutation("maria", &mutation);
    let value = serde_json::to_value(&entry).unwrap();

    assert!(value["id"].as_str().is_some());
    assert!(value["recordedAt"].as_str().is_some());
    assert_eq!(value["actor"], "maria");
    assert_eq!(value["productId"], 1);
    assert_eq!(value["operation"], "RESERVATION");
    assert_eq!(value["target"]["variant"], "NSB-WAL-Q");
}
