//! Catalog persistence through the JSON file store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use narra_home_core::{BatchId, ProductId, VariantId, Warehouse};
use narra_home_inventory::models::{StockModel, WarehouseStock};
use narra_home_inventory::mutation::{StockService, StockTarget};
use narra_home_inventory::resolver;
use narra_home_inventory::store::{CatalogStore, JsonFileStore};

use narra_home_integration_tests::showroom_catalog;

fn queen_target() -> StockTarget {
    StockTarget::Variant(VariantId::new("NSB-WAL-Q"))
}

#[test]
fn test_catalog_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("catalog.json"));

    let catalog = showroom_catalog();
    store.save(&catalog).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded, catalog);
}

#[test]
fn test_each_product_stores_exactly_one_stock_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let store = JsonFileStore::new(&path);
    store.save(&showroom_catalog()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let products = raw["products"].as_array().unwrap();

    let shape_fields = ["variants", "sizeOptions", "warehouseStock"];
    let shapes: Vec<Vec<&str>> = products
        .iter()
        .map(|product| {
            shape_fields
                .iter()
                .copied()
                .filter(|field| product.get(field).is_some())
                .collect()
        })
        .collect();

    assert_eq!(
        shapes,
        [["variants"], ["sizeOptions"], ["warehouseStock"]]
    );
}

#[test]
fn test_batch_sequence_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("catalog.json"));
    store.save(&showroom_catalog()).unwrap();

    // First session appends one batch.
    let mut catalog = store.load().unwrap();
    assert_eq!(catalog.next_batch_seq(), 5);
    let mut service = StockService::new(&mut catalog);
    let mutation = service
        .restock(ProductId::new(1), &queen_target(), Warehouse::Lorenzo, 2, None)
        .unwrap();
    assert_eq!(mutation.batch_id, Some(BatchId::from_seq(5)));
    store.save(&catalog).unwrap();

    // The next session never reuses the ID.
    let mut catalog = store.load().unwrap();
    assert_eq!(catalog.next_batch_seq(), 6);
    let mut service = StockService::new(&mut catalog);
    let mutation = service
        .restock(ProductId::new(1), &queen_target(), Warehouse::Oroquieta, 1, None)
        .unwrap();
    assert_eq!(mutation.batch_id, Some(BatchId::from_seq(6)));
}

#[test]
fn test_mutations_survive_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("catalog.json"));

    let mut catalog = showroom_catalog();
    let mut service = StockService::new(&mut catalog);
    service.reserve(ProductId::new(1), &queen_target(), 3).unwrap();
    store.save(&catalog).unwrap();

    let mut loaded = store.load().unwrap();
    let product = loaded.product(ProductId::new(1)).unwrap();
    let variant = resolver::find_variant(product, Some("Queen"), "Walnut").unwrap();
    assert_eq!(resolver::variant_stock(variant), 14);

    // The reloaded ledger still knows which batches hold the reservation.
    let mut service = StockService::new(&mut loaded);
    service.release(ProductId::new(1), &queen_target(), 3).unwrap();
    let product = loaded.product(ProductId::new(1)).unwrap();
    let variant = resolver::find_variant(product, Some("Queen"), "Walnut").unwrap();
    assert_eq!(resolver::variant_stock(variant), 17);
}

#[test]
fn test_unknown_warehouse_names_round_trip_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("catalog.json"));

    // A site from a newer deployment this build does not know about.
    let mut catalog = showroom_catalog();
    let mut cebu = WarehouseStock::new(Warehouse::Lorenzo);
    cebu.warehouse = "Cebu".to_string();
    cebu.quantity = 2;
    let chair = catalog.product_mut(ProductId::new(3)).unwrap();
    let StockModel::Flat(pools) = &mut chair.stock else {
        panic!("chair keeps flat stock");
    };
    pools.push(cebu);

    store.save(&catalog).unwrap();
    let loaded = store.load().unwrap();

    let chair = loaded.product(ProductId::new(3)).unwrap();
    let StockModel::Flat(pools) = &chair.stock else {
        panic!("chair keeps flat stock");
    };
    assert_eq!(pools[1].warehouse, "Cebu");
    assert_eq!(pools[1].quantity, 2);

    // Unknown sites are preserved but never counted.
    assert_eq!(resolver::total_stock(chair), 3);
}
