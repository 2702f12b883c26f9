//! The stock mutation API: the sole writer of warehouse stock.
//!
//! All writes validate first and leave the catalog untouched on failure,
//! including the batch ID sequence. Corrections and restocks append to the
//! ledger; nothing edits or removes an existing batch. Every successful
//! call returns a [`StockMutation`] summary the caller is expected to pair
//! with exactly one audit entry; the engine itself never writes audit
//! records.

use chrono::{DateTime, Utc};
use narra_home_core::{BatchId, ProductId, VariantId, Warehouse};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::Catalog;
use crate::error::StockError;
use crate::models::{Product, StockModel, WarehouseStock};

/// Which sellable unit of a product a mutation addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StockTarget {
    /// The product's own flat stock.
    Product,

    /// One variant by ID.
    Variant(VariantId),

    /// One legacy size option by label.
    Size(String),
}

impl std::fmt::Display for StockTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product => write!(f, "base stock"),
            Self::Variant(id) => write!(f, "variant {id}"),
            Self::Size(size) => write!(f, "size {size}"),
        }
    }
}

/// What kind of write a mutation performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockOperation {
    /// Absolute totals restated for one warehouse.
    Correction,

    /// New stock received into one warehouse.
    Restock,

    /// Units reserved against pending orders.
    Reservation,

    /// Previously reserved units given back.
    Release,
}

impl std::fmt::Display for StockOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Correction => write!(f, "correction"),
            Self::Restock => write!(f, "restock"),
            Self::Reservation => write!(f, "reservation"),
            Self::Release => write!(f, "release"),
        }
    }
}

/// Summary of one successful mutation.
///
/// Carries the unit's totals before and after (summed across the known
/// warehouses) so callers can log and audit the change without re-reading
/// the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMutation {
    /// Product that was written.
    pub product_id: ProductId,

    /// Product display name, for audit lines.
    pub product_name: String,

    /// The sellable unit that was written.
    pub target: StockTarget,

    /// What kind of write happened.
    pub operation: StockOperation,

    /// Site the write landed on. `None` for reservation traffic, which is
    /// spread oldest-first across sites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<Warehouse>,

    /// Unit quantity total before the write.
    pub quantity_before: i64,

    /// Unit reserved total before the write.
    pub reserved_before: i64,

    /// Unit quantity total after the write.
    pub quantity_after: i64,

    /// Unit reserved total after the write.
    pub reserved_after: i64,

    /// Ledger entry the write appended, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,
}

impl std::fmt::Display for StockMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} on product {} ({})",
            self.operation, self.target, self.product_id, self.product_name
        )?;
        if let Some(warehouse) = self.warehouse {
            write!(f, " at {warehouse}")?;
        }
        write!(
            f,
            ": {}/{} -> {}/{}",
            self.quantity_before, self.reserved_before, self.quantity_after, self.reserved_after
        )?;
        if let Some(batch_id) = &self.batch_id {
            write!(f, " (batch {batch_id})")?;
        }
        Ok(())
    }
}

/// Quantity, reserved, and clamped availability for one unit across the
/// known sites.
#[derive(Clone, Copy)]
struct UnitTotals {
    quantity: i64,
    reserved: i64,
    available: i64,
}

/// The stock writer. Wraps a mutable catalog borrow for a burst of
/// related writes.
///
/// There is no cross-process coordination: two callers editing the same
/// catalog file race, and the later save wins.
pub struct StockService<'a> {
    catalog: &'a mut Catalog,
}

impl<'a> StockService<'a> {
    /// Create a service over the catalog.
    pub const fn new(catalog: &'a mut Catalog) -> Self {
        Self { catalog }
    }

    /// Restate absolute totals for one warehouse of a product's flat stock
    /// or one of its legacy size options.
    ///
    /// Pass `size_label` for legacy products, `None` for flat ones. The
    /// write appends a correction checkpoint to the site's ledger; earlier
    /// batches become superseded history.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Validation`] when a total is negative or
    /// reserved exceeds quantity, and [`StockError::NotFound`] when the
    /// product is missing or its stock shape does not take this target.
    #[instrument(skip(self))]
    pub fn update_warehouse_stock(
        &mut self,
        product_id: ProductId,
        warehouse: Warehouse,
        new_quantity: i64,
        new_reserved: i64,
        size_label: Option<&str>,
    ) -> Result<StockMutation, StockError> {
        let target = match size_label {
            Some(label) => StockTarget::Size(label.to_owned()),
            None => StockTarget::Product,
        };
        self.correct(product_id, &target, warehouse, new_quantity, new_reserved)
    }

    /// Restate absolute totals for one warehouse of a variant.
    ///
    /// # Errors
    ///
    /// Same contract as [`update_warehouse_stock`](Self::update_warehouse_stock).
    #[instrument(skip(self))]
    pub fn update_variant_stock(
        &mut self,
        product_id: ProductId,
        variant_id: &VariantId,
        warehouse: Warehouse,
        new_quantity: i64,
        new_reserved: i64,
    ) -> Result<StockMutation, StockError> {
        let target = StockTarget::Variant(variant_id.clone());
        self.correct(product_id, &target, warehouse, new_quantity, new_reserved)
    }

    /// Restate absolute totals for one warehouse of any sellable unit.
    ///
    /// # Errors
    ///
    /// Same contract as [`update_warehouse_stock`](Self::update_warehouse_stock).
    #[instrument(skip(self))]
    pub fn correct(
        &mut self,
        product_id: ProductId,
        target: &StockTarget,
        warehouse: Warehouse,
        new_quantity: i64,
        new_reserved: i64,
    ) -> Result<StockMutation, StockError> {
        if new_quantity < 0 {
            return Err(StockError::Validation(format!(
                "quantity must not be negative (got {new_quantity})"
            )));
        }
        if new_reserved < 0 {
            return Err(StockError::Validation(format!(
                "reserved must not be negative (got {new_reserved})"
            )));
        }
        if new_reserved > new_quantity {
            return Err(StockError::Validation(format!(
                "reserved {new_reserved} exceeds quantity {new_quantity}"
            )));
        }

        let (product_name, before) = self.read_unit(product_id, target)?;
        let batch_id = self.catalog.next_batch_id();
        let now = Utc::now();

        let stocks = self.unit_stocks_mut(product_id, target)?;
        let ws = entry_mut(stocks, warehouse);
        ws.record_correction(batch_id.clone(), new_quantity, new_reserved, now, None);
        let after = totals(stocks);

        let mutation = build_mutation(
            product_id,
            product_name,
            target,
            StockOperation::Correction,
            Some(warehouse),
            before,
            after,
            Some(batch_id),
        );
        tracing::info!("{mutation}");
        Ok(mutation)
    }

    /// Receive new stock into one warehouse as a fresh ledger batch.
    ///
    /// The first receipt on a site still holding pre-ledger flat stock
    /// writes an opening-balance checkpoint ahead of the new batch, so the
    /// existing units keep counting toward totals and keep their age.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Validation`] when `quantity` is not positive
    /// and [`StockError::NotFound`] when the target does not resolve.
    #[instrument(skip(self))]
    pub fn restock(
        &mut self,
        product_id: ProductId,
        target: &StockTarget,
        warehouse: Warehouse,
        quantity: i64,
        notes: Option<String>,
    ) -> Result<StockMutation, StockError> {
        if quantity <= 0 {
            return Err(StockError::Validation(format!(
                "restock quantity must be positive (got {quantity})"
            )));
        }

        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| StockError::NotFound(format!("product {product_id}")))?;
        let product_name = product.name.clone();
        let stocks = target_stocks(product, target)?;
        let before = totals(stocks);
        let needs_opening = stocks
            .iter()
            .find(|ws| ws.site() == Some(warehouse))
            .is_some_and(|ws| ws.batches.is_empty() && (ws.quantity != 0 || ws.reserved != 0));

        let opening_id = if needs_opening {
            Some(self.catalog.next_batch_id())
        } else {
            None
        };
        let batch_id = self.catalog.next_batch_id();
        let now = Utc::now();

        let stocks = self.unit_stocks_mut(product_id, target)?;
        let ws = entry_mut(stocks, warehouse);
        if let Some(opening_id) = opening_id {
            ws.record_opening_balance(opening_id, now);
        }
        ws.record_receipt(batch_id.clone(), quantity, now, notes);
        let after = totals(stocks);

        let mutation = build_mutation(
            product_id,
            product_name,
            target,
            StockOperation::Restock,
            Some(warehouse),
            before,
            after,
            Some(batch_id),
        );
        tracing::info!("{mutation}");
        Ok(mutation)
    }

    /// Reserve units against pending orders, oldest stock first.
    ///
    /// The request is all-or-nothing across the unit's known sites: when
    /// fewer than `quantity` units are available, nothing changes. Within
    /// the ledger the oldest batches fill first; pre-ledger flat stock
    /// counts as older than any batch.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Validation`] when `quantity` is not positive
    /// or exceeds the unit's availability, and [`StockError::NotFound`]
    /// when the target does not resolve.
    #[instrument(skip(self))]
    pub fn reserve(
        &mut self,
        product_id: ProductId,
        target: &StockTarget,
        quantity: i64,
    ) -> Result<StockMutation, StockError> {
        if quantity <= 0 {
            return Err(StockError::Validation(format!(
                "reservation quantity must be positive (got {quantity})"
            )));
        }

        let (product_name, before) = self.read_unit(product_id, target)?;
        if quantity > before.available {
            return Err(StockError::Validation(format!(
                "cannot reserve {quantity}: only {} available",
                before.available
            )));
        }
        let now = Utc::now();

        let stocks = self.unit_stocks_mut(product_id, target)?;
        apply_reservation(stocks, quantity, now);
        let after = totals(stocks);

        let mutation = build_mutation(
            product_id,
            product_name,
            target,
            StockOperation::Reservation,
            None,
            before,
            after,
            None,
        );
        tracing::info!("{mutation}");
        Ok(mutation)
    }

    /// Give back previously reserved units, oldest reservations first.
    ///
    /// Releases are always explicit. Nothing in the engine frees a
    /// reservation on its own, so an abandoned order holds its units until
    /// someone releases them.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Validation`] when `quantity` is not positive
    /// or exceeds the unit's reserved total, and [`StockError::NotFound`]
    /// when the target does not resolve.
    #[instrument(skip(self))]
    pub fn release(
        &mut self,
        product_id: ProductId,
        target: &StockTarget,
        quantity: i64,
    ) -> Result<StockMutation, StockError> {
        if quantity <= 0 {
            return Err(StockError::Validation(format!(
                "release quantity must be positive (got {quantity})"
            )));
        }

        let (product_name, before) = self.read_unit(product_id, target)?;
        if quantity > before.reserved {
            return Err(StockError::Validation(format!(
                "cannot release {quantity}: only {} reserved",
                before.reserved
            )));
        }
        let now = Utc::now();

        let stocks = self.unit_stocks_mut(product_id, target)?;
        apply_release(stocks, quantity, now);
        let after = totals(stocks);

        let mutation = build_mutation(
            product_id,
            product_name,
            target,
            StockOperation::Release,
            None,
            before,
            after,
            None,
        );
        tracing::info!("{mutation}");
        Ok(mutation)
    }

    /// Resolve the target and capture its totals before the write.
    fn read_unit(
        &self,
        product_id: ProductId,
        target: &StockTarget,
    ) -> Result<(String, UnitTotals), StockError> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| StockError::NotFound(format!("product {product_id}")))?;
        let stocks = target_stocks(product, target)?;
        Ok((product.name.clone(), totals(stocks)))
    }

    /// Resolve the target's warehouse entries for writing.
    fn unit_stocks_mut(
        &mut self,
        product_id: ProductId,
        target: &StockTarget,
    ) -> Result<&mut Vec<WarehouseStock>, StockError> {
        let product = self
            .catalog
            .product_mut(product_id)
            .ok_or_else(|| StockError::NotFound(format!("product {product_id}")))?;
        target_stocks_mut(product, target)
    }
}

/// The warehouse entries backing one sellable unit.
///
/// # Errors
///
/// Returns [`StockError::NotFound`] when the unit does not exist or the
/// product's stock shape does not take the target.
pub fn target_stocks<'p>(
    product: &'p Product,
    target: &StockTarget,
) -> Result<&'p [WarehouseStock], StockError> {
    match (&product.stock, target) {
        (StockModel::Variants(variants), StockTarget::Variant(id)) => variants
            .iter()
            .find(|variant| &variant.id == id)
            .map(|variant| variant.warehouse_stock.as_slice())
            .ok_or_else(|| {
                StockError::NotFound(format!("variant {id} on product {}", product.id))
            }),
        (StockModel::LegacySizes(options), StockTarget::Size(label)) => options
            .iter()
            .find(|option| &option.size == label)
            .map(|option| option.warehouse_stock.as_slice())
            .ok_or_else(|| {
                StockError::NotFound(format!("size option {label} on product {}", product.id))
            }),
        (StockModel::Flat(stocks), StockTarget::Product) => Ok(stocks.as_slice()),
        (stock, target) => Err(StockError::NotFound(format!(
            "product {} keeps {} stock; {} does not apply",
            product.id,
            stock.kind(),
            target
        ))),
    }
}

fn target_stocks_mut<'p>(
    product: &'p mut Product,
    target: &StockTarget,
) -> Result<&'p mut Vec<WarehouseStock>, StockError> {
    let product_id = product.id;
    match (&mut product.stock, target) {
        (StockModel::Variants(variants), StockTarget::Variant(id)) => variants
            .iter_mut()
            .find(|variant| &variant.id == id)
            .map(|variant| &mut variant.warehouse_stock)
            .ok_or_else(|| StockError::NotFound(format!("variant {id} on product {product_id}"))),
        (StockModel::LegacySizes(options), StockTarget::Size(label)) => options
            .iter_mut()
            .find(|option| &option.size == label)
            .map(|option| &mut option.warehouse_stock)
            .ok_or_else(|| {
                StockError::NotFound(format!("size option {label} on product {product_id}"))
            }),
        (StockModel::Flat(stocks), StockTarget::Product) => Ok(stocks),
        (stock, target) => Err(StockError::NotFound(format!(
            "product {product_id} keeps {} stock; {} does not apply",
            stock.kind(),
            target
        ))),
    }
}

/// The entry for a site, created empty if the unit has never stocked it.
fn entry_mut(stocks: &mut Vec<WarehouseStock>, warehouse: Warehouse) -> &mut WarehouseStock {
    if !stocks.iter().any(|ws| ws.site() == Some(warehouse)) {
        stocks.push(WarehouseStock::new(warehouse));
    }
    stocks
        .iter_mut()
        .find(|ws| ws.site() == Some(warehouse))
        .expect("entry for the site exists after upsert")
}

/// Totals for one unit across its known sites.
fn totals(stocks: &[WarehouseStock]) -> UnitTotals {
    let mut unit = UnitTotals {
        quantity: 0,
        reserved: 0,
        available: 0,
    };
    for ws in stocks.iter().filter(|ws| ws.site().is_some()) {
        unit.quantity += ws.total_quantity();
        unit.reserved += ws.total_reserved();
        unit.available += ws.available();
    }
    unit
}

#[allow(clippy::too_many_arguments)]
fn build_mutation(
    product_id: ProductId,
    product_name: String,
    target: &StockTarget,
    operation: StockOperation,
    warehouse: Option<Warehouse>,
    before: UnitTotals,
    after: UnitTotals,
    batch_id: Option<BatchId>,
) -> StockMutation {
    StockMutation {
        product_id,
        product_name,
        target: target.clone(),
        operation,
        warehouse,
        quantity_before: before.quantity,
        reserved_before: before.reserved,
        quantity_after: after.quantity,
        reserved_after: after.reserved,
        batch_id,
    }
}

/// One unit of reservable stock: a ledger batch, or `None` for a
/// pre-ledger flat pool.
type Slot = (usize, Option<usize>, DateTime<Utc>);

/// Slots for one unit, oldest first. Flat pools predate every ledger
/// batch, so they sort before any of them. Unknown sites are skipped.
fn slots_oldest_first(stocks: &[WarehouseStock]) -> Vec<Slot> {
    let mut slots = Vec::new();
    for (ws_index, ws) in stocks.iter().enumerate() {
        if ws.site().is_none() {
            continue;
        }
        if ws.batches.is_empty() {
            slots.push((ws_index, None, DateTime::<Utc>::MIN_UTC));
        } else {
            for (batch_index, batch) in ws.batches.iter().enumerate().skip(ws.effective_start()) {
                slots.push((ws_index, Some(batch_index), batch.received_at));
            }
        }
    }
    slots.sort_by_key(|&(_, _, received_at)| received_at);
    slots
}

/// Walk the unit oldest-first and place the reservation.
///
/// Availability must have been checked; the walk takes exactly `quantity`
/// units.
fn apply_reservation(stocks: &mut [WarehouseStock], quantity: i64, now: DateTime<Utc>) {
    let mut remaining = quantity;
    for (ws_index, batch_index, _) in slots_oldest_first(stocks) {
        if remaining == 0 {
            break;
        }
        let ws = stocks.get_mut(ws_index).expect("slot index within bounds");
        let take = match batch_index {
            Some(batch_index) => {
                let batch = ws
                    .batches
                    .get_mut(batch_index)
                    .expect("slot index within ledger");
                let take = remaining.min(batch.available());
                batch.reserved += take;
                take
            }
            None => remaining.min(ws.available()),
        };
        if take == 0 {
            continue;
        }
        ws.reserved += take;
        ws.updated_at = Some(now);
        remaining -= take;
    }
    debug_assert_eq!(remaining, 0, "availability was checked before the walk");
}

/// Walk the unit oldest-first and give reserved units back.
///
/// The reserved total must have been checked; the walk releases exactly
/// `quantity` units.
fn apply_release(stocks: &mut [WarehouseStock], quantity: i64, now: DateTime<Utc>) {
    let mut remaining = quantity;
    for (ws_index, batch_index, _) in slots_oldest_first(stocks) {
        if remaining == 0 {
            break;
        }
        let ws = stocks.get_mut(ws_index).expect("slot index within bounds");
        let take = match batch_index {
            Some(batch_index) => {
                let batch = ws
                    .batches
                    .get_mut(batch_index)
                    .expect("slot index within ledger");
                let take = remaining.min(batch.reserved.max(0));
                batch.reserved -= take;
                take
            }
            None => remaining.min(ws.reserved.max(0)),
        };
        if take == 0 {
            continue;
        }
        ws.reserved -= take;
        ws.updated_at = Some(now);
        remaining -= take;
    }
    debug_assert_eq!(remaining, 0, "reserved total was checked before the walk");
}
