//! Per-warehouse stock: flat totals plus the batch ledger.

use chrono::{DateTime, Utc};
use narra_home_core::{BatchId, Warehouse};
use serde::{Deserialize, Serialize};

use super::batch::{Batch, BatchOrigin};
use crate::error::StockError;

/// Stock held at one warehouse for one sellable unit.
///
/// Two bookkeeping modes coexist in the catalog:
///
/// - **Flat**: only `quantity`/`reserved` are set and `batches` is empty.
///   Records from before batch tracking was introduced look like this.
/// - **Ledger**: `batches` carries the history and the flat fields mirror
///   the ledger totals. Every mutation keeps the mirror in sync.
///
/// When batches are present, totals come from the effective window (the
/// latest correction checkpoint onward); otherwise the flat fields are
/// used as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStock {
    /// Site name. Stored raw so records written by newer deployments (with
    /// sites this build does not know) round-trip untouched.
    pub warehouse: String,

    /// Units on hand.
    pub quantity: i64,

    /// Units reserved against pending orders.
    pub reserved: i64,

    /// Append-only ledger. Empty for flat-mode records.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub batches: Vec<Batch>,

    /// Stamp of the last mutation. Freshness fallback for records with no
    /// ledger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WarehouseStock {
    /// Create an empty entry for a known site.
    #[must_use]
    pub fn new(warehouse: Warehouse) -> Self {
        Self {
            warehouse: warehouse.as_str().to_owned(),
            quantity: 0,
            reserved: 0,
            batches: Vec::new(),
            updated_at: None,
        }
    }

    /// The known site this entry belongs to, or `None` when the stored name
    /// is from a newer deployment.
    #[must_use]
    pub fn site(&self) -> Option<Warehouse> {
        Warehouse::from_name(&self.warehouse)
    }

    /// Index of the latest correction checkpoint, or `0` when the ledger
    /// has none. Batches before this index are superseded history: FIFO
    /// review still shows them, totals do not count them.
    #[must_use]
    pub fn effective_start(&self) -> usize {
        self.batches
            .iter()
            .rposition(|batch| batch.origin == BatchOrigin::Correction)
            .unwrap_or(0)
    }

    /// Ledger entries that count toward totals.
    #[must_use]
    pub fn effective_batches(&self) -> &[Batch] {
        self.batches.get(self.effective_start()..).unwrap_or_default()
    }

    /// Units on hand: ledger totals when batches exist, the flat field
    /// otherwise.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        if self.batches.is_empty() {
            self.quantity
        } else {
            self.effective_batches().iter().map(|b| b.quantity).sum()
        }
    }

    /// Units reserved, resolved the same way as [`total_quantity`].
    ///
    /// [`total_quantity`]: WarehouseStock::total_quantity
    #[must_use]
    pub fn total_reserved(&self) -> i64 {
        if self.batches.is_empty() {
            self.reserved
        } else {
            self.effective_batches().iter().map(|b| b.reserved).sum()
        }
    }

    /// Sellable units at this site, clamped at zero.
    #[must_use]
    pub fn available(&self) -> i64 {
        (self.total_quantity() - self.total_reserved()).max(0)
    }

    /// Check the stock invariants over this entry.
    ///
    /// Violations are reported, never repaired; the stored record stays
    /// exactly as loaded.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Invariant`] when a batch or the flat totals
    /// break the `0 <= reserved <= quantity` bounds, or when the flat
    /// mirror diverges from the ledger totals.
    pub fn verify(&self) -> Result<(), StockError> {
        for batch in &self.batches {
            if !batch.is_consistent() {
                return Err(StockError::Invariant(format!(
                    "batch {} at {}: quantity {} / reserved {} out of bounds",
                    batch.id, self.warehouse, batch.quantity, batch.reserved
                )));
            }
        }

        if self.quantity < 0 || self.reserved < 0 || self.reserved > self.quantity {
            return Err(StockError::Invariant(format!(
                "warehouse {}: quantity {} / reserved {} out of bounds",
                self.warehouse, self.quantity, self.reserved
            )));
        }

        if !self.batches.is_empty() {
            let quantity: i64 = self.effective_batches().iter().map(|b| b.quantity).sum();
            let reserved: i64 = self.effective_batches().iter().map(|b| b.reserved).sum();
            if quantity != self.quantity || reserved != self.reserved {
                return Err(StockError::Invariant(format!(
                    "warehouse {}: flat totals {}/{} diverge from ledger totals {}/{}",
                    self.warehouse, self.quantity, self.reserved, quantity, reserved
                )));
            }
        }

        Ok(())
    }

    /// Append a receipt batch and roll it into the flat mirror.
    pub(crate) fn record_receipt(
        &mut self,
        id: BatchId,
        quantity: i64,
        at: DateTime<Utc>,
        notes: Option<String>,
    ) {
        self.batches.push(Batch::received(id, quantity, at, notes));
        self.quantity += quantity;
        self.updated_at = Some(at);
    }

    /// Append a correction checkpoint and restate the flat mirror.
    pub(crate) fn record_correction(
        &mut self,
        id: BatchId,
        quantity: i64,
        reserved: i64,
        at: DateTime<Utc>,
        notes: Option<String>,
    ) {
        self.batches
            .push(Batch::correction(id, quantity, reserved, at, notes));
        self.quantity = quantity;
        self.reserved = reserved;
        self.updated_at = Some(at);
    }

    /// Convert pre-ledger flat stock into a correction checkpoint.
    ///
    /// Must run before the first receipt lands in a ledger that starts on a
    /// record with flat stock, so the existing units keep counting toward
    /// totals. The checkpoint is stamped with the record's last update so
    /// the old stock keeps its age for FIFO purposes.
    pub(crate) fn record_opening_balance(&mut self, id: BatchId, fallback_at: DateTime<Utc>) {
        let at = self.updated_at.unwrap_or(fallback_at);
        self.batches.push(Batch::correction(
            id,
            self.quantity,
            self.reserved,
            at,
            Some("opening balance carried from pre-ledger stock".to_owned()),
        ));
    }
}
