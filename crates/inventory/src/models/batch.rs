//! Ledger batches: discrete receipts and correction checkpoints.

use chrono::{DateTime, Utc};
use narra_home_core::BatchId;
use serde::{Deserialize, Serialize};

/// How a batch entered the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchOrigin {
    /// Stock received into the warehouse (initial receiving or restock).
    #[default]
    Received,

    /// Admin correction recording absolute new totals for the warehouse.
    ///
    /// A correction is a checkpoint: totals are computed from the latest
    /// correction onward, and every batch before it becomes superseded
    /// history that FIFO review still shows.
    Correction,
}

impl std::fmt::Display for BatchOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Received => write!(f, "received"),
            Self::Correction => write!(f, "correction"),
        }
    }
}

/// A discrete entry in one warehouse's stock ledger.
///
/// Batches are append-only: once written they are never edited or removed.
/// Receipts add stock; corrections restate the warehouse totals in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// Ledger ID, assigned from the catalog's monotonic sequence.
    #[serde(rename = "batchId")]
    pub id: BatchId,

    /// Units in this batch. Never negative in well-formed data.
    pub quantity: i64,

    /// Units of this batch reserved against pending orders.
    pub reserved: i64,

    /// When the stock was received (or the correction was recorded).
    pub received_at: DateTime<Utc>,

    /// How the batch entered the ledger. Records written before origins
    /// were tracked deserialize as receipts.
    #[serde(default)]
    pub origin: BatchOrigin,

    /// Free-form note (supplier, reason for correction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Batch {
    /// Create a receipt batch. Freshly received stock carries no
    /// reservations.
    #[must_use]
    pub const fn received(
        id: BatchId,
        quantity: i64,
        received_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            quantity,
            reserved: 0,
            received_at,
            origin: BatchOrigin::Received,
            notes,
        }
    }

    /// Create a correction checkpoint carrying absolute totals.
    #[must_use]
    pub const fn correction(
        id: BatchId,
        quantity: i64,
        reserved: i64,
        received_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            quantity,
            reserved,
            received_at,
            origin: BatchOrigin::Correction,
            notes,
        }
    }

    /// Sellable units remaining in this batch, clamped at zero.
    #[must_use]
    pub const fn available(&self) -> i64 {
        let available = self.quantity - self.reserved;
        if available > 0 { available } else { 0 }
    }

    /// Whether the batch satisfies the stock bounds
    /// (`0 <= reserved <= quantity`).
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.quantity >= 0 && self.reserved >= 0 && self.reserved <= self.quantity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, d, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_available_clamps_at_zero() {
        let mut batch = Batch::received(BatchId::from_seq(1), 10, day(1), None);
        batch.reserved = 4;
        assert_eq!(batch.available(), 6);

        // Malformed over-reservation must not produce negative availability
        batch.reserved = 12;
        assert_eq!(batch.available(), 0);
    }

    #[test]
    fn test_is_consistent_bounds() {
        let mut batch = Batch::received(BatchId::from_seq(1), 10, day(1), None);
        assert!(batch.is_consistent());

        batch.reserved = 10;
        assert!(batch.is_consistent());

        batch.reserved = 11;
        assert!(!batch.is_consistent());

        batch.reserved = -1;
        assert!(!batch.is_consistent());

        batch.reserved = 0;
        batch.quantity = -5;
        assert!(!batch.is_consistent());
    }

    #[test]
    fn test_wire_field_names() {
        let batch = Batch::received(
            BatchId::from_seq(3),
            25,
            day(2),
            Some("Mindanao Timber delivery".to_owned()),
        );
        let value = serde_json::to_value(&batch).unwrap();

        assert_eq!(value["batchId"], "B-000003");
        assert_eq!(value["quantity"], 25);
        assert_eq!(value["reserved"], 0);
        assert_eq!(value["origin"], "RECEIVED");
        assert!(value["receivedAt"].is_string());
    }

    #[test]
    fn test_origin_defaults_to_received() {
        // Ledger entries from before origins were tracked carry no field
        let json = r#"{
            "batchId": "LOT-2023-11",
            "quantity": 5,
            "reserved": 1,
            "receivedAt": "2023-11-02T09:30:00Z"
        }"#;
        let batch: Batch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.origin, BatchOrigin::Received);
        assert_eq!(batch.notes, None);
    }
}
