//! Oldest-first review of the batch ledger.
//!
//! Listing is for review; reservation order is enforced by the mutation
//! side. Superseded entries (before the latest correction checkpoint) are
//! included and flagged so the full history stays visible.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Batch, WarehouseStock};

/// The display ID used when a stamp is synthesized from a record that
/// predates batch tracking.
pub const LEGACY_BATCH_ID: &str = "Legacy";

/// One ledger entry in a FIFO listing, paired with its site.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FifoEntry {
    /// Site the batch sits in (raw stored name).
    pub warehouse: String,

    /// The ledger entry itself.
    pub batch: Batch,

    /// Whether a later correction checkpoint supersedes this entry.
    /// Superseded entries no longer count toward totals.
    pub superseded: bool,
}

/// All ledger entries for one sellable unit, oldest first.
///
/// The sort is stable: entries received at the same instant keep their
/// ledger order, sites in the order the record lists them.
#[must_use]
pub fn list_batches(stocks: &[WarehouseStock]) -> Vec<FifoEntry> {
    let mut entries: Vec<FifoEntry> = stocks
        .iter()
        .flat_map(|ws| {
            let effective_start = ws.effective_start();
            ws.batches
                .iter()
                .enumerate()
                .map(move |(index, batch)| FifoEntry {
                    warehouse: ws.warehouse.clone(),
                    batch: batch.clone(),
                    superseded: index < effective_start,
                })
        })
        .collect();
    entries.sort_by_key(|entry| entry.batch.received_at);
    entries
}

/// The "last updated" stamp for one sellable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestReceipt {
    /// Batch ID, or [`LEGACY_BATCH_ID`] when synthesized from a flat
    /// record's `updatedAt`.
    pub batch_id: String,

    /// Site the stamp came from.
    pub warehouse: String,

    /// When the batch was received or the flat record last changed.
    pub received_at: DateTime<Utc>,
}

/// The most recent ledger entry across all of a unit's sites.
///
/// Sites with no ledger fall back to their `updatedAt` stamp under the
/// pseudo ID [`LEGACY_BATCH_ID`]. Returns `None` when no site has either.
/// On ties, the entry from the site listed later wins.
#[must_use]
pub fn most_recent_batch(stocks: &[WarehouseStock]) -> Option<LatestReceipt> {
    let mut candidates: Vec<LatestReceipt> = Vec::new();
    for ws in stocks {
        if ws.batches.is_empty() {
            if let Some(updated_at) = ws.updated_at {
                candidates.push(LatestReceipt {
                    batch_id: LEGACY_BATCH_ID.to_owned(),
                    warehouse: ws.warehouse.clone(),
                    received_at: updated_at,
                });
            }
        } else {
            for batch in &ws.batches {
                candidates.push(LatestReceipt {
                    batch_id: batch.id.to_string(),
                    warehouse: ws.warehouse.clone(),
                    received_at: batch.received_at,
                });
            }
        }
    }
    candidates.into_iter().max_by_key(|entry| entry.received_at)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use narra_home_core::{BatchId, Warehouse};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, d, 8, 0, 0).unwrap()
    }

    fn site_with_batches(warehouse: Warehouse, batches: Vec<Batch>) -> WarehouseStock {
        let quantity = batches.iter().map(|b| b.quantity).sum();
        WarehouseStock {
            quantity,
            batches,
            ..WarehouseStock::new(warehouse)
        }
    }

    #[test]
    fn test_listing_sorts_oldest_first_across_sites() {
        let stocks = vec![
            site_with_batches(
                Warehouse::Lorenzo,
                vec![
                    Batch::received(BatchId::from_seq(1), 5, day(3), None),
                    Batch::received(BatchId::from_seq(3), 5, day(1), None),
                ],
            ),
            site_with_batches(
                Warehouse::Oroquieta,
                vec![Batch::received(BatchId::from_seq(2), 5, day(2), None)],
            ),
        ];

        let ids: Vec<u64> = list_batches(&stocks)
            .iter()
            .filter_map(|entry| entry.batch.id.sequence())
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_listing_keeps_ledger_order_on_ties() {
        let stocks = vec![
            site_with_batches(
                Warehouse::Lorenzo,
                vec![Batch::received(BatchId::from_seq(1), 5, day(1), None)],
            ),
            site_with_batches(
                Warehouse::Oroquieta,
                vec![Batch::received(BatchId::from_seq(2), 5, day(1), None)],
            ),
        ];

        let entries = list_batches(&stocks);
        let warehouses: Vec<&str> = entries
            .iter()
            .map(|entry| entry.warehouse.as_str())
            .collect();
        assert_eq!(warehouses, vec!["Lorenzo", "Oroquieta"]);
    }

    #[test]
    fn test_listing_flags_superseded_entries() {
        let mut ws = site_with_batches(
            Warehouse::Lorenzo,
            vec![
                Batch::received(BatchId::from_seq(1), 10, day(1), None),
                Batch::correction(BatchId::from_seq(2), 8, 0, day(2), None),
                Batch::received(BatchId::from_seq(3), 4, day(3), None),
            ],
        );
        ws.quantity = 12;

        let entries = list_batches(std::slice::from_ref(&ws));
        let flags: Vec<bool> = entries.iter().map(|entry| entry.superseded).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn test_most_recent_prefers_real_batches() {
        let stocks = vec![
            site_with_batches(
                Warehouse::Lorenzo,
                vec![Batch::received(BatchId::from_seq(1), 5, day(4), None)],
            ),
            site_with_batches(
                Warehouse::Oroquieta,
                vec![Batch::received(BatchId::from_seq(2), 5, day(2), None)],
            ),
        ];

        let latest = most_recent_batch(&stocks).unwrap();
        assert_eq!(latest.batch_id, "B-000001");
        assert_eq!(latest.warehouse, "Lorenzo");
        assert_eq!(latest.received_at, day(4));
    }

    #[test]
    fn test_most_recent_falls_back_to_legacy_stamp() {
        let mut flat = WarehouseStock::new(Warehouse::Oroquieta);
        flat.quantity = 12;
        flat.updated_at = Some(day(6));

        let latest = most_recent_batch(&[flat]).unwrap();
        assert_eq!(latest.batch_id, LEGACY_BATCH_ID);
        assert_eq!(latest.received_at, day(6));
    }

    #[test]
    fn test_most_recent_is_none_without_any_stamp() {
        let flat = WarehouseStock::new(Warehouse::Lorenzo);
        assert_eq!(most_recent_batch(&[flat]), None);
        assert_eq!(most_recent_batch(&[]), None);
    }

    #[test]
    fn test_most_recent_tie_takes_later_site() {
        let stocks = vec![
            site_with_batches(
                Warehouse::Lorenzo,
                vec![Batch::received(BatchId::from_seq(1), 5, day(3), None)],
            ),
            site_with_batches(
                Warehouse::Oroquieta,
                vec![Batch::received(BatchId::from_seq(2), 5, day(3), None)],
            ),
        ];

        let latest = most_recent_batch(&stocks).unwrap();
        assert_eq!(latest.warehouse, "Oroquieta");
    }
}
