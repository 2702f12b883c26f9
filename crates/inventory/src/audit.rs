//! Audit trail plumbing.
//!
//! The engine never writes audit records itself. Every mutation returns a
//! [`StockMutation`] summary, and the caller is expected to pair each
//! successful mutation with exactly one [`AuditSink::record`] call before
//! moving on. Skipping the pairing loses history silently, which is why
//! the CLI treats a failed audit write as a command failure.

use chrono::{DateTime, Utc};
use narra_home_core::ProductId;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::mutation::{StockMutation, StockOperation, StockTarget};

/// Errors from an audit sink.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink could not be written.
    #[error("audit I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The entry could not be encoded.
    #[error("audit entry could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One audit record: who changed which product's stock, and how.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique entry ID.
    pub id: Uuid,

    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,

    /// Operator the caller attributes the change to.
    pub actor: String,

    /// Product that changed.
    pub product_id: ProductId,

    /// The sellable unit that changed.
    pub target: StockTarget,

    /// What kind of write happened.
    pub operation: StockOperation,

    /// Human-readable summary of the change.
    pub detail: String,
}

impl AuditEntry {
    /// Build the entry for one successful mutation.
    #[must_use]
    pub fn from_mutation(actor: impl Into<String>, mutation: &StockMutation) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            actor: actor.into(),
            product_id: mutation.product_id,
            target: mutation.target.clone(),
            operation: mutation.operation,
            detail: mutation.to_string(),
        }
    }
}

/// Destination for audit entries.
pub trait AuditSink {
    /// Record one entry.
    ///
    /// # Errors
    ///
    /// Fails when the sink cannot persist the entry.
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError>;
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Vec<AuditEntry>,
}

impl MemoryAuditLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries recorded so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        self.entries.push(entry.clone());
        Ok(())
    }
}
