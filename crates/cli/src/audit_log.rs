//! Append-only JSONL audit sink.
//!
//! Every mutation command appends one JSON object per line to the audit
//! file named by `NARRA_AUDIT_LOG`. The file is opened per record, so the
//! log survives across invocations and a crashed command never leaves a
//! half-open handle behind.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use narra_home_inventory::audit::{AuditEntry, AuditError, AuditSink};

/// Audit sink that appends entries to a JSONL file.
#[derive(Debug, Clone)]
pub struct JsonlAuditLog {
    path: PathBuf,
}

impl JsonlAuditLog {
    /// Create a sink that appends to the given path.
    ///
    /// The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AuditSink for JsonlAuditLog {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        // Serialize before opening the file so an encode failure leaves
        // the log untouched.
        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use narra_home_core::{ProductId, Warehouse};
    use narra_home_inventory::audit::AuditEntry;
    use narra_home_inventory::mutation::{StockMutation, StockOperation, StockTarget};

    use super::*;

    fn sample_entry(actor: &str) -> AuditEntry {
        let mutation = StockMutation {
            product_id: ProductId::new(7),
            product_name: "Narra Sleigh Bed".to_string(),
            target: StockTarget::Product,
            operation: StockOperation::Restock,
            warehouse: Some(Warehouse::Lorenzo),
            quantity_before: 0,
            reserved_before: 0,
            quantity_after: 5,
            reserved_after: 0,
            batch_id: None,
        };
        AuditEntry::from_mutation(actor, &mutation)
    }

    #[test]
    fn test_appends_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut log = JsonlAuditLog::new(&path);

        log.record(&sample_entry("maria")).unwrap();
        log.record(&sample_entry("jun")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["actor"], "maria");
        assert_eq!(first["operation"], "RESTOCK");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["actor"], "jun");
    }

    #[test]
    fn test_survives_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        std::fs::write(&path, "{\"actor\":\"earlier\"}\n").unwrap();

        let mut log = JsonlAuditLog::new(&path);
        log.record(&sample_entry("maria")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("{\"actor\":\"earlier\"}\n"));
    }
}
