use serde::{Deserialize, Serialize};

/// Column headers of the ledger CSV, fixed by the downstream loader.
pub const LEDGER_COLUMNS: [&str; 4] = ["IDDTE", "ERROR", "FECHA", "STATUS"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStatus {
    Success,
    Error,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Success => "SUCCESS",
            RowStatus::Error => "Error",
        }
    }
}

/// One ledger row: `[identifier, error message, timestamp, status]`.
/// Success rows carry empty message and timestamp fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub identifier: String,
    pub message: String,
    pub timestamp: String,
    pub status: RowStatus,
}

/// Ordered, append-only record of everything that happened during one run.
/// Entries are never mutated; the whole ledger is flushed to CSV at the end.
#[derive(Debug, Default)]
pub struct RunLedger {
    entries: Vec<LedgerEntry>,
}

impl RunLedger {
    pub fn new() -> Self {
        RunLedger::default()
    }

    /// Record an error scoped to `identifier` (empty when no identifier is
    /// attributable, e.g. sheet-level and run-level failures).
    pub fn error(&mut self, identifier: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.entries.push(LedgerEntry {
            identifier: identifier.into(),
            message,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            status: RowStatus::Error,
        });
    }

    pub fn success(&mut self, identifier: impl Into<String>) {
        self.entries.push(LedgerEntry {
            identifier: identifier.into(),
            message: String::new(),
            timestamp: String::new(),
            status: RowStatus::Success,
        });
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == RowStatus::Error)
            .count()
    }

    pub fn success_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == RowStatus::Success)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_chronological_order() {
        let mut ledger = RunLedger::new();
        ledger.error("", "bad sheet");
        ledger.success("100");
        ledger.success("200");
        let entries = ledger.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].status, RowStatus::Error);
        assert_eq!(entries[1].identifier, "100");
        assert_eq!(entries[2].identifier, "200");
        assert_eq!(ledger.error_count(), 1);
        assert_eq!(ledger.success_count(), 2);
    }

    #[test]
    fn success_rows_have_empty_message_and_timestamp() {
        let mut ledger = RunLedger::new();
        ledger.success("1");
        let entry = &ledger.entries()[0];
        assert!(entry.message.is_empty());
        assert!(entry.timestamp.is_empty());
        assert_eq!(entry.status.as_str(), "SUCCESS");
    }

    #[test]
    fn error_rows_are_timestamped() {
        let mut ledger = RunLedger::new();
        ledger.error("5", "boom");
        let entry = &ledger.entries()[0];
        assert_eq!(entry.status.as_str(), "Error");
        // %Y-%m-%d %H:%M:%S
        assert_eq!(entry.timestamp.len(), 19);
    }
}
