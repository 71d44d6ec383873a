//! Audit log - ordered, replayable record of accepted wallet transitions
//!
//! The log is append-only and sequenced. Records are fanned out to sinks as
//! they are appended; the in-memory record list is always authoritative.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use super::event::{AuditCategory, AuditRecord, WalletEvent};

/// Audit log sink
pub trait AuditSink: Send + Sync {
    /// Write an audit record
    fn write(&self, record: &AuditRecord);

    /// Flush pending records
    fn flush(&self);
}

/// Tracing audit sink: one structured log line per record
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn write(&self, record: &AuditRecord) {
        let actor = record
            .event
            .actor()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());

        info!(
            target: "multisig::audit",
            sequence = record.sequence,
            category = %record.event.category(),
            event = record.event.name(),
            actor = %actor,
            "{}",
            record.to_json()
        );
    }

    fn flush(&self) {
        // Tracing output is immediate
    }
}

/// In-memory sink, shared with whoever wants to read it back
#[derive(Clone, Default)]
pub struct MemoryAuditSink {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn write(&self, record: &AuditRecord) {
        self.records.write().push(record.clone());
    }

    fn flush(&self) {}
}

/// Audit log
pub struct AuditLog {
    records: RwLock<Vec<AuditRecord>>,
    sinks: Vec<Box<dyn AuditSink>>,
    /// Categories forwarded to sinks (empty = all)
    enabled_categories: Vec<AuditCategory>,
}

impl AuditLog {
    /// Create an audit log with no sinks
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            sinks: Vec::new(),
            enabled_categories: vec![],
        }
    }

    /// Create an audit log echoing to tracing
    pub fn with_tracing() -> Self {
        let mut log = Self::new();
        log.add_sink(Box::new(TracingAuditSink));
        log
    }

    /// Add a sink
    pub fn add_sink(&mut self, sink: Box<dyn AuditSink>) {
        self.sinks.push(sink);
    }

    /// Restrict which categories reach the sinks. The record list keeps everything.
    pub fn set_enabled_categories(&mut self, categories: Vec<AuditCategory>) {
        self.enabled_categories = categories;
    }

    /// Append an event and return its sequence number
    pub fn append(&self, event: WalletEvent) -> u64 {
        let mut records = self.records.write();
        let sequence = records.len() as u64;
        let record = AuditRecord::new(sequence, event);

        let forward = self.enabled_categories.is_empty()
            || self.enabled_categories.contains(&record.event.category());
        if forward {
            for sink in &self.sinks {
                sink.write(&record);
            }
        }

        records.push(record);
        sequence
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True if nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// All records in order
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }

    /// Records with `sequence >= from`
    pub fn since(&self, from: u64) -> Vec<AuditRecord> {
        let records = self.records.read();
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(records.len());
        records[start..].to_vec()
    }

    /// Newline-delimited JSON export
    pub fn to_json_lines(&self) -> String {
        self.records
            .read()
            .iter()
            .map(AuditRecord::to_json)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Flush all sinks
    pub fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("records", &self.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::address::Address;

    fn deposit(amount: u128) -> WalletEvent {
        WalletEvent::Deposit {
            from: Address::from_low_u64(1),
            amount,
            balance: amount,
        }
    }

    #[test]
    fn test_sequences_are_dense() {
        let log = AuditLog::new();
        assert!(log.is_empty());
        assert_eq!(log.append(deposit(1)), 0);
        assert_eq!(log.append(deposit(2)), 1);
        assert_eq!(log.append(deposit(3)), 2);

        let seqs: Vec<u64> = log.records().iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_since() {
        let log = AuditLog::new();
        for i in 0..5 {
            log.append(deposit(i + 1));
        }
        assert_eq!(log.since(3).len(), 2);
        assert_eq!(log.since(3)[0].sequence, 3);
        assert!(log.since(99).is_empty());
    }

    #[test]
    fn test_memory_sink_and_category_filter() {
        let sink = MemoryAuditSink::new();
        let mut log = AuditLog::new();
        log.add_sink(Box::new(sink.clone()));
        log.set_enabled_categories(vec![AuditCategory::Governance]);

        log.append(deposit(10));
        log.append(WalletEvent::RequirementChanged {
            tx_id: 0,
            required: 1,
        });

        assert_eq!(log.len(), 2);
        let forwarded = sink.records();
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0].event.name(), "RequirementChanged");
    }

    #[test]
    fn test_json_lines() {
        let log = AuditLog::with_tracing();
        log.append(deposit(1));
        log.append(deposit(2));
        let out = log.to_json_lines();
        assert_eq!(out.lines().count(), 2);
        log.flush();
    }
}
