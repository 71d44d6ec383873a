//! Audit module
//!
//! - Wallet events and sequenced records
//! - Replayable log with pluggable sinks

pub mod event;
pub mod log;

pub use event::{AuditCategory, AuditRecord, WalletEvent};
pub use log::{AuditLog, AuditSink, MemoryAuditSink, TracingAuditSink};
