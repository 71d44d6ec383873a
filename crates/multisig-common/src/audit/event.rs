//! Wallet audit events
//!
//! One event per accepted state transition. Each carries the resulting values
//! so a consumer can rebuild wallet state without reading it directly.

use serde::{Deserialize, Serialize};

use crate::types::address::{Address, Owner};
use crate::types::transaction::{hex_bytes, TxId};

/// Audit event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditCategory {
    /// Wallet creation
    Lifecycle,
    /// Incoming funds
    Funds,
    /// Owner set and threshold changes
    Governance,
    /// Submission, confirmation, revocation, execution
    Transaction,
}

impl std::fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditCategory::Lifecycle => write!(f, "LIFECYCLE"),
            AuditCategory::Funds => write!(f, "FUNDS"),
            AuditCategory::Governance => write!(f, "GOV"),
            AuditCategory::Transaction => write!(f, "TX"),
        }
    }
}

/// An accepted wallet state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletEvent {
    WalletCreated {
        wallet: Address,
        owners: Vec<Owner>,
        required: u32,
        balance: u128,
    },
    Deposit {
        from: Address,
        amount: u128,
        balance: u128,
    },
    OwnerAdded {
        tx_id: TxId,
        owner: Owner,
    },
    /// `invalidated` lists pending transactions that lost this owner's confirmation
    OwnerRemoved {
        tx_id: TxId,
        owner: Owner,
        invalidated: Vec<TxId>,
    },
    RequirementChanged {
        tx_id: TxId,
        required: u32,
    },
    TransactionSubmitted {
        id: TxId,
        owner: Owner,
        destination: Address,
        value: u128,
        #[serde(with = "hex_bytes")]
        payload: Vec<u8>,
        submitted_at: i64,
    },
    TransactionConfirmed {
        id: TxId,
        owner: Owner,
        confirmations: u32,
    },
    TransactionRevoked {
        id: TxId,
        owner: Owner,
        confirmations: u32,
    },
    TransactionExecuted {
        id: TxId,
        executor: Owner,
        destination: Address,
        value: u128,
        balance: u128,
        executed_at: i64,
    },
}

impl WalletEvent {
    /// Event name as consumed by dashboards
    pub fn name(&self) -> &'static str {
        match self {
            WalletEvent::WalletCreated { .. } => "WalletCreated",
            WalletEvent::Deposit { .. } => "Deposit",
            WalletEvent::OwnerAdded { .. } => "OwnerAdded",
            WalletEvent::OwnerRemoved { .. } => "OwnerRemoved",
            WalletEvent::RequirementChanged { .. } => "RequirementChanged",
            WalletEvent::TransactionSubmitted { .. } => "TransactionSubmitted",
            WalletEvent::TransactionConfirmed { .. } => "TransactionConfirmed",
            WalletEvent::TransactionRevoked { .. } => "TransactionRevoked",
            WalletEvent::TransactionExecuted { .. } => "TransactionExecuted",
        }
    }

    /// Event category
    pub fn category(&self) -> AuditCategory {
        match self {
            WalletEvent::WalletCreated { .. } => AuditCategory::Lifecycle,
            WalletEvent::Deposit { .. } => AuditCategory::Funds,
            WalletEvent::OwnerAdded { .. }
            | WalletEvent::OwnerRemoved { .. }
            | WalletEvent::RequirementChanged { .. } => AuditCategory::Governance,
            WalletEvent::TransactionSubmitted { .. }
            | WalletEvent::TransactionConfirmed { .. }
            | WalletEvent::TransactionRevoked { .. }
            | WalletEvent::TransactionExecuted { .. } => AuditCategory::Transaction,
        }
    }

    /// Acting identity, where there is one
    pub fn actor(&self) -> Option<Address> {
        match self {
            WalletEvent::WalletCreated { .. }
            | WalletEvent::OwnerAdded { .. }
            | WalletEvent::OwnerRemoved { .. }
            | WalletEvent::RequirementChanged { .. } => None,
            WalletEvent::Deposit { from, .. } => Some(*from),
            WalletEvent::TransactionSubmitted { owner, .. }
            | WalletEvent::TransactionConfirmed { owner, .. }
            | WalletEvent::TransactionRevoked { owner, .. } => Some(*owner),
            WalletEvent::TransactionExecuted { executor, .. } => Some(*executor),
        }
    }
}

/// A sequenced, timestamped audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Dense position in the log, starting at 0
    pub sequence: u64,

    /// Unique event ID
    pub event_id: String,

    /// Timestamp (Unix millis)
    pub timestamp: i64,

    /// The transition itself
    pub event: WalletEvent,
}

impl AuditRecord {
    /// Create a record for `event` at position `sequence`
    pub fn new(sequence: u64, event: WalletEvent) -> Self {
        Self {
            sequence,
            event_id: uuid::Uuid::now_v7().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            event,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
