//! Wallet snapshots - durable state layout
//!
//! A snapshot is the owner list, the threshold, the balance, and the full
//! transaction sequence. Restoring re-checks every state invariant instead of
//! trusting the input.

use std::collections::HashSet;

use multisig_common::{Address, MultisigError, Owner, Transaction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::TransactionLedger;
use crate::registry::OwnerRegistry;
use crate::state::WalletState;

/// Snapshot and replay errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Snapshot violates invariant: {0}")]
    Invariant(String),

    #[error("Replay failed at record {sequence}: {reason}")]
    Replay { sequence: u64, reason: String },

    #[error("Snapshot encoding error: {0}")]
    Encoding(String),
}

impl From<SnapshotError> for MultisigError {
    fn from(err: SnapshotError) -> Self {
        MultisigError::Snapshot(err.to_string())
    }
}

/// Serializable wallet state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub wallet: Address,
    pub owners: Vec<Owner>,
    pub required: u32,
    pub balance: u128,
    pub transactions: Vec<Transaction>,
}

impl WalletSnapshot {
    /// Capture `state`
    pub fn capture(state: &WalletState) -> Self {
        Self {
            wallet: state.wallet(),
            owners: state.registry().list_owners(),
            required: state.registry().required(),
            balance: state.balance(),
            transactions: state.ledger().iter().cloned().collect(),
        }
    }

    /// Rebuild state, validating every invariant
    pub fn restore(self) -> Result<WalletState, SnapshotError> {
        let registry = OwnerRegistry::new(self.wallet, self.owners, self.required)
            .map_err(|e| SnapshotError::Invariant(e.to_string()))?;

        let mut ledger = TransactionLedger::new();
        for tx in self.transactions {
            validate_transaction(&tx, &registry)?;
            ledger.append(tx).map_err(|tx| {
                SnapshotError::Invariant(format!("transaction id {} out of sequence", tx.id))
            })?;
        }

        Ok(WalletState {
            registry,
            ledger,
            balance: self.balance,
        })
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Encoding(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Encoding(e.to_string()))
    }
}

fn validate_transaction(tx: &Transaction, registry: &OwnerRegistry) -> Result<(), SnapshotError> {
    let invariant = |reason: String| SnapshotError::Invariant(format!("transaction {}: {}", tx.id, reason));

    let unique: HashSet<&Owner> = tx.confirmed_by.iter().collect();
    if unique.len() != tx.confirmed_by.len() {
        return Err(invariant("duplicate confirmation".to_string()));
    }
    if tx.confirmation_count as usize != tx.confirmed_by.len() {
        return Err(invariant(format!(
            "confirmation_count {} != {} confirmers",
            tx.confirmation_count,
            tx.confirmed_by.len()
        )));
    }
    if tx.executed != tx.executed_at.is_some() {
        return Err(invariant("executed flag and timestamp disagree".to_string()));
    }
    // Pending confirmations only ever come from current owners
    if !tx.executed {
        if let Some(stale) = tx.confirmed_by.iter().find(|o| !registry.is_owner(o)) {
            return Err(invariant(format!("pending confirmation from non-owner {}", stale)));
        }
    }
    Ok(())
}
