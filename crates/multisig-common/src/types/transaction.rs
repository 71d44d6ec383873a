//! Transaction - a proposed wallet action and its confirmation state
//!
//! `destination`, `value` and `payload` are fixed at submission. Only the
//! confirmation set and the `executed` flag move afterwards, and `executed`
//! only ever moves from `false` to `true`.

use serde::{Deserialize, Serialize};

use super::address::{Address, Owner};
use super::governance::{Action, GovernanceOp, PayloadError};

/// Dense, never-reused transaction index
pub type TxId = u64;

/// A proposed action awaiting or having reached quorum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Ledger index, assigned at submission
    pub id: TxId,

    /// Call target (the wallet itself for governance)
    pub destination: Address,

    /// Native value carried with the call
    pub value: u128,

    /// Opaque call data
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,

    /// Owner that submitted the transaction
    pub submitted_by: Owner,

    /// Submission timestamp (Unix millis)
    pub submitted_at: i64,

    /// Confirming owners, in confirmation order
    pub confirmed_by: Vec<Owner>,

    /// Always equal to `confirmed_by.len()`
    pub confirmation_count: u32,

    /// Terminal flag
    pub executed: bool,

    /// Execution timestamp (Unix millis)
    pub executed_at: Option<i64>,
}

impl Transaction {
    /// Create an unconfirmed transaction
    pub fn new(
        id: TxId,
        destination: Address,
        value: u128,
        payload: Vec<u8>,
        submitted_by: Owner,
    ) -> Self {
        Self {
            id,
            destination,
            value,
            payload,
            submitted_by,
            submitted_at: chrono::Utc::now().timestamp_millis(),
            confirmed_by: Vec::new(),
            confirmation_count: 0,
            executed: false,
            executed_at: None,
        }
    }

    /// Whether `owner` currently confirms this transaction
    #[inline]
    pub fn is_confirmed_by(&self, owner: &Owner) -> bool {
        self.confirmed_by.contains(owner)
    }

    /// Quorum predicate. Never stored.
    #[inline]
    pub fn is_quorate(&self, required: u32) -> bool {
        self.confirmation_count >= required
    }

    /// Record a confirmation. Returns false if `owner` already confirmed.
    pub fn add_confirmation(&mut self, owner: Owner) -> bool {
        if self.is_confirmed_by(&owner) {
            return false;
        }
        self.confirmed_by.push(owner);
        self.confirmation_count += 1;
        true
    }

    /// Drop a confirmation. Returns false if `owner` had not confirmed.
    pub fn remove_confirmation(&mut self, owner: &Owner) -> bool {
        match self.confirmed_by.iter().position(|o| o == owner) {
            Some(pos) => {
                self.confirmed_by.remove(pos);
                self.confirmation_count -= 1;
                true
            }
            None => false,
        }
    }

    /// Mark executed. Never reverts.
    pub fn mark_executed(&mut self, at: i64) {
        self.executed = true;
        self.executed_at = Some(at);
    }

    /// Derive the action this transaction performs when executed by `wallet`
    pub fn action(&self, wallet: &Address) -> Result<Action, PayloadError> {
        if self.destination == *wallet {
            return GovernanceOp::decode(&self.payload).map(Action::Governance);
        }
        Ok(Action::Transfer {
            destination: self.destination,
            value: self.value,
            payload: self.payload.clone(),
        })
    }

    /// Read model handed to external collaborators
    pub fn view(&self) -> TransactionView {
        TransactionView {
            id: self.id,
            destination: self.destination,
            value: self.value,
            payload: self.payload.clone(),
            executed: self.executed,
            confirmation_count: self.confirmation_count,
        }
    }
}

/// Read-only projection of a [`Transaction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: TxId,
    pub destination: Address,
    pub value: u128,
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
    pub executed: bool,
    pub confirmation_count: u32,
}

/// Serde helper: byte vectors as `0x`-prefixed hex
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(digits).map_err(serde::de::Error::custom)
    }
}
