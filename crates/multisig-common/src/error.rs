//! Error types for the multisig wallet engine
//!
//! Provides a unified error type and the domain-specific wallet taxonomy

use thiserror::Error;

use crate::types::address::{Address, AddressError};
use crate::types::governance::PayloadError;
use crate::types::transaction::TxId;

/// Result type alias using MultisigError
pub type Result<T> = std::result::Result<T, MultisigError>;

/// Unified error type for multisig operations
#[derive(Debug, Error)]
pub enum MultisigError {
    // Wallet state machine errors
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    // Identity parsing errors
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Snapshot / persistence errors
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

/// Every way a wallet operation can be rejected.
///
/// No variant is retried by the engine and none leaves state partially
/// written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Caller {0} is not an owner")]
    NotOwner(Address),

    #[error("{0} is already an owner")]
    AlreadyOwner(Address),

    #[error("{0} cannot be an owner")]
    InvalidOwner(Address),

    #[error("Removing an owner would leave {remaining} owners for {required} required signatures")]
    OwnerCountBelowThreshold { remaining: usize, required: u32 },

    #[error("Invalid requirement {required} for {owners} owners")]
    InvalidRequirement { required: u32, owners: usize },

    #[error("Transaction {0} not found")]
    TransactionNotFound(TxId),

    #[error("Transaction {id} already confirmed by {owner}")]
    AlreadyConfirmed { id: TxId, owner: Address },

    #[error("Transaction {id} not confirmed by {owner}")]
    NotConfirmed { id: TxId, owner: Address },

    #[error("Transaction {0} already executed")]
    AlreadyExecuted(TxId),

    #[error("Insufficient confirmations for transaction {id}: {confirmations} of {required}")]
    InsufficientConfirmations {
        id: TxId,
        confirmations: u32,
        required: u32,
    },

    #[error("Deposit amount must be positive")]
    InvalidAmount,

    #[error("Execution of transaction {id} failed: {cause}")]
    ExecutionFailed { id: TxId, cause: ExecutionError },
}

impl WalletError {
    /// The execution cause, if this is an `ExecutionFailed`
    pub fn execution_cause(&self) -> Option<&ExecutionError> {
        match self {
            WalletError::ExecutionFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Why the effect of a quorate transaction could not be committed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("insufficient funds: value {value}, balance {balance}")]
    InsufficientFunds { value: u128, balance: u128 },

    #[error("malformed governance payload: {0}")]
    MalformedGovernance(#[from] PayloadError),

    #[error("governance transaction carries nonzero value {0}")]
    GovernanceValueNotZero(u128),

    #[error("governance change rejected: {0}")]
    GovernanceRejected(Box<WalletError>),
}

/// Failure reported by an external call target
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("destination {destination} rejected the call: {reason}")]
    Rejected { destination: Address, reason: String },

    #[error("destination unreachable: {0}")]
    Unreachable(String),
}
