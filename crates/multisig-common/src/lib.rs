//! # Multisig Common
//!
//! Shared types, errors, and the audit log for the multisig wallet engine.
//!
//! ## Core Types
//!
//! - [`Address`]: opaque 20-byte identity for owners and call targets
//! - [`Transaction`]: a proposed action and its confirmation state
//! - [`GovernanceOp`]: owner-set and threshold changes encoded as call data
//! - [`Action`]: what executing a transaction actually does
//!
//! ## Audit
//!
//! - [`audit::WalletEvent`]: one per accepted state transition
//! - [`audit::AuditLog`]: ordered, replayable record with pluggable sinks

pub mod audit;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{DispatchError, ExecutionError, MultisigError, Result, WalletError};
pub use types::{
    address::{Address, AddressError, Owner},
    governance::{Action, GovernanceOp, PayloadError},
    transaction::{Transaction, TransactionView, TxId},
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
