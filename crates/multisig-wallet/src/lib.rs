//! # Multisig Wallet
//!
//! Quorum-gated wallet engine: a fixed-but-mutable set of owners jointly
//! authorizes outgoing transfers and calls.
//!
//! ## Components
//!
//! - **OwnerRegistry**: owners and quorum threshold
//! - **TransactionLedger**: append-only list of proposals
//! - **ConfirmationEngine**: submit / confirm / revoke / execute
//! - **GovernanceGateway**: owner and threshold changes as quorum-approved self-calls
//! - **AuditLog**: ordered, replayable record of accepted transitions
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     MultiSigWallet                      │
//! │               (one write lock per wallet)               │
//! ├─────────────────────────────────────────────────────────┤
//! │  ┌────────────────────┐      ┌───────────────────────┐  │
//! │  │ ConfirmationEngine │─────▶│   TransactionLedger   │  │
//! │  └─────────┬──────────┘      └───────────────────────┘  │
//! │            │ self-call              external call       │
//! │  ┌─────────▼──────────┐      ┌───────────────────────┐  │
//! │  │ GovernanceGateway  │      │      Dispatcher       │  │
//! │  └─────────┬──────────┘      └───────────────────────┘  │
//! │  ┌─────────▼──────────┐      ┌───────────────────────┐  │
//! │  │   OwnerRegistry    │      │       AuditLog        │  │
//! │  └────────────────────┘      └───────────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod governance;
pub mod ledger;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod telemetry;
pub mod wallet;

pub use config::{AuditSettings, ConfigError, WalletConfig};
pub use dispatch::{
    AcceptAllDispatcher, DispatchReceipt, Dispatcher, OutgoingCall, ScriptedDispatcher,
};
pub use engine::ConfirmationEngine;
pub use governance::{GovernanceGateway, GovernanceProposal};
pub use ledger::TransactionLedger;
pub use registry::OwnerRegistry;
pub use snapshot::{SnapshotError, WalletSnapshot};
pub use state::WalletState;
pub use wallet::MultiSigWallet;
