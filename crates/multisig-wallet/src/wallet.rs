//! MultiSigWallet - the operation surface consumed by dashboards and services
//!
//! All mutations of one wallet are serialized behind a single write lock,
//! held for the whole operation including any awaited dispatch. Queries take
//! the read lock and observe either the state before or after a mutation,
//! never a partially applied one. Audit records are appended while the write
//! lock is held, so their order is the mutation order.

use std::sync::Arc;

use multisig_common::audit::{AuditLog, TracingAuditSink, WalletEvent};
use multisig_common::{
    Address, GovernanceOp, Owner, Result, Transaction, TransactionView, TxId, WalletError,
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::WalletConfig;
use crate::dispatch::Dispatcher;
use crate::engine::ConfirmationEngine;
use crate::governance::GovernanceGateway;
use crate::snapshot::WalletSnapshot;
use crate::state::WalletState;

/// A quorum-gated wallet
pub struct MultiSigWallet {
    wallet: Address,
    state: RwLock<WalletState>,
    dispatcher: Arc<dyn Dispatcher>,
    audit: AuditLog,
}

impl MultiSigWallet {
    /// Create a wallet from configuration
    pub fn new(config: &WalletConfig, dispatcher: Arc<dyn Dispatcher>) -> Result<Self> {
        Self::with_audit_log(config, dispatcher, AuditLog::new())
    }

    /// Create a wallet that records into `audit`
    pub fn with_audit_log(
        config: &WalletConfig,
        dispatcher: Arc<dyn Dispatcher>,
        mut audit: AuditLog,
    ) -> Result<Self> {
        let state = WalletState::new(
            config.wallet_address,
            config.owners.clone(),
            config.required,
            config.initial_balance,
        )?;

        if config.audit.echo_to_tracing {
            audit.add_sink(Box::new(TracingAuditSink));
        }
        audit.append(state.genesis_event());

        info!(
            wallet = %config.wallet_address,
            owners = config.owners.len(),
            required = config.required,
            "Wallet created"
        );
        Ok(Self::from_parts(state, dispatcher, audit))
    }

    /// Resume from a snapshot. The audit log starts empty.
    ///
    /// Replay needs a log that starts at `WalletCreated`, so a restored
    /// wallet's own log cannot be replayed on its own.
    pub fn restore(
        snapshot: WalletSnapshot,
        dispatcher: Arc<dyn Dispatcher>,
        audit: AuditLog,
    ) -> Result<Self> {
        let state = snapshot.restore()?;
        info!(
            wallet = %state.wallet(),
            transactions = state.ledger().count(),
            "Wallet restored from snapshot"
        );
        Ok(Self::from_parts(state, dispatcher, audit))
    }

    fn from_parts(state: WalletState, dispatcher: Arc<dyn Dispatcher>, audit: AuditLog) -> Self {
        Self {
            wallet: state.wallet(),
            state: RwLock::new(state),
            dispatcher,
            audit,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The wallet's own identity
    pub fn wallet_address(&self) -> Address {
        self.wallet
    }

    /// The audit log
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Owners in insertion order
    pub async fn list_owners(&self) -> Vec<Owner> {
        self.state.read().await.registry().list_owners()
    }

    pub async fn is_owner(&self, addr: &Address) -> bool {
        self.state.read().await.registry().is_owner(addr)
    }

    /// Current quorum threshold
    pub async fn required_signatures(&self) -> u32 {
        self.state.read().await.registry().required()
    }

    pub async fn transaction_count(&self) -> u64 {
        self.state.read().await.ledger().count()
    }

    pub async fn balance(&self) -> u128 {
        self.state.read().await.balance()
    }

    /// Read model of transaction `id`
    pub async fn get_transaction(&self, id: TxId) -> std::result::Result<TransactionView, WalletError> {
        let state = self.state.read().await;
        let view = state.ledger().get(id)?.view();
        debug!(id, confirmations = view.confirmation_count, "Transaction read");
        Ok(view)
    }

    /// Full record of transaction `id`
    pub async fn transaction(&self, id: TxId) -> std::result::Result<Transaction, WalletError> {
        self.state.read().await.ledger().get(id).cloned()
    }

    pub async fn is_confirmed(
        &self,
        id: TxId,
        owner: &Owner,
    ) -> std::result::Result<bool, WalletError> {
        Ok(self.state.read().await.ledger().get(id)?.is_confirmed_by(owner))
    }

    /// Confirming owners of `id`, in confirmation order
    pub async fn confirmations(&self, id: TxId) -> std::result::Result<Vec<Owner>, WalletError> {
        Ok(self.state.read().await.ledger().get(id)?.confirmed_by.clone())
    }

    /// Ids of transactions not yet executed
    pub async fn pending_transactions(&self) -> Vec<TxId> {
        self.state.read().await.ledger().pending_ids()
    }

    /// Durable copy of the current state
    pub async fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot::capture(&*self.state.read().await)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Credit incoming funds. Anyone may deposit.
    #[instrument(skip(self), fields(wallet = %self.wallet))]
    pub async fn deposit(&self, from: Address, amount: u128) -> std::result::Result<(), WalletError> {
        let mut state = self.state.write().await;
        let event = rejected("deposit", &from, state.deposit(from, amount))?;
        self.record(event);
        Ok(())
    }

    /// Propose an action. Returns the new transaction id.
    #[instrument(skip(self, payload), fields(wallet = %self.wallet, payload_len = payload.len()))]
    pub async fn submit_transaction(
        &self,
        caller: Owner,
        destination: Address,
        value: u128,
        payload: Vec<u8>,
    ) -> std::result::Result<TxId, WalletError> {
        let mut state = self.state.write().await;
        let (id, event) = rejected(
            "submit",
            &caller,
            ConfirmationEngine::submit(&mut state, caller, destination, value, payload),
        )?;
        self.record(event);
        Ok(id)
    }

    /// Propose a governance change as a self-call
    pub async fn submit_governance(
        &self,
        caller: Owner,
        op: GovernanceOp,
    ) -> std::result::Result<TxId, WalletError> {
        let proposal = GovernanceGateway::proposal(self.wallet, &op);
        self.submit_transaction(caller, proposal.destination, proposal.value, proposal.payload)
            .await
    }

    #[instrument(skip(self), fields(wallet = %self.wallet))]
    pub async fn confirm_transaction(
        &self,
        caller: Owner,
        id: TxId,
    ) -> std::result::Result<(), WalletError> {
        let mut state = self.state.write().await;
        let event = rejected("confirm", &caller, ConfirmationEngine::confirm(&mut state, caller, id))?;
        self.record(event);
        Ok(())
    }

    #[instrument(skip(self), fields(wallet = %self.wallet))]
    pub async fn revoke_confirmation(
        &self,
        caller: Owner,
        id: TxId,
    ) -> std::result::Result<(), WalletError> {
        let mut state = self.state.write().await;
        let event = rejected("revoke", &caller, ConfirmationEngine::revoke(&mut state, caller, id))?;
        self.record(event);
        Ok(())
    }

    /// Execute a quorate transaction. Any owner may call this.
    ///
    /// Dropping the returned future mid-dispatch leaves the transaction
    /// unexecuted; see [`Dispatcher`] for redelivery.
    #[instrument(skip(self), fields(wallet = %self.wallet))]
    pub async fn execute_transaction(
        &self,
        caller: Owner,
        id: TxId,
    ) -> std::result::Result<(), WalletError> {
        let mut state = self.state.write().await;
        let result =
            ConfirmationEngine::execute(&mut state, self.dispatcher.as_ref(), caller, id).await;
        let events = rejected("execute", &caller, result)?;
        for event in events {
            self.record(event);
        }
        Ok(())
    }

    fn record(&self, event: WalletEvent) {
        self.audit.append(event);
    }
}

impl std::fmt::Debug for MultiSigWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSigWallet")
            .field("wallet", &self.wallet)
            .field("audit", &self.audit)
            .finish()
    }
}

fn rejected<T>(
    op: &'static str,
    caller: &Address,
    result: std::result::Result<T, WalletError>,
) -> std::result::Result<T, WalletError> {
    if let Err(err) = &result {
        warn!(op, caller = %caller, error = %err, "Operation rejected");
    }
    result
}
