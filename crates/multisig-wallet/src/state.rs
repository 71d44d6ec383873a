//! Wallet state - the aggregate root guarded by the wallet's single lock
//!
//! Holds the owner registry, the transaction ledger, and the native balance.
//! Also rebuilds state from an audit log.

use multisig_common::audit::{AuditCategory, AuditRecord, WalletEvent};
use multisig_common::{Action, Address, Owner, Transaction, WalletError};

use crate::governance::GovernanceGateway;
use crate::ledger::TransactionLedger;
use crate::registry::OwnerRegistry;
use crate::snapshot::SnapshotError;

/// Aggregate wallet state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletState {
    pub(crate) registry: OwnerRegistry,
    pub(crate) ledger: TransactionLedger,
    pub(crate) balance: u128,
}

impl WalletState {
    /// Create a wallet with a validated owner set and no transactions
    pub fn new(
        wallet: Address,
        owners: Vec<Owner>,
        required: u32,
        balance: u128,
    ) -> Result<Self, WalletError> {
        Ok(Self {
            registry: OwnerRegistry::new(wallet, owners, required)?,
            ledger: TransactionLedger::new(),
            balance,
        })
    }

    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    #[inline]
    pub fn balance(&self) -> u128 {
        self.balance
    }

    #[inline]
    pub fn wallet(&self) -> Address {
        self.registry.wallet()
    }

    /// Event describing this state as a starting point
    pub fn genesis_event(&self) -> WalletEvent {
        WalletEvent::WalletCreated {
            wallet: self.wallet(),
            owners: self.registry.list_owners(),
            required: self.registry.required(),
            balance: self.balance,
        }
    }

    /// Credit incoming funds. Open to any sender.
    pub fn deposit(&mut self, from: Address, amount: u128) -> Result<WalletEvent, WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(WalletError::InvalidAmount)?;
        Ok(WalletEvent::Deposit {
            from,
            amount,
            balance: self.balance,
        })
    }

    /// Rebuild state from a complete audit log.
    ///
    /// The first record must be `WalletCreated`. Every later record is applied
    /// with the same rules the live engine uses, and the values it carries are
    /// checked against the rebuilt state. A governance record must be followed
    /// by the `TransactionExecuted` of the quorate self-call that produced it.
    pub fn replay(records: &[AuditRecord]) -> Result<Self, SnapshotError> {
        let first = records.first().ok_or(SnapshotError::Replay {
            sequence: 0,
            reason: "audit log is empty".to_string(),
        })?;

        let mut state = match &first.event {
            WalletEvent::WalletCreated {
                wallet,
                owners,
                required,
                balance,
            } => WalletState::new(*wallet, owners.clone(), *required, *balance)
                .map_err(|e| replay_error(first, e.to_string()))?,
            other => {
                return Err(replay_error(
                    first,
                    format!("expected WalletCreated, found {}", other.name()),
                ))
            }
        };

        let mut index = 1;
        while index < records.len() {
            let record = sequenced(records, index)?;
            if record.event.category() == AuditCategory::Governance {
                let executed = records.get(index + 1).ok_or_else(|| {
                    replay_error(record, "governance change without its execution".to_string())
                })?;
                sequenced(records, index + 1)?;
                state.replay_execution(Some(record), executed)?;
                index += 2;
            } else {
                state.apply_recorded(record)?;
                index += 1;
            }
        }

        Ok(state)
    }

    fn apply_recorded(&mut self, record: &AuditRecord) -> Result<(), SnapshotError> {
        let fail = |reason: String| replay_error(record, reason);

        match &record.event {
            WalletEvent::WalletCreated { .. } => {
                return Err(fail("WalletCreated after genesis".to_string()));
            }
            WalletEvent::OwnerAdded { .. }
            | WalletEvent::OwnerRemoved { .. }
            | WalletEvent::RequirementChanged { .. } => {
                return Err(fail("governance change outside an execution".to_string()));
            }
            WalletEvent::Deposit {
                from,
                amount,
                balance,
            } => {
                self.deposit(*from, *amount).map_err(|e| fail(e.to_string()))?;
                if self.balance != *balance {
                    return Err(fail(format!("balance {} != {}", self.balance, balance)));
                }
            }
            WalletEvent::TransactionSubmitted {
                id,
                owner,
                destination,
                value,
                payload,
                submitted_at,
            } => {
                self.registry
                    .ensure_owner(owner)
                    .map_err(|e| fail(e.to_string()))?;
                let mut tx = Transaction::new(*id, *destination, *value, payload.clone(), *owner);
                tx.submitted_at = *submitted_at;
                self.ledger
                    .append(tx)
                    .map_err(|tx| fail(format!("out-of-order transaction id {}", tx.id)))?;
            }
            WalletEvent::TransactionConfirmed {
                id,
                owner,
                confirmations,
            } => {
                self.registry
                    .ensure_owner(owner)
                    .map_err(|e| fail(e.to_string()))?;
                let tx = self.ledger.get_mut(*id).map_err(|e| fail(e.to_string()))?;
                if tx.executed || !tx.add_confirmation(*owner) || tx.confirmation_count != *confirmations {
                    return Err(fail(format!("confirmation of {} by {} does not apply", id, owner)));
                }
            }
            WalletEvent::TransactionRevoked {
                id,
                owner,
                confirmations,
            } => {
                self.registry
                    .ensure_owner(owner)
                    .map_err(|e| fail(e.to_string()))?;
                let tx = self.ledger.get_mut(*id).map_err(|e| fail(e.to_string()))?;
                if tx.executed || !tx.remove_confirmation(owner) || tx.confirmation_count != *confirmations {
                    return Err(fail(format!("revocation of {} by {} does not apply", id, owner)));
                }
            }
            WalletEvent::TransactionExecuted { .. } => self.replay_execution(None, record)?,
        }
        Ok(())
    }

    /// Re-run the execute checks for `executed`. `governance` is the change
    /// recorded just before it, present exactly when the transaction is a
    /// self-call.
    fn replay_execution(
        &mut self,
        governance: Option<&AuditRecord>,
        executed: &AuditRecord,
    ) -> Result<(), SnapshotError> {
        let fail = |reason: String| replay_error(executed, reason);

        let WalletEvent::TransactionExecuted {
            id,
            executor,
            destination,
            value,
            balance,
            executed_at,
        } = &executed.event
        else {
            return Err(fail(format!(
                "expected TransactionExecuted, found {}",
                executed.event.name()
            )));
        };

        // Checked before any governance change, as the live engine does
        self.registry
            .ensure_owner(executor)
            .map_err(|e| fail(e.to_string()))?;

        let wallet = self.wallet();
        let required = self.registry.required();
        let tx = self.ledger.get(*id).map_err(|e| fail(e.to_string()))?;
        if tx.executed {
            return Err(fail(format!("transaction {} executed twice", id)));
        }
        if !tx.is_quorate(required) {
            return Err(fail(format!(
                "transaction {} executed with {} of {} confirmations",
                id, tx.confirmation_count, required
            )));
        }
        if tx.destination != *destination || tx.value != *value {
            return Err(fail(format!(
                "transaction {} executed with a different destination or value",
                id
            )));
        }
        let action = tx.action(&wallet).map_err(|e| fail(e.to_string()))?;

        match (action, governance) {
            (Action::Governance(op), Some(recorded)) => {
                if *value != 0 {
                    return Err(fail(format!("governance transaction {} carries value", id)));
                }
                let applied = GovernanceGateway::apply(self, *id, op)
                    .map_err(|e| replay_error(recorded, e.to_string()))?;
                if applied != recorded.event {
                    return Err(replay_error(
                        recorded,
                        format!("recorded change does not match transaction {}", id),
                    ));
                }
            }
            (Action::Governance(_), None) => {
                return Err(fail(format!(
                    "governance transaction {} executed without its change",
                    id
                )));
            }
            (Action::Transfer { .. }, Some(recorded)) => {
                return Err(replay_error(
                    recorded,
                    format!("governance change recorded for transfer {}", id),
                ));
            }
            (Action::Transfer { value, .. }, None) => {
                self.balance = self
                    .balance
                    .checked_sub(value)
                    .ok_or_else(|| fail(format!("balance underflow executing {}", id)))?;
            }
        }

        if self.balance != *balance {
            return Err(fail(format!("balance {} != {}", self.balance, balance)));
        }
        self.ledger
            .get_mut(*id)
            .map_err(|e| fail(e.to_string()))?
            .mark_executed(*executed_at);
        Ok(())
    }
}

fn sequenced(records: &[AuditRecord], index: usize) -> Result<&AuditRecord, SnapshotError> {
    let record = &records[index];
    if record.sequence != index as u64 {
        return Err(replay_error(record, "sequence gap".to_string()));
    }
    Ok(record)
}

fn replay_error(record: &AuditRecord, reason: String) -> SnapshotError {
    SnapshotError::Replay {
        sequence: record.sequence,
        reason,
    }
}
