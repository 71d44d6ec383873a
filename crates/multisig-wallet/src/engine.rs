//! Confirmation engine - submit, confirm, revoke, and execute
//!
//! Per transaction: Proposed -> Quorate -> Executed. "Quorate" is the
//! predicate `confirmation_count >= required`, evaluated on demand; revocation
//! can drop a transaction back below it, nothing can undo Executed.
//!
//! Every operation validates fully before it writes. On error the state is
//! exactly what it was before the call.

use multisig_common::audit::WalletEvent;
use multisig_common::{Action, Address, ExecutionError, Owner, TxId, WalletError};
use tracing::{debug, info};

use crate::dispatch::{Dispatcher, OutgoingCall};
use crate::governance::GovernanceGateway;
use crate::state::WalletState;

/// Applies owner operations to a [`WalletState`]
pub struct ConfirmationEngine;

impl ConfirmationEngine {
    /// Append a new unconfirmed transaction. The submitter is not counted as
    /// a confirmation.
    pub fn submit(
        state: &mut WalletState,
        caller: Owner,
        destination: Address,
        value: u128,
        payload: Vec<u8>,
    ) -> Result<(TxId, WalletEvent), WalletError> {
        state.registry.ensure_owner(&caller)?;

        let id = state.ledger.submit(destination, value, payload, caller);
        let tx = state.ledger.get(id)?;
        info!(id, owner = %caller, destination = %destination, value, "Transaction submitted");

        Ok((
            id,
            WalletEvent::TransactionSubmitted {
                id,
                owner: caller,
                destination: tx.destination,
                value: tx.value,
                payload: tx.payload.clone(),
                submitted_at: tx.submitted_at,
            },
        ))
    }

    /// Add `caller`'s confirmation to transaction `id`
    pub fn confirm(
        state: &mut WalletState,
        caller: Owner,
        id: TxId,
    ) -> Result<WalletEvent, WalletError> {
        state.registry.ensure_owner(&caller)?;
        let tx = state.ledger.get_mut(id)?;
        if tx.executed {
            return Err(WalletError::AlreadyExecuted(id));
        }
        if !tx.add_confirmation(caller) {
            return Err(WalletError::AlreadyConfirmed { id, owner: caller });
        }

        debug!(id, owner = %caller, confirmations = tx.confirmation_count, "Transaction confirmed");
        Ok(WalletEvent::TransactionConfirmed {
            id,
            owner: caller,
            confirmations: tx.confirmation_count,
        })
    }

    /// Withdraw `caller`'s confirmation from transaction `id`
    pub fn revoke(
        state: &mut WalletState,
        caller: Owner,
        id: TxId,
    ) -> Result<WalletEvent, WalletError> {
        state.registry.ensure_owner(&caller)?;
        let tx = state.ledger.get_mut(id)?;
        if tx.executed {
            return Err(WalletError::AlreadyExecuted(id));
        }
        if !tx.remove_confirmation(&caller) {
            return Err(WalletError::NotConfirmed { id, owner: caller });
        }

        debug!(id, owner = %caller, confirmations = tx.confirmation_count, "Confirmation revoked");
        Ok(WalletEvent::TransactionRevoked {
            id,
            owner: caller,
            confirmations: tx.confirmation_count,
        })
    }

    /// Execute a quorate transaction.
    ///
    /// Self-calls are applied through the governance gateway; anything else
    /// is handed to `dispatcher` and awaited. The effect and `executed = true`
    /// are committed together or not at all. Returns the events to record, in
    /// order.
    pub async fn execute(
        state: &mut WalletState,
        dispatcher: &dyn Dispatcher,
        caller: Owner,
        id: TxId,
    ) -> Result<Vec<WalletEvent>, WalletError> {
        state.registry.ensure_owner(&caller)?;

        let wallet = state.wallet();
        let required = state.registry.required();
        let tx = state.ledger.get(id)?;
        if tx.executed {
            return Err(WalletError::AlreadyExecuted(id));
        }
        if !tx.is_quorate(required) {
            return Err(WalletError::InsufficientConfirmations {
                id,
                confirmations: tx.confirmation_count,
                required,
            });
        }

        let value = tx.value;
        let destination = tx.destination;
        let action = tx
            .action(&wallet)
            .map_err(|e| failed(id, ExecutionError::MalformedGovernance(e)))?;

        let mut events = Vec::with_capacity(2);
        match action {
            Action::Governance(op) => {
                if value != 0 {
                    return Err(failed(id, ExecutionError::GovernanceValueNotZero(value)));
                }
                let event = GovernanceGateway::apply(state, id, op)
                    .map_err(|e| failed(id, ExecutionError::GovernanceRejected(Box::new(e))))?;
                events.push(event);
            }
            Action::Transfer {
                destination,
                value,
                payload,
            } => {
                if value > state.balance {
                    return Err(failed(
                        id,
                        ExecutionError::InsufficientFunds {
                            value,
                            balance: state.balance,
                        },
                    ));
                }

                let call = OutgoingCall {
                    tx_id: id,
                    from: wallet,
                    destination,
                    value,
                    payload,
                };
                dispatcher
                    .dispatch(&call)
                    .await
                    .map_err(|e| failed(id, ExecutionError::Dispatch(e)))?;
                state.balance -= value;
            }
        }

        let executed_at = chrono::Utc::now().timestamp_millis();
        state.ledger.get_mut(id)?.mark_executed(executed_at);
        info!(id, executor = %caller, destination = %destination, value, "Transaction executed");

        events.push(WalletEvent::TransactionExecuted {
            id,
            executor: caller,
            destination,
            value,
            balance: state.balance,
            executed_at,
        });
        Ok(events)
    }
}

fn failed(id: TxId, cause: ExecutionError) -> WalletError {
    WalletError::ExecutionFailed { id, cause }
}
