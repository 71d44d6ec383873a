//! Governance gateway - owner-set and threshold changes as self-calls
//!
//! A governance change is an ordinary transaction whose destination is the
//! wallet itself and whose payload encodes a [`GovernanceOp`]. It goes through
//! submit, confirm and execute like any transfer. At execute time the gateway
//! applies the op to the registry in-process instead of dispatching it.

use multisig_common::audit::WalletEvent;
use multisig_common::{Address, GovernanceOp, TxId, WalletError};
use tracing::info;

use crate::state::WalletState;

/// Routes quorum-approved self-calls into the owner registry
pub struct GovernanceGateway;

/// Destination, value and payload for a governance proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceProposal {
    pub destination: Address,
    pub value: u128,
    pub payload: Vec<u8>,
}

impl GovernanceGateway {
    /// Build the self-call that carries `op` for `wallet`
    pub fn proposal(wallet: Address, op: &GovernanceOp) -> GovernanceProposal {
        GovernanceProposal {
            destination: wallet,
            value: 0,
            payload: op.encode(),
        }
    }

    /// Apply `op` on behalf of transaction `tx_id`.
    ///
    /// Either the registry change and its side effects are all applied, or
    /// nothing is. Removing an owner also drops that owner's confirmations from
    /// every other pending transaction.
    pub(crate) fn apply(
        state: &mut WalletState,
        tx_id: TxId,
        op: GovernanceOp,
    ) -> Result<WalletEvent, WalletError> {
        let event = match op {
            GovernanceOp::AddOwner { owner } => {
                state.registry.add_owner(owner)?;
                WalletEvent::OwnerAdded { tx_id, owner }
            }
            GovernanceOp::RemoveOwner { owner } => {
                state.registry.remove_owner(&owner)?;
                let invalidated = state.ledger.invalidate_confirmations(&owner, tx_id);
                WalletEvent::OwnerRemoved {
                    tx_id,
                    owner,
                    invalidated,
                }
            }
            GovernanceOp::ChangeRequirement { required } => {
                state.registry.change_requirement(required)?;
                WalletEvent::RequirementChanged { tx_id, required }
            }
        };

        info!(tx_id, op = %op, "Governance change applied");
        Ok(event)
    }
}
