//! Dispatch seam for external calls
//!
//! Executing a transfer hands an [`OutgoingCall`] to a [`Dispatcher`]. The
//! engine awaits the outcome while it still holds the wallet's write lock, so
//! a dispatcher must not call back into the same wallet.

use std::collections::HashSet;

use async_trait::async_trait;
use multisig_common::{Address, DispatchError, TxId};
use parking_lot::RwLock;
use tracing::debug;

/// A value transfer and/or call leaving the wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingCall {
    /// Transaction being executed
    pub tx_id: TxId,
    /// The wallet's own identity
    pub from: Address,
    pub destination: Address,
    pub value: u128,
    pub payload: Vec<u8>,
}

/// What the destination returned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub return_data: Vec<u8>,
}

/// Delivers outgoing calls to their destination.
///
/// If the `execute_transaction` future is dropped while a dispatch is in
/// flight, the transaction stays unexecuted and a later execute dispatches it
/// again. Implementations that cannot tolerate redelivery must deduplicate on
/// [`OutgoingCall::tx_id`].
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Deliver `call`. An error means the destination's effect did not happen.
    async fn dispatch(&self, call: &OutgoingCall) -> Result<DispatchReceipt, DispatchError>;
}

/// Accepts every call
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllDispatcher;

#[async_trait]
impl Dispatcher for AcceptAllDispatcher {
    async fn dispatch(&self, call: &OutgoingCall) -> Result<DispatchReceipt, DispatchError> {
        debug!(tx_id = call.tx_id, destination = %call.destination, value = call.value, "Dispatch accepted");
        Ok(DispatchReceipt::default())
    }
}

/// Dispatcher with per-destination accept/reject switches.
///
/// Records every accepted call in delivery order.
#[derive(Debug, Default)]
pub struct ScriptedDispatcher {
    rejecting: RwLock<HashSet<Address>>,
    delivered: RwLock<Vec<OutgoingCall>>,
}

impl ScriptedDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `destination` reject every call until [`ScriptedDispatcher::accept`]
    pub fn reject(&self, destination: Address) {
        self.rejecting.write().insert(destination);
    }

    /// Let `destination` accept calls again
    pub fn accept(&self, destination: Address) {
        self.rejecting.write().remove(&destination);
    }

    /// Calls delivered so far
    pub fn delivered(&self) -> Vec<OutgoingCall> {
        self.delivered.read().clone()
    }
}

#[async_trait]
impl Dispatcher for ScriptedDispatcher {
    async fn dispatch(&self, call: &OutgoingCall) -> Result<DispatchReceipt, DispatchError> {
        if self.rejecting.read().contains(&call.destination) {
            return Err(DispatchError::Rejected {
                destination: call.destination,
                reason: "destination rejects calls".to_string(),
            });
        }
        self.delivered.write().push(call.clone());
        Ok(DispatchReceipt::default())
    }
}
