//! Transaction ledger - append-only, densely indexed list of proposals
//!
//! Ids are list positions: the ledger never deletes, so an id is never reused.

use multisig_common::{Address, Owner, Transaction, TxId, WalletError};

/// Append-only transaction store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLedger {
    transactions: Vec<Transaction>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new unconfirmed transaction and return its id
    pub(crate) fn submit(
        &mut self,
        destination: Address,
        value: u128,
        payload: Vec<u8>,
        submitted_by: Owner,
    ) -> TxId {
        let id = self.count();
        self.transactions
            .push(Transaction::new(id, destination, value, payload, submitted_by));
        id
    }

    /// Append a fully-formed record whose id must be the next one
    pub(crate) fn append(&mut self, tx: Transaction) -> Result<TxId, Transaction> {
        if tx.id != self.count() {
            return Err(tx);
        }
        let id = tx.id;
        self.transactions.push(tx);
        Ok(id)
    }

    /// Look up a transaction
    pub fn get(&self, id: TxId) -> Result<&Transaction, WalletError> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.transactions.get(idx))
            .ok_or(WalletError::TransactionNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: TxId) -> Result<&mut Transaction, WalletError> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.transactions.get_mut(idx))
            .ok_or(WalletError::TransactionNotFound(id))
    }

    /// Number of transactions ever submitted
    #[inline]
    pub fn count(&self) -> u64 {
        self.transactions.len() as u64
    }

    /// All transactions in id order
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    /// Ids of transactions not yet executed
    pub fn pending_ids(&self) -> Vec<TxId> {
        self.transactions
            .iter()
            .filter(|tx| !tx.executed)
            .map(|tx| tx.id)
            .collect()
    }

    /// Drop `owner`'s confirmation from every pending transaction other than `except`.
    /// Returns the affected ids.
    pub(crate) fn invalidate_confirmations(&mut self, owner: &Owner, except: TxId) -> Vec<TxId> {
        self.transactions
            .iter_mut()
            .filter(|tx| !tx.executed && tx.id != except)
            .filter_map(|tx| tx.remove_confirmation(owner).then_some(tx.id))
            .collect()
    }
}
