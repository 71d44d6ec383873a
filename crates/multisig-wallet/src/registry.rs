//! Owner registry - the authorized identities and the quorum threshold
//!
//! Invariant: `owners` is non-empty, duplicate-free, in insertion order, and
//! `1 <= required <= owners.len()`. The mutators are crate-private: outside
//! this crate they are only reachable through the governance gateway.

use multisig_common::{Address, Owner, WalletError};

/// Authorized owners and quorum threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRegistry {
    wallet: Address,
    owners: Vec<Owner>,
    required: u32,
}

impl OwnerRegistry {
    /// Build a registry, validating every owner and the threshold
    pub fn new(wallet: Address, owners: Vec<Owner>, required: u32) -> Result<Self, WalletError> {
        let mut registry = Self {
            wallet,
            owners: Vec::with_capacity(owners.len()),
            required: 0,
        };

        for owner in owners {
            registry.validate_new_owner(&owner)?;
            registry.owners.push(owner);
        }

        registry.validate_requirement(required)?;
        registry.required = required;
        Ok(registry)
    }

    /// The wallet's own identity
    #[inline]
    pub fn wallet(&self) -> Address {
        self.wallet
    }

    /// Membership check
    #[inline]
    pub fn is_owner(&self, addr: &Address) -> bool {
        self.owners.contains(addr)
    }

    /// Owners in insertion order
    #[inline]
    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    /// Owned copy of the owner list
    pub fn list_owners(&self) -> Vec<Owner> {
        self.owners.clone()
    }

    /// Current quorum threshold
    #[inline]
    pub fn required(&self) -> u32 {
        self.required
    }

    /// Fail with `NotOwner` unless `caller` is an owner
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), WalletError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(WalletError::NotOwner(*caller))
        }
    }

    pub(crate) fn add_owner(&mut self, addr: Owner) -> Result<(), WalletError> {
        self.validate_new_owner(&addr)?;
        self.owners.push(addr);
        Ok(())
    }

    pub(crate) fn remove_owner(&mut self, addr: &Owner) -> Result<(), WalletError> {
        let pos = self
            .owners
            .iter()
            .position(|o| o == addr)
            .ok_or(WalletError::NotOwner(*addr))?;

        let remaining = self.owners.len() - 1;
        if remaining < self.required as usize {
            return Err(WalletError::OwnerCountBelowThreshold {
                remaining,
                required: self.required,
            });
        }

        self.owners.remove(pos);
        Ok(())
    }

    pub(crate) fn change_requirement(&mut self, required: u32) -> Result<(), WalletError> {
        self.validate_requirement(required)?;
        self.required = required;
        Ok(())
    }

    fn validate_new_owner(&self, addr: &Owner) -> Result<(), WalletError> {
        if addr.is_zero() || *addr == self.wallet {
            return Err(WalletError::InvalidOwner(*addr));
        }
        if self.is_owner(addr) {
            return Err(WalletError::AlreadyOwner(*addr));
        }
        Ok(())
    }

    fn validate_requirement(&self, required: u32) -> Result<(), WalletError> {
        if required == 0 || required as usize > self.owners.len() {
            return Err(WalletError::InvalidRequirement {
                required,
                owners: self.owners.len(),
            });
        }
        Ok(())
    }
}
