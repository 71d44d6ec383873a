//! Governance payloads - owner-set and threshold changes carried as call data
//!
//! A governance payload is a 4-byte selector followed by a single 32-byte
//! big-endian argument word:
//! - `addOwner(address)` / `removeOwner(address)`: the address is left-padded
//!   with 12 zero bytes
//! - `changeRequirement(uint256)`: the value must fit in a `u32`
//!
//! Selectors are the first 4 bytes of the BLAKE3 hash of the signature.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::address::{Address, ADDRESS_LEN};

/// Selector length in bytes
pub const SELECTOR_LEN: usize = 4;

/// Argument word length in bytes
pub const WORD_LEN: usize = 32;

/// Encoded governance payload length
pub const GOVERNANCE_PAYLOAD_LEN: usize = SELECTOR_LEN + WORD_LEN;

const ADD_OWNER_SIG: &str = "addOwner(address)";
const REMOVE_OWNER_SIG: &str = "removeOwner(address)";
const CHANGE_REQUIREMENT_SIG: &str = "changeRequirement(uint256)";

/// Payload decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Governance payload is empty")]
    Empty,

    #[error("Unknown governance selector: 0x{selector}")]
    UnknownSelector { selector: String },

    #[error("Bad governance payload length: expected {expected}, got {actual}")]
    BadLength { expected: usize, actual: usize },

    #[error("Address argument has nonzero padding")]
    DirtyPadding,

    #[error("Requirement argument does not fit in 32 bits")]
    Overflow,
}

/// First 4 bytes of the BLAKE3 hash of a call signature
pub fn selector(signature: &str) -> [u8; SELECTOR_LEN] {
    let hash = blake3::hash(signature.as_bytes());
    let mut out = [0u8; SELECTOR_LEN];
    out.copy_from_slice(&hash.as_bytes()[..SELECTOR_LEN]);
    out
}

/// A mutation of the wallet's own governance surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GovernanceOp {
    AddOwner { owner: Address },
    RemoveOwner { owner: Address },
    ChangeRequirement { required: u32 },
}

impl GovernanceOp {
    /// Call signature for this operation
    pub fn signature(&self) -> &'static str {
        match self {
            GovernanceOp::AddOwner { .. } => ADD_OWNER_SIG,
            GovernanceOp::RemoveOwner { .. } => REMOVE_OWNER_SIG,
            GovernanceOp::ChangeRequirement { .. } => CHANGE_REQUIREMENT_SIG,
        }
    }

    /// Encode as selector + argument word
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(GOVERNANCE_PAYLOAD_LEN);
        out.extend_from_slice(&selector(self.signature()));

        let mut word = [0u8; WORD_LEN];
        match self {
            GovernanceOp::AddOwner { owner } | GovernanceOp::RemoveOwner { owner } => {
                word[WORD_LEN - ADDRESS_LEN..].copy_from_slice(owner.as_bytes());
            }
            GovernanceOp::ChangeRequirement { required } => {
                word[WORD_LEN - 4..].copy_from_slice(&required.to_be_bytes());
            }
        }
        out.extend_from_slice(&word);
        out
    }

    /// Decode a payload produced by [`GovernanceOp::encode`]
    pub fn decode(payload: &[u8]) -> Result<Self, PayloadError> {
        if payload.is_empty() {
            return Err(PayloadError::Empty);
        }
        if payload.len() < SELECTOR_LEN {
            return Err(PayloadError::BadLength {
                expected: GOVERNANCE_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let (sel, rest) = payload.split_at(SELECTOR_LEN);
        let kind = if sel == selector(ADD_OWNER_SIG) {
            ADD_OWNER_SIG
        } else if sel == selector(REMOVE_OWNER_SIG) {
            REMOVE_OWNER_SIG
        } else if sel == selector(CHANGE_REQUIREMENT_SIG) {
            CHANGE_REQUIREMENT_SIG
        } else {
            return Err(PayloadError::UnknownSelector {
                selector: hex::encode(sel),
            });
        };

        if rest.len() != WORD_LEN {
            return Err(PayloadError::BadLength {
                expected: GOVERNANCE_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        match kind {
            CHANGE_REQUIREMENT_SIG => {
                if rest[..WORD_LEN - 4].iter().any(|b| *b != 0) {
                    return Err(PayloadError::Overflow);
                }
                let mut be = [0u8; 4];
                be.copy_from_slice(&rest[WORD_LEN - 4..]);
                Ok(GovernanceOp::ChangeRequirement {
                    required: u32::from_be_bytes(be),
                })
            }
            _ => {
                if rest[..WORD_LEN - ADDRESS_LEN].iter().any(|b| *b != 0) {
                    return Err(PayloadError::DirtyPadding);
                }
                let mut bytes = [0u8; ADDRESS_LEN];
                bytes.copy_from_slice(&rest[WORD_LEN - ADDRESS_LEN..]);
                let owner = Address::new(bytes);
                if kind == ADD_OWNER_SIG {
                    Ok(GovernanceOp::AddOwner { owner })
                } else {
                    Ok(GovernanceOp::RemoveOwner { owner })
                }
            }
        }
    }
}

impl std::fmt::Display for GovernanceOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GovernanceOp::AddOwner { owner } => write!(f, "addOwner({})", owner),
            GovernanceOp::RemoveOwner { owner } => write!(f, "removeOwner({})", owner),
            GovernanceOp::ChangeRequirement { required } => {
                write!(f, "changeRequirement({})", required)
            }
        }
    }
}

/// What executing a transaction actually does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Value transfer and/or call dispatched to an external destination
    Transfer {
        destination: Address,
        value: u128,
        payload: Vec<u8>,
    },
    /// In-process mutation of the owner set or threshold
    Governance(GovernanceOp),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_are_distinct() {
        let a = selector(ADD_OWNER_SIG);
        let r = selector(REMOVE_OWNER_SIG);
        let c = selector(CHANGE_REQUIREMENT_SIG);
        assert_ne!(a, r);
        assert_ne!(a, c);
        assert_ne!(r, c);
    }

    #[test]
    fn test_encode_layout() {
        let owner = Address::from_low_u64(0xC0FFEE);
        let payload = GovernanceOp::AddOwner { owner }.encode();
        assert_eq!(payload.len(), GOVERNANCE_PAYLOAD_LEN);
        assert_eq!(&payload[..4], &selector(ADD_OWNER_SIG));
        assert!(payload[4..16].iter().all(|b| *b == 0));
        assert_eq!(&payload[16..], owner.as_bytes());
    }

    #[test]
    fn test_decode_each_op() {
        let owner = Address::from_low_u64(7);
        for op in [
            GovernanceOp::AddOwner { owner },
            GovernanceOp::RemoveOwner { owner },
            GovernanceOp::ChangeRequirement { required: 3 },
        ] {
            assert_eq!(GovernanceOp::decode(&op.encode()).unwrap(), op);
        }
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(GovernanceOp::decode(&[]), Err(PayloadError::Empty));
    }

    #[test]
    fn test_decode_unknown_selector() {
        let mut payload = GovernanceOp::ChangeRequirement { required: 1 }.encode();
        payload[0] ^= 0xFF;
        payload[1] ^= 0xFF;
        assert!(matches!(
            GovernanceOp::decode(&payload),
            Err(PayloadError::UnknownSelector { .. })
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let payload = GovernanceOp::ChangeRequirement { required: 1 }.encode();
        let result = GovernanceOp::decode(&payload[..20]);
        assert_eq!(
            result,
            Err(PayloadError::BadLength {
                expected: 36,
                actual: 20
            })
        );
    }

    #[test]
    fn test_decode_dirty_padding() {
        let mut payload = GovernanceOp::RemoveOwner {
            owner: Address::from_low_u64(1),
        }
        .encode();
        payload[5] = 1;
        assert_eq!(GovernanceOp::decode(&payload), Err(PayloadError::DirtyPadding));
    }

    #[test]
    fn test_decode_requirement_overflow() {
        let mut payload = GovernanceOp::ChangeRequirement { required: 1 }.encode();
        payload[SELECTOR_LEN + 27] = 1;
        assert_eq!(GovernanceOp::decode(&payload), Err(PayloadError::Overflow));
    }
}
