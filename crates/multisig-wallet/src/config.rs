//! Wallet configuration

use std::str::FromStr;

use multisig_common::{Address, AddressError, MultisigError, Owner, WalletError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::OwnerRegistry;

/// Deployer and test accounts of the default local network
const DEFAULT_WALLET: Address = Address::new([
    0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f, 0x64,
    0x2f, 0x64, 0x18, 0x0a, 0xa3,
]);
const DEFAULT_OWNERS: [Address; 3] = [
    Address::new([
        0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72, 0x79,
        0xcf, 0xff, 0xb9, 0x22, 0x66,
    ]),
    Address::new([
        0x70, 0x99, 0x79, 0x70, 0xc5, 0x18, 0x12, 0xdc, 0x3a, 0x01, 0x0c, 0x7d, 0x01, 0xb5, 0x0e,
        0x0d, 0x17, 0xdc, 0x79, 0xc8,
    ]),
    Address::new([
        0x3c, 0x44, 0xcd, 0xdd, 0xb6, 0xa9, 0x00, 0xfa, 0x2b, 0x58, 0x5d, 0xd2, 0x99, 0xe0, 0x3d,
        0x12, 0xfa, 0x42, 0x93, 0xbc,
    ]),
];
const DEFAULT_REQUIRED: u32 = 2;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    #[error("Invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("Invalid wallet setup: {0}")]
    Wallet(#[from] WalletError),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for MultisigError {
    fn from(err: ConfigError) -> Self {
        MultisigError::Config(err.to_string())
    }
}

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// The wallet's own identity
    pub wallet_address: Address,
    /// Initial owners, in order
    pub owners: Vec<Owner>,
    /// Initial quorum threshold
    pub required: u32,
    /// Initial native balance
    #[serde(default)]
    pub initial_balance: u128,
    /// Audit settings
    #[serde(default)]
    pub audit: AuditSettings,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            wallet_address: DEFAULT_WALLET,
            owners: DEFAULT_OWNERS.to_vec(),
            required: DEFAULT_REQUIRED,
            initial_balance: 0,
            audit: AuditSettings::default(),
        }
    }
}

/// Audit log settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSettings {
    /// Echo every audit record to tracing
    pub echo_to_tracing: bool,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            echo_to_tracing: true,
        }
    }
}

impl WalletConfig {
    /// Load configuration from `.env` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build from any variable source, starting from defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("MULTISIG_WALLET_ADDRESS") {
            cfg.wallet_address = Address::from_str(addr.trim())?;
        }
        if let Some(owners) = lookup("MULTISIG_OWNERS") {
            cfg.owners = owners
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Address::from_str)
                .collect::<Result<Vec<_>, _>>()?;
        }
        if let Some(required) = lookup("MULTISIG_REQUIRED") {
            cfg.required = parse_var("MULTISIG_REQUIRED", &required)?;
        }
        if let Some(balance) = lookup("MULTISIG_INITIAL_BALANCE") {
            cfg.initial_balance = parse_var("MULTISIG_INITIAL_BALANCE", &balance)?;
        }
        if let Some(echo) = lookup("MULTISIG_AUDIT_ECHO") {
            cfg.audit.echo_to_tracing = parse_var("MULTISIG_AUDIT_ECHO", &echo)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply the owner-set and threshold checks a wallet is built with
    pub fn validate(&self) -> Result<(), ConfigError> {
        OwnerRegistry::new(self.wallet_address, self.owners.clone(), self.required)?;
        Ok(())
    }
}

fn parse_var<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_is_two_of_three() {
        let cfg = WalletConfig::default();
        assert_eq!(cfg.owners.len(), 3);
        assert_eq!(cfg.required, 2);
        assert!(cfg.validate().is_ok());
        assert_eq!(
            cfg.owners[1].to_string(),
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
    }

    #[test]
    fn test_from_lookup_overrides() {
        let cfg = WalletConfig::from_lookup(lookup(&[
            (
                "MULTISIG_OWNERS",
                "0x0000000000000000000000000000000000000001, 0x0000000000000000000000000000000000000002",
            ),
            ("MULTISIG_REQUIRED", "1"),
            ("MULTISIG_INITIAL_BALANCE", "1000"),
            ("MULTISIG_AUDIT_ECHO", "false"),
        ]))
        .unwrap();

        assert_eq!(cfg.owners, vec![Address::from_low_u64(1), Address::from_low_u64(2)]);
        assert_eq!(cfg.required, 1);
        assert_eq!(cfg.initial_balance, 1000);
        assert!(!cfg.audit.echo_to_tracing);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = WalletConfig::from_lookup(lookup(&[("MULTISIG_REQUIRED", "two")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "MULTISIG_REQUIRED", .. }));

        let err = WalletConfig::from_lookup(lookup(&[("MULTISIG_REQUIRED", "4")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Wallet(WalletError::InvalidRequirement { .. })
        ));

        let err = WalletConfig::from_lookup(lookup(&[("MULTISIG_OWNERS", "0x12")])).unwrap_err();
        assert!(matches!(err, ConfigError::Address(_)));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "wallet_address": "0x00000000000000000000000000000000000000ff",
            "owners": ["0x000000000000000000000000000000000000000a"],
            "required": 1
        }"#;
        let cfg = WalletConfig::from_json(json).unwrap();
        assert_eq!(cfg.initial_balance, 0);
        assert!(cfg.audit.echo_to_tracing);

        let bad = json.replace("\"required\": 1", "\"required\": 2");
        assert!(WalletConfig::from_json(&bad).is_err());
    }
}
