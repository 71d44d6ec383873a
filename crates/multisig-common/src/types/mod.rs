//! Core data types for the multisig wallet

pub mod address;
pub mod governance;
pub mod transaction;
