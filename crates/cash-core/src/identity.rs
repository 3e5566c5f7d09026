//! # Account Identity
//!
//! The stable, externally assigned identifier of a ledger participant.
//! One type serves as the balance key, the allowance key, the claimant
//! record key, and the input to the verification signal hash, so a proof
//! bound to one account can never be credited to another by a type mix-up.

use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A 20-byte account identifier.
///
/// Serializes as a `0x`-prefixed hex string. Ordering is byte-lexicographic,
/// which keeps `BTreeMap`-backed ledger state deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Address);

impl AccountId {
    /// The all-zero account.
    pub const ZERO: Self = Self(Address::ZERO);

    /// Wrap an existing address.
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    /// Build an account from its raw 20 bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(Address::from(bytes))
    }

    /// Parse a hex address, with or without the `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAccountId`] if the string is not
    /// exactly 20 bytes of hex.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidAccountId(value.to_string()));
        }
        Address::from_str(hex)
            .map(Self)
            .map_err(|_| ValidationError::InvalidAccountId(value.to_string()))
    }

    /// Access the underlying address.
    pub fn as_address(&self) -> &Address {
        &self.0
    }

    /// The raw 20 address bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Whether this is the all-zero account.
    pub fn is_zero(&self) -> bool {
        self.0 == Address::ZERO
    }
}

impl From<Address> for AccountId {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
