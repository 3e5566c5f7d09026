//! # Hash-to-Field Derivations
//!
//! Reductions that turn arbitrary bytes into values small enough to be
//! field elements in the identity proof system's circuit.
//!
//! `hash_to_field(x) = keccak256(x) >> 8`. Dropping the low byte keeps the
//! result below 2^248, comfortably inside the BN254 scalar field.
//!
//! Two public signals are built from it:
//!
//! - **Signal hash**: `hash_to_field(account)` over the 20 raw account
//!   bytes. Binds a proof to the account that will be credited.
//! - **External nullifier hash**: a two-stage reduction,
//!   `hash_to_field(be32(hash_to_field(app_id)) ‖ action)`. Binds a proof
//!   to one application and one action.

use alloy_primitives::{keccak256, U256};

use cash_core::AccountId;

/// Reduce `bytes` to a field element: `keccak256(bytes) >> 8`.
pub fn hash_to_field(bytes: &[u8]) -> U256 {
    U256::from_be_bytes(keccak256(bytes).0) >> 8usize
}

/// Signal hash for `account`.
pub fn signal_hash(account: &AccountId) -> U256 {
    hash_to_field(account.as_slice())
}

/// External nullifier hash for an application identifier and action label.
pub fn external_nullifier_hash(app_id: &str, action: &str) -> U256 {
    let app_field = hash_to_field(app_id.as_bytes());
    let mut packed = Vec::with_capacity(32 + action.len());
    packed.extend_from_slice(&app_field.to_be_bytes::<32>());
    packed.extend_from_slice(action.as_bytes());
    hash_to_field(&packed)
}
