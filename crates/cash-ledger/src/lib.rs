//! # cash-ledger — Verification-Gated Issuance
//!
//! A fungible balance ledger whose supply grows only through
//! [`ClaimGate::claim`]: a caller presents an identity proof, the gate
//! checks the caller's cooldown, asks an external
//! [`IdentityVerifier`](cash_zkp::IdentityVerifier) to accept the proof, and
//! only then mints a fixed amount to the caller.
//!
//! ## Modules
//!
//! - `ledger`: [`BalanceLedger`], balances, allowances, supply, event log.
//! - `registry`: [`ClaimRegistry`], last-claim timestamps and the cooldown rule.
//! - `gate`: [`ClaimGate`], the claim sequence tying the three together.
//! - `config`: [`IssuanceConfig`] from defaults, YAML, and `CASH_*` env vars.
//! - `snapshot`: [`LedgerSnapshot`] for persisting and restoring a gate.
//! - `error`: [`LedgerError`], [`ClaimError`], [`SnapshotError`].
//!
//! ## Guarantees
//!
//! - No issuance without a fresh proof accepted by the verifier.
//! - At most one issuance per claimant per wait period, boundary inclusive.
//! - `total_supply == Σ balances` after every operation.
//! - Every failed call leaves every piece of state unchanged.

pub mod config;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod registry;
pub mod snapshot;

pub use config::{ConfigError, IssuanceConfig};
pub use error::{ClaimError, LedgerError, SnapshotError};
pub use gate::{ClaimGate, IssuanceRecord, ProofMaterial};
pub use ledger::{BalanceLedger, LedgerEvent, TokenMetadata};
pub use registry::ClaimRegistry;
pub use snapshot::{AllowanceEntry, BalanceEntry, ClaimEntry, LedgerSnapshot};
