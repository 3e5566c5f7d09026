//! # Ledger Error Types
//!
//! Every failure a caller can observe is a distinct variant carrying the
//! account and amounts involved. No variant is ever swallowed or
//! translated into another on the way out.

use alloy_primitives::U256;
use thiserror::Error;

use cash_core::{AccountId, Timestamp};
use cash_zkp::VerifyError;

use crate::config::ConfigError;
use crate::ledger::TokenMetadata;

/// Errors from balance ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The source account holds less than the requested amount.
    #[error("insufficient balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Account being debited.
        account: AccountId,
        /// Amount requested.
        requested: U256,
        /// Current balance.
        available: U256,
    },

    /// The spender's allowance from the owner is below the requested amount.
    #[error(
        "insufficient allowance for {spender} on {owner}: requested {requested}, available {available}"
    )]
    InsufficientAllowance {
        /// Account whose tokens are being spent.
        owner: AccountId,
        /// Account spending them.
        spender: AccountId,
        /// Amount requested.
        requested: U256,
        /// Remaining allowance.
        available: U256,
    },

    /// Minting would push total supply past 2^256 - 1.
    #[error("mint of {requested} would overflow total supply {total_supply}")]
    SupplyOverflow {
        /// Amount being minted.
        requested: U256,
        /// Supply before the mint.
        total_supply: U256,
    },
}

/// Errors from [`ClaimGate::claim`](crate::gate::ClaimGate::claim).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// The claimant's cooldown has not elapsed.
    #[error("claim not ready for {claimant}: last claim at {last_claim}, retry in {retry_after_secs}s")]
    NotReady {
        /// The rate-limited claimant.
        claimant: AccountId,
        /// When the claimant last claimed successfully.
        last_claim: Timestamp,
        /// Seconds until the claimant becomes eligible.
        retry_after_secs: u64,
    },

    /// The verifier rejected the proof. Carries the verifier's error as-is.
    #[error(transparent)]
    Verification(#[from] VerifyError),

    /// Issuance broke a ledger invariant. Not recoverable by retrying.
    #[error("ledger invariant violated during issuance: {0}")]
    Ledger(#[from] LedgerError),
}

impl ClaimError {
    /// Whether the caller can succeed later without operator intervention.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Ledger(_))
    }
}

/// Errors restoring a gate from a [`LedgerSnapshot`](crate::snapshot::LedgerSnapshot).
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The snapshot's configuration is invalid.
    #[error("snapshot configuration: {0}")]
    Config(#[from] ConfigError),

    /// Recorded total supply disagrees with the sum of balances.
    #[error("total supply {recorded} does not match sum of balances {computed}")]
    SupplyMismatch {
        /// Supply stored in the snapshot.
        recorded: U256,
        /// Sum of the stored balances.
        computed: U256,
    },

    /// Stored external nullifier hash does not match the configured app and action.
    #[error("external nullifier hash {recorded:#x} does not match configuration ({derived:#x})")]
    ExternalNullifierMismatch {
        /// Hash stored in the snapshot.
        recorded: U256,
        /// Hash derived from the snapshot's configuration.
        derived: U256,
    },

    /// Stored token metadata disagrees with the snapshot's configuration.
    #[error("token metadata {recorded:?} does not match configuration ({configured:?})")]
    MetadataMismatch {
        /// Metadata stored in the snapshot.
        recorded: TokenMetadata,
        /// Metadata derived from the snapshot's configuration.
        configured: TokenMetadata,
    },

    /// The issuance history and the last-claim records disagree for a claimant.
    #[error("claimant {claimant}: last claim {recorded:?} but latest issuance {issued:?}")]
    IssuanceMismatch {
        /// Claimant whose records disagree.
        claimant: AccountId,
        /// Last-claim time stored in the snapshot.
        recorded: Option<Timestamp>,
        /// Time of the claimant's latest stored issuance.
        issued: Option<Timestamp>,
    },

    /// The stored balances sum past 2^256 - 1.
    #[error("stored balances overflow total supply")]
    BalanceOverflow,

    /// JSON encoding or decoding failed.
    #[error("snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}
