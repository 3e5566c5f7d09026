//! # Verifier Trait
//!
//! The contract between the claim gate and whatever checks identity
//! proofs. The gate supplies a [`VerificationRequest`] (the public
//! signals) and an opaque [`Proof`]; the verifier answers `Ok(())` or an
//! error that the gate passes through unchanged.
//!
//! ## Security Invariant
//!
//! Implementations own global replay protection: a nullifier hash that has
//! been accepted once must be rejected on every later call, regardless of
//! which caller presents it.

use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of field elements in a proof blob.
pub const PROOF_ELEMENTS: usize = 8;

/// Error returned by an [`IdentityVerifier`].
///
/// The claim gate surfaces these verbatim; the variants exist for the
/// caller's diagnostics, not for gate-side branching.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The proof blob is structurally unusable (wrong length, zero, corrupt).
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The proof does not verify against the supplied public signals.
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    /// The nullifier hash was already consumed by an earlier verification.
    #[error("nullifier {0:#x} has already been used")]
    NullifierAlreadyUsed(U256),

    /// The identity-set root is not one the verifier recognises.
    #[error("unknown identity root {0:#x}")]
    UnknownRoot(U256),

    /// The group identifier does not match the verifier's group.
    #[error("group mismatch: expected {expected}, got {actual}")]
    InvalidGroup {
        /// Group the verifier serves.
        expected: U256,
        /// Group named in the request.
        actual: U256,
    },

    /// The verifier backend could not be reached or failed internally.
    #[error("verifier unavailable: {0}")]
    Unavailable(String),
}

/// A fixed-size proof blob of [`PROOF_ELEMENTS`] field elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof(pub [U256; PROOF_ELEMENTS]);

impl Proof {
    /// Build a proof from a slice of exactly [`PROOF_ELEMENTS`] elements.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::MalformedProof`] on a length mismatch.
    pub fn from_slice(elements: &[U256]) -> Result<Self, VerifyError> {
        let array: [U256; PROOF_ELEMENTS] = elements.try_into().map_err(|_| {
            VerifyError::MalformedProof(format!(
                "expected {PROOF_ELEMENTS} elements, got {}",
                elements.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// The proof elements.
    pub fn elements(&self) -> &[U256; PROOF_ELEMENTS] {
        &self.0
    }

    /// Whether every element is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|e| e.is_zero())
    }
}

impl FromStr for Proof {
    type Err = VerifyError;

    /// Parse comma-separated elements; each may be decimal or `0x` hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let elements = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                U256::from_str(part).map_err(|e| {
                    VerifyError::MalformedProof(format!("element \"{part}\": {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_slice(&elements)
    }
}

impl std::fmt::Display for Proof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{element:#x}")?;
        }
        Ok(())
    }
}

/// Public signals presented to the verifier alongside a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Root of the identity set the prover claims membership in.
    pub root: U256,
    /// Identity group the proof was generated for.
    pub group_id: U256,
    /// Hash of the signal (the claimant's account).
    pub signal_hash: U256,
    /// Single-use nullifier hash.
    pub nullifier_hash: U256,
    /// Hash binding the proof to this application and action.
    pub external_nullifier_hash: U256,
}

/// Checks identity proofs on behalf of the claim gate.
///
/// `verify` takes `&self`; implementations that track consumed
/// nullifiers use interior mutability.
pub trait IdentityVerifier: Send + Sync {
    /// Verify `proof` against `request`.
    ///
    /// # Errors
    ///
    /// Any [`VerifyError`] means the proof was not accepted. An accepted
    /// nullifier must cause [`VerifyError::NullifierAlreadyUsed`] (or another
    /// error) on every subsequent call.
    fn verify(&self, request: &VerificationRequest, proof: &Proof) -> Result<(), VerifyError>;
}

impl<V: IdentityVerifier + ?Sized> IdentityVerifier for Arc<V> {
    fn verify(&self, request: &VerificationRequest, proof: &Proof) -> Result<(), VerifyError> {
        (**self).verify(request, proof)
    }
}

impl<V: IdentityVerifier + ?Sized> IdentityVerifier for Box<V> {
    fn verify(&self, request: &VerificationRequest, proof: &Proof) -> Result<(), VerifyError> {
        (**self).verify(request, proof)
    }
}
