//! # Mock Verifier
//!
//! A deterministic, transparent verifier for development and testing.
//! "Proofs" are SHA-256 bindings of the public signals: anyone can forge
//! one, so this provides no zero-knowledge or soundness guarantee. It does
//! enforce every other part of the verifier contract, which is what the
//! claim gate's tests need.

use std::collections::BTreeSet;

use alloy_primitives::U256;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::traits::{IdentityVerifier, Proof, VerificationRequest, VerifyError, PROOF_ELEMENTS};

/// Domain separator for mock proof elements.
const MOCK_PROOF_DOMAIN: &[u8] = b"cash.mock-proof.v1";

#[derive(Debug, Default)]
struct MockState {
    spent: BTreeSet<U256>,
    reject_with: Option<String>,
    calls: u64,
}

/// A deterministic in-memory verifier.
///
/// Checks, in order: forced rejection, zero proof, group, root allow-list
/// (if configured), signal binding, nullifier reuse. Only a call that passes
/// every check consumes its nullifier.
#[derive(Debug)]
pub struct MockVerifier {
    group_id: U256,
    roots: Option<BTreeSet<U256>>,
    state: Mutex<MockState>,
}

impl MockVerifier {
    /// A verifier for `group_id` that accepts any root.
    pub fn new(group_id: U256) -> Self {
        Self {
            group_id,
            roots: None,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Restrict accepted roots to `roots`.
    pub fn with_roots(mut self, roots: impl IntoIterator<Item = U256>) -> Self {
        self.roots = Some(roots.into_iter().collect());
        self
    }

    /// Pre-load nullifiers that are already consumed.
    pub fn with_spent(self, nullifiers: impl IntoIterator<Item = U256>) -> Self {
        self.state.lock().spent.extend(nullifiers);
        self
    }

    /// The group this verifier serves.
    pub fn group_id(&self) -> U256 {
        self.group_id
    }

    /// Produce the proof this verifier will accept for `request`.
    pub fn prove(request: &VerificationRequest) -> Proof {
        let mut elements = [U256::ZERO; PROOF_ELEMENTS];
        for (index, element) in elements.iter_mut().enumerate() {
            let mut hasher = Sha256::new();
            hasher.update(MOCK_PROOF_DOMAIN);
            hasher.update([index as u8]);
            hasher.update(request.root.to_be_bytes::<32>());
            hasher.update(request.group_id.to_be_bytes::<32>());
            hasher.update(request.signal_hash.to_be_bytes::<32>());
            hasher.update(request.nullifier_hash.to_be_bytes::<32>());
            hasher.update(request.external_nullifier_hash.to_be_bytes::<32>());
            *element = U256::from_be_slice(&hasher.finalize()) >> 8usize;
        }
        Proof(elements)
    }

    /// Reject every subsequent call with `reason` until [`accept`](Self::accept).
    pub fn reject_all(&self, reason: impl Into<String>) {
        self.state.lock().reject_with = Some(reason.into());
    }

    /// Clear a forced rejection.
    pub fn accept(&self) {
        self.state.lock().reject_with = None;
    }

    /// Number of `verify` calls made so far, successful or not.
    pub fn calls(&self) -> u64 {
        self.state.lock().calls
    }

    /// Whether `nullifier_hash` has been consumed.
    pub fn is_spent(&self, nullifier_hash: &U256) -> bool {
        self.state.lock().spent.contains(nullifier_hash)
    }

    /// All consumed nullifiers in ascending order.
    pub fn spent_nullifiers(&self) -> Vec<U256> {
        self.state.lock().spent.iter().copied().collect()
    }
}

impl Default for MockVerifier {
    fn default() -> Self {
        Self::new(U256::from(1u64))
    }
}

impl IdentityVerifier for MockVerifier {
    fn verify(&self, request: &VerificationRequest, proof: &Proof) -> Result<(), VerifyError> {
        let mut state = self.state.lock();
        state.calls += 1;

        if let Some(reason) = &state.reject_with {
            return Err(VerifyError::InvalidProof(reason.clone()));
        }
        if proof.is_zero() {
            return Err(VerifyError::MalformedProof("all proof elements are zero".to_string()));
        }
        if request.group_id != self.group_id {
            return Err(VerifyError::InvalidGroup {
                expected: self.group_id,
                actual: request.group_id,
            });
        }
        if let Some(roots) = &self.roots {
            if !roots.contains(&request.root) {
                return Err(VerifyError::UnknownRoot(request.root));
            }
        }
        if *proof != Self::prove(request) {
            return Err(VerifyError::InvalidProof(
                "proof does not bind the supplied public signals".to_string(),
            ));
        }
        if !state.spent.insert(request.nullifier_hash) {
            return Err(VerifyError::NullifierAlreadyUsed(request.nullifier_hash));
        }

        tracing::debug!(nullifier = %request.nullifier_hash, "mock verifier accepted proof");
        Ok(())
    }
}
