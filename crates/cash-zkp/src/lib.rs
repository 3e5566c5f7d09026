//! # cash-zkp — Identity Proof Verification Boundary
//!
//! The ledger never checks a zero-knowledge proof itself. It hands the
//! proof and a fixed set of public signals to an [`IdentityVerifier`] and
//! acts only on the verdict.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`IdentityVerifier`] is the single-operation
//!   contract every backend satisfies, together with the [`Proof`] blob,
//!   the [`VerificationRequest`] public signals, and [`VerifyError`].
//!
//! - **Field** (`field.rs`): hash-to-field reductions that produce the
//!   signal hash (binds the caller) and the external nullifier hash (binds
//!   the application and action).
//!
//! - **Mock** (`mock.rs`, feature `mock`): [`MockVerifier`] is a
//!   deterministic, transparent verifier for development and tests. It
//!   enforces the full contract (group, root allow-list, signal binding,
//!   single-use nullifiers) without any zero-knowledge guarantee.
//!
//! ## Verifier Contract
//!
//! A verifier must reject malformed proofs, proofs that do not bind the
//! supplied public signals, and any nullifier hash it has already
//! accepted. Callers treat every `Err` as "not verified" and never branch
//! on the variant.

pub mod field;
#[cfg(feature = "mock")]
pub mod mock;
pub mod traits;

pub use field::{external_nullifier_hash, hash_to_field, signal_hash};
#[cfg(feature = "mock")]
pub use mock::MockVerifier;
pub use traits::{IdentityVerifier, Proof, VerificationRequest, VerifyError, PROOF_ELEMENTS};
