//! # Adversarial Claim Scenarios
//!
//! Replay of a consumed nullifier, front-running another caller's proof,
//! proofs generated for a different application or action, wrong group and
//! unknown root, and verifier errors surfacing to the caller unchanged.

use alloy_primitives::U256;
use cash_core::{one_token, AccountId, ManualClock, Timestamp};
use cash_ledger::{ClaimError, ClaimGate, IssuanceConfig, ProofMaterial};
use cash_zkp::{
    external_nullifier_hash, signal_hash, IdentityVerifier, MockVerifier, Proof,
    VerificationRequest, VerifyError, PROOF_ELEMENTS,
};
use parking_lot::Mutex;

const T0: i64 = 1_000_000;
const DAY: u64 = 86_400;

fn alice() -> AccountId {
    AccountId::from_bytes([0xa1; 20])
}

fn mallory() -> AccountId {
    AccountId::from_bytes([0x66; 20])
}

fn clock() -> ManualClock {
    ManualClock::new(Timestamp::from_unix(T0).unwrap())
}

fn request_for(
    caller: &AccountId,
    nullifier: u64,
    group_id: U256,
    external_nullifier: U256,
) -> VerificationRequest {
    VerificationRequest {
        root: U256::from(0x5eedu64),
        group_id,
        signal_hash: signal_hash(caller),
        nullifier_hash: U256::from(nullifier),
        external_nullifier_hash: external_nullifier,
    }
}

fn material(request: &VerificationRequest) -> ProofMaterial {
    ProofMaterial {
        root: request.root,
        nullifier_hash: request.nullifier_hash,
        proof: MockVerifier::prove(request),
    }
}

fn mock_gate() -> ClaimGate<MockVerifier, ManualClock> {
    ClaimGate::with_clock(IssuanceConfig::default(), MockVerifier::default(), clock()).unwrap()
}

// ---------------------------------------------------------------------------
// 1. Replay of a consumed nullifier after the cooldown
// ---------------------------------------------------------------------------

#[test]
fn replayed_nullifier_is_rejected_after_cooldown() {
    let clock = clock();
    let mut gate =
        ClaimGate::with_clock(IssuanceConfig::default(), MockVerifier::default(), clock.clone())
            .unwrap();
    let req = request_for(&alice(), 1, gate.group_id(), gate.external_nullifier_hash());
    let m = material(&req);
    gate.claim(alice(), &m).unwrap();

    clock.advance(DAY);
    let err = gate.claim(alice(), &m).unwrap_err();
    assert_eq!(
        err,
        ClaimError::Verification(VerifyError::NullifierAlreadyUsed(U256::from(1u64)))
    );
    assert_eq!(gate.ledger().balance_of(&alice()), one_token());
    // Eligibility is untouched by the failed attempt.
    assert!(gate.can_claim(&alice()));
}

// ---------------------------------------------------------------------------
// 2. Front-running: an observer resubmits a pending proof as their own
// ---------------------------------------------------------------------------

#[test]
fn front_running_cannot_redirect_issuance() {
    let mut gate = mock_gate();
    let req = request_for(&alice(), 9, gate.group_id(), gate.external_nullifier_hash());
    let m = material(&req);

    let err = gate.claim(mallory(), &m).unwrap_err();
    assert!(matches!(err, ClaimError::Verification(VerifyError::InvalidProof(_))));
    assert_eq!(gate.ledger().balance_of(&mallory()), U256::ZERO);
    assert_eq!(gate.last_claim(&mallory()), None);

    // The honest submission still goes through: the nullifier was not burned.
    gate.claim(alice(), &m).unwrap();
    assert_eq!(gate.ledger().balance_of(&alice()), one_token());
}

// ---------------------------------------------------------------------------
// 3. Proof bound to another application or action
// ---------------------------------------------------------------------------

#[test]
fn proof_for_another_action_is_rejected() {
    let mut gate = mock_gate();
    let foreign = external_nullifier_hash("app_cash", "vote");
    assert_ne!(foreign, gate.external_nullifier_hash());
    let req = request_for(&alice(), 1, gate.group_id(), foreign);
    let err = gate.claim(alice(), &material(&req)).unwrap_err();
    assert!(matches!(err, ClaimError::Verification(_)));
    assert_eq!(gate.ledger().total_supply(), U256::ZERO);
}

#[test]
fn proof_for_another_application_is_rejected() {
    let mut gate = mock_gate();
    let foreign = external_nullifier_hash("app_other", "claim");
    let req = request_for(&alice(), 1, gate.group_id(), foreign);
    assert!(gate.claim(alice(), &material(&req)).is_err());
}

// ---------------------------------------------------------------------------
// 4. Group and root checks
// ---------------------------------------------------------------------------

#[test]
fn verifier_for_wrong_group_rejects() {
    let mut gate = ClaimGate::with_clock(
        IssuanceConfig::default(),
        MockVerifier::new(U256::from(2u64)),
        clock(),
    )
    .unwrap();
    let req = request_for(&alice(), 1, gate.group_id(), gate.external_nullifier_hash());
    let err = gate.claim(alice(), &material(&req)).unwrap_err();
    assert_eq!(
        err,
        ClaimError::Verification(VerifyError::InvalidGroup {
            expected: U256::from(2u64),
            actual: U256::from(1u64),
        })
    );
}

#[test]
fn unknown_root_is_rejected() {
    let verifier = MockVerifier::default().with_roots([U256::from(1u64)]);
    let mut gate = ClaimGate::with_clock(IssuanceConfig::default(), verifier, clock()).unwrap();
    let req = request_for(&alice(), 1, gate.group_id(), gate.external_nullifier_hash());
    let err = gate.claim(alice(), &material(&req)).unwrap_err();
    assert_eq!(
        err,
        ClaimError::Verification(VerifyError::UnknownRoot(U256::from(0x5eedu64)))
    );
}

#[test]
fn zero_proof_is_malformed() {
    let mut gate = mock_gate();
    let m = ProofMaterial {
        root: U256::from(1u64),
        nullifier_hash: U256::from(1u64),
        proof: Proof([U256::ZERO; PROOF_ELEMENTS]),
    };
    let err = gate.claim(alice(), &m).unwrap_err();
    assert!(matches!(err, ClaimError::Verification(VerifyError::MalformedProof(_))));
}

// ---------------------------------------------------------------------------
// 5. A third-party verifier: errors pass through verbatim
// ---------------------------------------------------------------------------

/// Records every request and answers with a fixed verdict.
struct Scripted {
    verdict: Result<(), VerifyError>,
    seen: Mutex<Vec<VerificationRequest>>,
}

impl IdentityVerifier for Scripted {
    fn verify(&self, request: &VerificationRequest, _proof: &Proof) -> Result<(), VerifyError> {
        self.seen.lock().push(*request);
        self.verdict.clone()
    }
}

#[test]
fn verifier_error_is_surfaced_unmodified() {
    let outage = VerifyError::Unavailable("rpc timeout".to_string());
    let verifier = Scripted {
        verdict: Err(outage.clone()),
        seen: Mutex::new(Vec::new()),
    };
    let mut gate = ClaimGate::with_clock(IssuanceConfig::default(), verifier, clock()).unwrap();
    let m = ProofMaterial {
        root: U256::from(1u64),
        nullifier_hash: U256::from(2u64),
        proof: Proof([U256::from(3u64); PROOF_ELEMENTS]),
    };
    let err = gate.claim(alice(), &m).unwrap_err();
    assert_eq!(format!("{err}"), format!("{outage}"));
    assert_eq!(err, ClaimError::Verification(outage));
    assert!(gate.ledger().events().is_empty());
}

#[test]
fn gate_sends_bound_public_signals() {
    let verifier = Scripted {
        verdict: Ok(()),
        seen: Mutex::new(Vec::new()),
    };
    let mut gate = ClaimGate::with_clock(IssuanceConfig::default(), verifier, clock()).unwrap();
    let m = ProofMaterial {
        root: U256::from(11u64),
        nullifier_hash: U256::from(22u64),
        proof: Proof([U256::from(3u64); PROOF_ELEMENTS]),
    };
    gate.claim(alice(), &m).unwrap();

    let seen = gate.verifier().seen.lock().clone();
    assert_eq!(
        seen,
        vec![VerificationRequest {
            root: U256::from(11u64),
            group_id: U256::from(1u64),
            signal_hash: signal_hash(&alice()),
            nullifier_hash: U256::from(22u64),
            external_nullifier_hash: external_nullifier_hash("app_cash", "claim"),
        }]
    );
}

#[test]
fn permissive_verifier_still_rate_limits() {
    let verifier = Scripted {
        verdict: Ok(()),
        seen: Mutex::new(Vec::new()),
    };
    let mut gate = ClaimGate::with_clock(IssuanceConfig::default(), verifier, clock()).unwrap();
    let m = ProofMaterial {
        root: U256::from(1u64),
        nullifier_hash: U256::from(1u64),
        proof: Proof([U256::from(1u64); PROOF_ELEMENTS]),
    };
    gate.claim(alice(), &m).unwrap();
    assert!(matches!(
        gate.claim(alice(), &m),
        Err(ClaimError::NotReady { .. })
    ));
    assert_eq!(gate.verifier().seen.lock().len(), 1);
}
