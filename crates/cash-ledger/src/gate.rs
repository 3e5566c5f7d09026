//! # Claim Gate
//!
//! The only issuer. A claim mints the configured amount to the caller when
//! the caller's cooldown has elapsed and the external verifier accepts a
//! proof bound to the caller, the configured group, and this deployment's
//! external nullifier.
//!
//! ## Claim Sequence
//!
//! 1. Cooldown check against the claimant registry.
//! 2. Supply headroom check (no write).
//! 3. Verifier call with the public signals.
//! 4. Mint, record the claim time, append the issuance record.
//!
//! ## Security Invariant
//!
//! Nothing is written before the verifier accepts. Once it has, the mint
//! cannot fail (step 2 already proved headroom and `&mut self` excludes
//! interleaving), so the nullifier the verifier consumed always pays out
//! and a rejected or early claim leaves balances, supply, and eligibility
//! exactly as they were.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use cash_core::{AccountId, Clock, SystemClock, Timestamp};
use cash_zkp::{external_nullifier_hash, signal_hash, IdentityVerifier, Proof, VerificationRequest};

use crate::config::{ConfigError, IssuanceConfig};
use crate::error::ClaimError;
use crate::ledger::BalanceLedger;
use crate::registry::ClaimRegistry;

/// Proof material a caller submits with a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofMaterial {
    /// Identity group Merkle root the proof was generated against.
    pub root: U256,
    /// The caller's nullifier hash for this action.
    pub nullifier_hash: U256,
    /// The proof itself.
    pub proof: Proof,
}

/// One successful issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRecord {
    /// Credited account.
    pub claimant: AccountId,
    /// Amount minted.
    pub amount: U256,
    /// Nullifier consumed by the verifier.
    pub nullifier_hash: U256,
    /// When the claim succeeded.
    pub claimed_at: Timestamp,
}

/// Verification-gated issuance over a [`BalanceLedger`].
///
/// Generic over the verifier backend and the clock; production uses the
/// host's [`SystemClock`].
#[derive(Debug)]
pub struct ClaimGate<V, C = SystemClock> {
    config: IssuanceConfig,
    external_nullifier_hash: U256,
    verifier: V,
    clock: C,
    registry: ClaimRegistry,
    ledger: BalanceLedger,
    issuances: Vec<IssuanceRecord>,
}

impl<V: IdentityVerifier> ClaimGate<V, SystemClock> {
    /// Set up an empty ledger and registry from `config`, reading time from
    /// the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn initialize(config: IssuanceConfig, verifier: V) -> Result<Self, ConfigError> {
        Self::with_clock(config, verifier, SystemClock)
    }
}

impl<V: IdentityVerifier, C: Clock> ClaimGate<V, C> {
    /// Set up an empty ledger and registry from `config` with an explicit clock.
    ///
    /// The external nullifier hash is derived here once and never again.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn with_clock(config: IssuanceConfig, verifier: V, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let external_nullifier_hash = external_nullifier_hash(&config.app_id, &config.action);
        let ledger = BalanceLedger::new(config.metadata());
        let registry = ClaimRegistry::new(config.wait_period_secs);
        tracing::info!(
            app_id = %config.app_id,
            action = %config.action,
            group_id = %config.group_id,
            external_nullifier = %format!("{external_nullifier_hash:#x}"),
            "claim gate initialized"
        );
        Ok(Self {
            config,
            external_nullifier_hash,
            verifier,
            clock,
            registry,
            ledger,
            issuances: Vec::new(),
        })
    }

    pub(crate) fn from_parts(
        config: IssuanceConfig,
        verifier: V,
        clock: C,
        registry: ClaimRegistry,
        ledger: BalanceLedger,
        issuances: Vec<IssuanceRecord>,
    ) -> Self {
        let external_nullifier_hash = external_nullifier_hash(&config.app_id, &config.action);
        Self {
            config,
            external_nullifier_hash,
            verifier,
            clock,
            registry,
            ledger,
            issuances,
        }
    }

    /// Claim the issuance amount for `caller`.
    ///
    /// Returns the amount minted.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::NotReady`] if the cooldown has not elapsed. The
    ///   verifier is not called.
    /// - [`ClaimError::Verification`] with the verifier's error unchanged.
    /// - [`ClaimError::Ledger`] if supply has no headroom for another
    ///   issuance.
    ///
    /// Every failure leaves all state unchanged.
    pub fn claim(&mut self, caller: AccountId, material: &ProofMaterial) -> Result<U256, ClaimError> {
        let now = self.clock.now();

        if let Err(err) = self.registry.check(&caller, now) {
            tracing::debug!(%caller, %now, error = %err, "claim rejected: cooldown");
            return Err(err);
        }

        let amount = self.config.claim_amount;
        if let Err(err) = self.ledger.check_mint(amount) {
            tracing::error!(%caller, error = %err, "claim rejected: no supply headroom");
            return Err(err.into());
        }

        let request = VerificationRequest {
            root: material.root,
            group_id: self.config.group_id,
            signal_hash: signal_hash(&caller),
            nullifier_hash: material.nullifier_hash,
            external_nullifier_hash: self.external_nullifier_hash,
        };
        if let Err(err) = self.verifier.verify(&request, &material.proof) {
            tracing::warn!(%caller, error = %err, "claim rejected by verifier");
            return Err(err.into());
        }

        if let Err(err) = self.ledger.mint(caller, amount) {
            // Unreachable after check_mint; surfaced rather than masked.
            tracing::error!(%caller, error = %err, "mint failed after verification");
            return Err(err.into());
        }
        self.registry.record(caller, now);
        self.issuances.push(IssuanceRecord {
            claimant: caller,
            amount,
            nullifier_hash: material.nullifier_hash,
            claimed_at: now,
        });

        tracing::info!(%caller, %amount, claimed_at = %now, "claim issued");
        Ok(amount)
    }

    /// When `claimant` last claimed successfully.
    pub fn last_claim(&self, claimant: &AccountId) -> Option<Timestamp> {
        self.registry.last_claim(claimant)
    }

    /// Earliest instant `claimant` may claim again; `None` if never claimed.
    pub fn next_eligible_at(&self, claimant: &AccountId) -> Option<Timestamp> {
        self.registry.next_eligible_at(claimant)
    }

    /// Whether `claimant` passes the cooldown check right now.
    pub fn can_claim(&self, claimant: &AccountId) -> bool {
        self.registry.check(claimant, self.clock.now()).is_ok()
    }

    /// The external nullifier hash fixed at initialization.
    pub fn external_nullifier_hash(&self) -> U256 {
        self.external_nullifier_hash
    }

    /// Identity group accepted for claims.
    pub fn group_id(&self) -> U256 {
        self.config.group_id
    }

    /// Base units minted per claim.
    pub fn claim_amount(&self) -> U256 {
        self.config.claim_amount
    }

    /// Cooldown between claims.
    pub fn wait_period_secs(&self) -> u64 {
        self.config.wait_period_secs
    }

    /// The configuration the gate was built from.
    pub fn config(&self) -> &IssuanceConfig {
        &self.config
    }

    /// Read access to the ledger.
    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// Mutable access to the ledger for transfers and approvals. Minting
    /// is not reachable through it.
    pub fn ledger_mut(&mut self) -> &mut BalanceLedger {
        &mut self.ledger
    }

    /// The identity-proof verifier.
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// The clock that timestamps claims.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Per-claimant last-claim records.
    pub fn registry(&self) -> &ClaimRegistry {
        &self.registry
    }

    /// Every successful issuance, oldest first.
    pub fn issuances(&self) -> &[IssuanceRecord] {
        &self.issuances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cash_core::{one_token, ManualClock};
    use cash_zkp::{MockVerifier, VerifyError};

    use crate::error::LedgerError;

    const T0: i64 = 1_000_000;

    fn alice() -> AccountId {
        AccountId::from_bytes([0xa1; 20])
    }

    fn bob() -> AccountId {
        AccountId::from_bytes([0xb0; 20])
    }

    fn charlie() -> AccountId {
        AccountId::from_bytes([0xc4; 20])
    }

    fn half() -> U256 {
        one_token() / U256::from(2u64)
    }

    fn gate() -> (ClaimGate<MockVerifier, ManualClock>, ManualClock) {
        let clock = ManualClock::new(Timestamp::from_unix(T0).unwrap());
        let gate = ClaimGate::with_clock(
            IssuanceConfig::default(),
            MockVerifier::default(),
            clock.clone(),
        )
        .unwrap();
        (gate, clock)
    }

    /// Proof material the mock verifier accepts for `caller` on `gate`.
    fn material<C: Clock>(
        gate: &ClaimGate<MockVerifier, C>,
        caller: &AccountId,
        nullifier: u64,
    ) -> ProofMaterial {
        let request = VerificationRequest {
            root: U256::from(0xf00du64),
            group_id: gate.group_id(),
            signal_hash: signal_hash(caller),
            nullifier_hash: U256::from(nullifier),
            external_nullifier_hash: gate.external_nullifier_hash(),
        };
        ProofMaterial {
            root: request.root,
            nullifier_hash: request.nullifier_hash,
            proof: MockVerifier::prove(&request),
        }
    }

    #[test]
    fn first_claim_mints_and_records() {
        let (mut gate, _clock) = gate();
        let m = material(&gate, &alice(), 1);
        assert_eq!(gate.claim(alice(), &m).unwrap(), one_token());
        assert_eq!(gate.ledger().balance_of(&alice()), one_token());
        assert_eq!(gate.ledger().total_supply(), one_token());
        assert_eq!(gate.last_claim(&alice()), Some(Timestamp::from_unix(T0).unwrap()));
        assert_eq!(gate.issuances().len(), 1);
    }

    #[test]
    fn immediate_second_claim_is_not_ready() {
        let (mut gate, _clock) = gate();
        gate.claim(alice(), &material(&gate, &alice(), 1)).unwrap();
        let err = gate
            .claim(alice(), &material(&gate, &alice(), 2))
            .unwrap_err();
        assert!(matches!(err, ClaimError::NotReady { retry_after_secs: 86_400, .. }));
        assert_eq!(gate.ledger().balance_of(&alice()), one_token());
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let (mut gate, clock) = gate();
        gate.claim(alice(), &material(&gate, &alice(), 1)).unwrap();

        clock.advance(86_399);
        let err = gate
            .claim(alice(), &material(&gate, &alice(), 2))
            .unwrap_err();
        assert!(matches!(err, ClaimError::NotReady { retry_after_secs: 1, .. }));
        assert!(!gate.can_claim(&alice()));

        clock.advance(1);
        assert!(gate.can_claim(&alice()));
        gate.claim(alice(), &material(&gate, &alice(), 2)).unwrap();
        assert_eq!(
            gate.ledger().balance_of(&alice()),
            one_token() * U256::from(2u64)
        );
        assert_eq!(
            gate.last_claim(&alice()),
            Some(Timestamp::from_unix(T0 + 86_400).unwrap())
        );
    }

    #[test]
    fn claim_then_transfer() {
        let (mut gate, _clock) = gate();
        gate.claim(alice(), &material(&gate, &alice(), 1)).unwrap();
        gate.ledger_mut().transfer(alice(), bob(), half()).unwrap();
        assert_eq!(gate.ledger().balance_of(&alice()), half());
        assert_eq!(gate.ledger().balance_of(&bob()), half());
        assert_eq!(gate.ledger().total_supply(), one_token());
    }

    #[test]
    fn claim_then_delegated_spend() {
        let (mut gate, _clock) = gate();
        gate.claim(alice(), &material(&gate, &alice(), 1)).unwrap();
        gate.ledger_mut().approve(alice(), bob(), half());
        gate.ledger_mut()
            .transfer_from(bob(), alice(), charlie(), half())
            .unwrap();
        assert_eq!(gate.ledger().allowance(&alice(), &bob()), U256::ZERO);
        assert_eq!(gate.ledger().balance_of(&charlie()), half());
    }

    #[test]
    fn verifier_not_called_during_cooldown() {
        let (mut gate, _clock) = gate();
        gate.claim(alice(), &material(&gate, &alice(), 1)).unwrap();
        let m = material(&gate, &alice(), 2);
        gate.claim(alice(), &m).unwrap_err();
        assert_eq!(gate.verifier().calls(), 1);
        assert!(!gate.verifier().is_spent(&m.nullifier_hash));
    }

    #[test]
    fn verifier_rejection_passes_through_and_changes_nothing() {
        let (mut gate, _clock) = gate();
        gate.verifier().reject_all("not a group member");
        let err = gate
            .claim(alice(), &material(&gate, &alice(), 1))
            .unwrap_err();
        assert_eq!(
            err,
            ClaimError::Verification(VerifyError::InvalidProof(
                "not a group member".to_string()
            ))
        );
        assert_eq!(gate.ledger().total_supply(), U256::ZERO);
        assert_eq!(gate.last_claim(&alice()), None);
        assert!(gate.ledger().events().is_empty());
        assert!(gate.issuances().is_empty());
    }

    #[test]
    fn replayed_nullifier_is_rejected_for_another_caller() {
        let (mut gate, _clock) = gate();
        let m = material(&gate, &alice(), 1);
        gate.claim(alice(), &m).unwrap();
        // Bob resubmits Alice's material: the signal binding fails first.
        let err = gate.claim(bob(), &m).unwrap_err();
        assert!(matches!(
            err,
            ClaimError::Verification(VerifyError::InvalidProof(_))
        ));
        assert_eq!(gate.ledger().balance_of(&bob()), U256::ZERO);
    }

    #[test]
    fn callers_are_rate_limited_independently() {
        let (mut gate, _clock) = gate();
        gate.claim(alice(), &material(&gate, &alice(), 1)).unwrap();
        gate.claim(bob(), &material(&gate, &bob(), 2)).unwrap();
        assert_eq!(gate.ledger().total_supply(), one_token() * U256::from(2u64));
        assert_eq!(gate.registry().len(), 2);
    }

    #[test]
    fn no_headroom_fails_before_verifier() {
        let clock = ManualClock::new(Timestamp::from_unix(T0).unwrap());
        let config = IssuanceConfig {
            claim_amount: U256::MAX,
            ..IssuanceConfig::default()
        };
        let mut gate = ClaimGate::with_clock(config, MockVerifier::default(), clock).unwrap();
        gate.claim(alice(), &material(&gate, &alice(), 1)).unwrap();
        let m = material(&gate, &bob(), 2);
        let err = gate.claim(bob(), &m).unwrap_err();
        assert!(matches!(
            err,
            ClaimError::Ledger(LedgerError::SupplyOverflow { .. })
        ));
        assert!(!err.is_recoverable());
        assert_eq!(gate.verifier().calls(), 1);
        assert!(!gate.verifier().is_spent(&m.nullifier_hash));
        assert_eq!(gate.last_claim(&bob()), None);
    }

    #[test]
    fn external_nullifier_is_fixed_at_initialization() {
        let (gate, _clock) = gate();
        assert_eq!(
            gate.external_nullifier_hash(),
            external_nullifier_hash("app_cash", "claim")
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = IssuanceConfig {
            wait_period_secs: 0,
            ..IssuanceConfig::default()
        };
        assert!(ClaimGate::initialize(config, MockVerifier::default()).is_err());
    }

    #[test]
    fn next_eligible_at_tracks_last_claim() {
        let (mut gate, _clock) = gate();
        assert_eq!(gate.next_eligible_at(&alice()), None);
        gate.claim(alice(), &material(&gate, &alice(), 1)).unwrap();
        assert_eq!(
            gate.next_eligible_at(&alice()),
            Some(Timestamp::from_unix(T0 + 86_400).unwrap())
        );
    }
}
