//! # Ledger Snapshots
//!
//! Serializable image of a [`ClaimGate`]'s state: configuration, balances,
//! allowances, claimant records, the event log, and issuance history. The
//! verifier and clock are not part of the image; the caller supplies them
//! on restore.
//!
//! Restoring re-derives everything derivable and refuses a snapshot whose
//! recorded values disagree with the derivation. In particular the total
//! supply is recomputed from balances, so a hand-edited balance cannot mint
//! tokens.

use std::collections::BTreeMap;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use cash_core::{AccountId, Clock, Timestamp};
use cash_zkp::{external_nullifier_hash, IdentityVerifier};

use crate::config::IssuanceConfig;
use crate::error::SnapshotError;
use crate::gate::{ClaimGate, IssuanceRecord};
use crate::ledger::{BalanceLedger, LedgerEvent, TokenMetadata};
use crate::registry::ClaimRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub account: AccountId,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    pub owner: AccountId,
    pub spender: AccountId,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEntry {
    pub claimant: AccountId,
    pub last_claim: Timestamp,
}

/// Point-in-time image of a claim gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub config: IssuanceConfig,
    pub external_nullifier_hash: U256,
    pub metadata: TokenMetadata,
    pub total_supply: U256,
    pub balances: Vec<BalanceEntry>,
    pub allowances: Vec<AllowanceEntry>,
    pub last_claims: Vec<ClaimEntry>,
    #[serde(default)]
    pub events: Vec<LedgerEvent>,
    #[serde(default)]
    pub issuances: Vec<IssuanceRecord>,
}

impl LedgerSnapshot {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse JSON produced by [`to_json`](Self::to_json). Does not validate;
    /// [`ClaimGate::restore`] does.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] on malformed input.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl<V: IdentityVerifier, C: Clock> ClaimGate<V, C> {
    /// Capture the current state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let ledger = self.ledger();
        LedgerSnapshot {
            config: self.config().clone(),
            external_nullifier_hash: self.external_nullifier_hash(),
            metadata: ledger.metadata().clone(),
            total_supply: ledger.total_supply(),
            balances: ledger
                .balances()
                .map(|(account, amount)| BalanceEntry {
                    account: *account,
                    amount: *amount,
                })
                .collect(),
            allowances: ledger
                .allowances()
                .iter()
                .flat_map(|(owner, spenders)| {
                    spenders.iter().map(move |(spender, amount)| AllowanceEntry {
                        owner: *owner,
                        spender: *spender,
                        amount: *amount,
                    })
                })
                .collect(),
            last_claims: self
                .registry()
                .iter()
                .map(|(claimant, at)| ClaimEntry {
                    claimant: *claimant,
                    last_claim: *at,
                })
                .collect(),
            events: ledger.events().to_vec(),
            issuances: self.issuances().to_vec(),
        }
    }

    /// Rebuild a gate from `snapshot` with the given verifier and clock.
    ///
    /// # Errors
    ///
    /// - [`SnapshotError::Config`] if the stored configuration is invalid.
    /// - [`SnapshotError::ExternalNullifierMismatch`] if the stored hash is
    ///   not the one the configuration derives.
    /// - [`SnapshotError::MetadataMismatch`] if the stored metadata is not
    ///   the configured metadata.
    /// - [`SnapshotError::IssuanceMismatch`] if a claimant's last claim is
    ///   not the time of their latest recorded issuance.
    /// - [`SnapshotError::BalanceOverflow`] or
    ///   [`SnapshotError::SupplyMismatch`] if balances do not add up to the
    ///   recorded supply.
    pub fn restore(snapshot: LedgerSnapshot, verifier: V, clock: C) -> Result<Self, SnapshotError> {
        let LedgerSnapshot {
            config,
            external_nullifier_hash: recorded_hash,
            metadata,
            total_supply,
            balances,
            allowances,
            last_claims,
            events,
            issuances,
        } = snapshot;

        config.validate()?;

        let derived = external_nullifier_hash(&config.app_id, &config.action);
        if derived != recorded_hash {
            return Err(SnapshotError::ExternalNullifierMismatch {
                recorded: recorded_hash,
                derived,
            });
        }

        let configured = config.metadata();
        if metadata != configured {
            return Err(SnapshotError::MetadataMismatch {
                recorded: metadata,
                configured,
            });
        }

        let balances: BTreeMap<AccountId, U256> = balances
            .into_iter()
            .map(|entry| (entry.account, entry.amount))
            .collect();
        let mut allowance_map: BTreeMap<AccountId, BTreeMap<AccountId, U256>> = BTreeMap::new();
        for entry in allowances {
            allowance_map
                .entry(entry.owner)
                .or_default()
                .insert(entry.spender, entry.amount);
        }

        let ledger = BalanceLedger::from_parts(metadata, balances, allowance_map, events)
            .ok_or(SnapshotError::BalanceOverflow)?;
        if ledger.total_supply() != total_supply {
            return Err(SnapshotError::SupplyMismatch {
                recorded: total_supply,
                computed: ledger.total_supply(),
            });
        }

        let last_claims: BTreeMap<AccountId, Timestamp> = last_claims
            .into_iter()
            .map(|entry| (entry.claimant, entry.last_claim))
            .collect();
        check_issuance_history(&last_claims, &issuances)?;

        let registry = ClaimRegistry::from_parts(config.wait_period_secs, last_claims);

        tracing::info!(
            holders = ledger.balances().count(),
            claimants = registry.len(),
            supply = %total_supply,
            "restored ledger snapshot"
        );
        Ok(Self::from_parts(config, verifier, clock, registry, ledger, issuances))
    }
}

/// Every claimant's last claim must be the time of their latest issuance,
/// and every issuance's claimant must have a last claim.
fn check_issuance_history(
    last_claims: &BTreeMap<AccountId, Timestamp>,
    issuances: &[IssuanceRecord],
) -> Result<(), SnapshotError> {
    let mut latest: BTreeMap<AccountId, Timestamp> = BTreeMap::new();
    for record in issuances {
        let entry = latest.entry(record.claimant).or_insert(record.claimed_at);
        *entry = (*entry).max(record.claimed_at);
    }

    let claimants = last_claims.keys().chain(latest.keys());
    for claimant in claimants {
        let recorded = last_claims.get(claimant).copied();
        let issued = latest.get(claimant).copied();
        if recorded != issued {
            return Err(SnapshotError::IssuanceMismatch {
                claimant: *claimant,
                recorded,
                issued,
            });
        }
    }
    Ok(())
}
