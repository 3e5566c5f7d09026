//! # Claimant Registry
//!
//! Per-claimant rate limiting. Holds the time of each claimant's last
//! successful claim and decides whether a new claim is allowed.
//!
//! Records are created on a claimant's first successful claim, overwritten
//! on every later one, and never removed. A claimant without a record is
//! always eligible.

use std::collections::BTreeMap;

use cash_core::{AccountId, Timestamp};

use crate::error::ClaimError;

/// Last-claim timestamps keyed by claimant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRegistry {
    wait_period_secs: u64,
    last_claims: BTreeMap<AccountId, Timestamp>,
}

impl ClaimRegistry {
    /// An empty registry enforcing `wait_period_secs` between claims.
    pub fn new(wait_period_secs: u64) -> Self {
        Self {
            wait_period_secs,
            last_claims: BTreeMap::new(),
        }
    }

    pub(crate) fn from_parts(
        wait_period_secs: u64,
        last_claims: BTreeMap<AccountId, Timestamp>,
    ) -> Self {
        Self {
            wait_period_secs,
            last_claims,
        }
    }

    /// Minimum seconds between two successful claims by one claimant.
    pub fn wait_period_secs(&self) -> u64 {
        self.wait_period_secs
    }

    /// When `claimant` last claimed successfully.
    pub fn last_claim(&self, claimant: &AccountId) -> Option<Timestamp> {
        self.last_claims.get(claimant).copied()
    }

    /// Earliest instant `claimant` may claim again. `None` if the claimant
    /// has no record (eligible immediately) or the instant is not representable.
    pub fn next_eligible_at(&self, claimant: &AccountId) -> Option<Timestamp> {
        self.last_claim(claimant)?
            .checked_add_secs(self.wait_period_secs)
    }

    /// Check whether `claimant` may claim at `now`.
    ///
    /// Eligible when no record exists or when at least the wait period has
    /// elapsed since the last claim (the boundary itself is eligible).
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::NotReady`] with the remaining wait otherwise.
    pub fn check(&self, claimant: &AccountId, now: Timestamp) -> Result<(), ClaimError> {
        let Some(last_claim) = self.last_claim(claimant) else {
            return Ok(());
        };
        let elapsed = i128::from(now.seconds_since(&last_claim));
        let wait = i128::from(self.wait_period_secs);
        if elapsed >= wait {
            return Ok(());
        }
        let remaining = u64::try_from(wait - elapsed).unwrap_or(u64::MAX);
        Err(ClaimError::NotReady {
            claimant: *claimant,
            last_claim,
            retry_after_secs: remaining,
        })
    }

    /// Record a successful claim by `claimant` at `at`.
    pub(crate) fn record(&mut self, claimant: AccountId, at: Timestamp) {
        self.last_claims.insert(claimant, at);
    }

    /// All records in claimant order.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &Timestamp)> {
        self.last_claims.iter()
    }

    /// Number of claimants that have ever claimed.
    pub fn len(&self) -> usize {
        self.last_claims.len()
    }

    /// Whether no claim has ever succeeded.
    pub fn is_empty(&self) -> bool {
        self.last_claims.is_empty()
    }
}
