//! # Balance Ledger
//!
//! Fungible balance store: balances, allowances, total supply, and an
//! append-only event log.
//!
//! ## Security Invariant
//!
//! `total_supply == Σ balances` after every operation. Supply only grows
//! through [`BalanceLedger::mint`], which is crate-private: the claim gate
//! is the sole issuer. Every operation validates all of its preconditions
//! before its first write, so a failed call leaves the ledger untouched.

use std::collections::BTreeMap;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use cash_core::AccountId;

use crate::error::LedgerError;

/// Static token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Decimal places of one whole token.
    pub decimals: u8,
}

/// A ledger mutation, recorded in order of application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Balance moved. `from` is `None` for a mint.
    Transfer {
        /// Debited account, or `None` when newly issued.
        from: Option<AccountId>,
        /// Credited account.
        to: AccountId,
        /// Amount in base units.
        amount: U256,
    },
    /// Allowance set by an owner for a spender.
    Approval {
        /// Account granting the allowance.
        owner: AccountId,
        /// Account allowed to spend.
        spender: AccountId,
        /// New allowance in base units.
        amount: U256,
    },
}

/// The fungible balance ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceLedger {
    metadata: TokenMetadata,
    total_supply: U256,
    balances: BTreeMap<AccountId, U256>,
    allowances: BTreeMap<AccountId, BTreeMap<AccountId, U256>>,
    events: Vec<LedgerEvent>,
}

impl BalanceLedger {
    /// An empty ledger with zero supply.
    pub fn new(metadata: TokenMetadata) -> Self {
        Self {
            metadata,
            total_supply: U256::ZERO,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Token metadata.
    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Token name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Token symbol.
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Decimal places.
    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Total tokens in existence, in base units.
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Balance of `account`; zero if it has never held tokens.
    pub fn balance_of(&self, account: &AccountId) -> U256 {
        self.balances.get(account).copied().unwrap_or(U256::ZERO)
    }

    /// Remaining amount `spender` may move out of `owner`.
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> U256 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Non-zero balances in account order.
    pub fn balances(&self) -> impl Iterator<Item = (&AccountId, &U256)> {
        self.balances.iter()
    }

    /// Allowances as `owner -> spender -> amount`.
    pub fn allowances(&self) -> &BTreeMap<AccountId, BTreeMap<AccountId, U256>> {
        &self.allowances
    }

    /// Every mutation so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Rebuild a ledger from stored parts. Supply is recomputed from the
    /// balances; callers compare it against any recorded value.
    pub(crate) fn from_parts(
        metadata: TokenMetadata,
        balances: BTreeMap<AccountId, U256>,
        allowances: BTreeMap<AccountId, BTreeMap<AccountId, U256>>,
        events: Vec<LedgerEvent>,
    ) -> Option<Self> {
        let total_supply = sum_balances(&balances)?;
        let balances = balances.into_iter().filter(|(_, b)| !b.is_zero()).collect();
        Some(Self {
            metadata,
            total_supply,
            balances,
            allowances,
            events,
        })
    }

    /// Whether total supply equals the sum of all balances.
    pub fn supply_is_consistent(&self) -> bool {
        sum_balances(&self.balances) == Some(self.total_supply)
    }

    /// New total supply after minting `amount`, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SupplyOverflow`] if supply would overflow.
    pub(crate) fn check_mint(&self, amount: U256) -> Result<U256, LedgerError> {
        self.total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow {
                requested: amount,
                total_supply: self.total_supply,
            })
    }

    /// Issue `amount` new tokens to `to`.
    ///
    /// Only the claim gate calls this.
    pub(crate) fn mint(&mut self, to: AccountId, amount: U256) -> Result<(), LedgerError> {
        let new_supply = self.check_mint(amount)?;
        // A balance never exceeds supply, so this cannot overflow once supply didn't.
        let new_balance = self.balance_of(&to).saturating_add(amount);

        self.total_supply = new_supply;
        self.set_balance(to, new_balance);
        self.events.push(LedgerEvent::Transfer {
            from: None,
            to,
            amount,
        });
        tracing::info!(%to, %amount, supply = %new_supply, "minted");
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if `from` holds less
    /// than `amount`.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.check_balance(&from, amount)?;
        self.move_balance(from, to, amount);
        tracing::info!(%from, %to, %amount, "transfer");
        Ok(())
    }

    /// Set the amount `spender` may move out of `owner`, replacing any
    /// previous allowance. `U256::MAX` grants an unlimited allowance.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, amount: U256) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
        self.events.push(LedgerEvent::Approval {
            owner,
            spender,
            amount,
        });
        tracing::info!(%owner, %spender, %amount, "approval");
    }

    /// `spender` moves `amount` from `from` to `to` against its allowance.
    ///
    /// The allowance decreases by `amount` unless it is unlimited.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientAllowance`] if the allowance is
    /// below `amount`, then [`LedgerError::InsufficientBalance`] if `from`
    /// cannot cover it. Neither failure changes any state.
    pub fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(&from, &spender);
        if amount > allowed {
            return Err(LedgerError::InsufficientAllowance {
                owner: from,
                spender,
                requested: amount,
                available: allowed,
            });
        }
        self.check_balance(&from, amount)?;

        if allowed != U256::MAX {
            self.allowances
                .entry(from)
                .or_default()
                .insert(spender, allowed - amount);
        }
        self.move_balance(from, to, amount);
        tracing::info!(%spender, %from, %to, %amount, "transfer_from");
        Ok(())
    }

    fn check_balance(&self, account: &AccountId, amount: U256) -> Result<(), LedgerError> {
        let available = self.balance_of(account);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                account: *account,
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Debit then credit. Callers have checked the debit.
    fn move_balance(&mut self, from: AccountId, to: AccountId, amount: U256) {
        if from != to {
            let debited = self.balance_of(&from) - amount;
            let credited = self.balance_of(&to).saturating_add(amount);
            self.set_balance(from, debited);
            self.set_balance(to, credited);
        }
        self.events.push(LedgerEvent::Transfer {
            from: Some(from),
            to,
            amount,
        });
    }

    fn set_balance(&mut self, account: AccountId, amount: U256) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }
}

/// Sum of balances, or `None` on overflow.
pub(crate) fn sum_balances(balances: &BTreeMap<AccountId, U256>) -> Option<U256> {
    balances
        .values()
        .try_fold(U256::ZERO, |acc, b| acc.checked_add(*b))
}
