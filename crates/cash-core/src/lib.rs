//! # cash-core — Foundational Types for the CASH Ledger
//!
//! Leaf crate of the workspace. Defines the primitives every other crate
//! builds on so that identities, instants, and token amounts never travel
//! as bare strings or integers.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identities.** [`AccountId`] wraps a 20-byte address. The
//!    same type keys balances, allowances, and claimant records, and is the
//!    input to the verification signal.
//!
//! 2. **UTC-only timestamps.** [`Timestamp`] is second-precision UTC. All
//!    cooldown arithmetic is done in whole seconds.
//!
//! 3. **Injectable time.** The [`Clock`] trait decouples "now" from the
//!    system clock so the rate limiter can be tested at exact boundaries.
//!
//! 4. **256-bit amounts.** Balances are `U256` base units; [`parse_units`]
//!    and [`format_units`] convert to and from human-readable token units.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cash-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod amount;
pub mod error;
pub mod identity;
pub mod temporal;

pub use alloy_primitives::{Address, U256};

pub use amount::{format_units, parse_units, one_token, DECIMALS};
pub use error::ValidationError;
pub use identity::AccountId;
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
