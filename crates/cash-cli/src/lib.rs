//! # cash-cli — Command-Line Interface for the CASH Ledger
//!
//! Provides the `cash` binary. All commands operate on a JSON state file
//! holding a [`LedgerSnapshot`](cash_ledger::LedgerSnapshot) plus the
//! development verifier's spent nullifiers.
//!
//! ## Subcommands
//!
//! - `cash init`: create the state file from configuration.
//! - `cash derive`: compute external nullifier and signal hashes.
//! - `cash info`, `cash balance`, `cash allowance`: read-only queries.
//! - `cash transfer`, `cash approve`, `cash transfer-from`: token operations.
//! - `cash dev-proof`, `cash claim`: issue against the mock verifier.
//!
//! ```bash
//! cash init
//! cash dev-proof --account 0xa1... --root 1 --nullifier-hash 42 > proof.txt
//! cash claim --account 0xa1... --root 1 --nullifier-hash 42 --proof "$(cat proof.txt)"
//! cash transfer --from 0xa1... --to 0xb0... --amount 0.5
//! ```
//!
//! Commands return an exit code: `0` on success, `1` when the ledger
//! refused the operation. Errors that prevent the command from running at
//! all propagate as `anyhow::Error`.

pub mod claim;
pub mod derive;
pub mod init;
pub mod state;
pub mod token;

use std::path::PathBuf;

use anyhow::{Context, Result};

use cash_core::{parse_units, AccountId, DECIMALS, U256};
use cash_ledger::IssuanceConfig;
use cash_zkp::Proof;

/// State file used when `--state` is not given.
pub const DEFAULT_STATE_FILE: &str = "cash-state.json";

/// Global options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Path of the JSON state file.
    pub state_path: PathBuf,
    /// Optional YAML configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliContext {
    /// Resolve issuance configuration: YAML file (if given) under `CASH_*`
    /// environment overrides, or environment over defaults.
    pub fn resolve_config(&self) -> Result<IssuanceConfig> {
        match &self.config_path {
            Some(path) => IssuanceConfig::from_yaml_file(path)
                .and_then(|config| config.with_overrides(|key| std::env::var(key).ok()))
                .with_context(|| format!("failed to load configuration from {}", path.display())),
            None => IssuanceConfig::from_env().context("failed to load configuration from environment"),
        }
    }
}

/// Parse a 20-byte account, with or without `0x`.
pub fn parse_account(s: &str) -> Result<AccountId, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Parse a 256-bit integer in decimal or `0x` hex.
pub fn parse_u256(s: &str) -> Result<U256, String> {
    s.trim().parse().map_err(|e| format!("{e}"))
}

/// Parse an amount in token units (`1`, `0.5`) into base units.
pub fn parse_amount(s: &str) -> Result<U256, String> {
    parse_units(s, DECIMALS).map_err(|e| format!("{e}"))
}

/// Like [`parse_amount`], but `max` means an unlimited allowance.
pub fn parse_allowance(s: &str) -> Result<U256, String> {
    if s.eq_ignore_ascii_case("max") {
        return Ok(U256::MAX);
    }
    parse_amount(s)
}

/// Parse eight comma-separated proof elements.
pub fn parse_proof(s: &str) -> Result<Proof, String> {
    s.parse().map_err(|e| format!("{e}"))
}
