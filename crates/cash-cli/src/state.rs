//! # State File
//!
//! JSON persistence for the CLI. A state file is the ledger snapshot plus
//! the spent-nullifier set of the development verifier, so that replayed
//! nullifiers stay rejected across invocations.
//!
//! Writes go to a sibling temporary file that is renamed over the target,
//! so an interrupted write never leaves a truncated state file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cash_core::{Clock, U256};
use cash_ledger::{ClaimGate, IssuanceConfig, LedgerSnapshot};
use cash_zkp::MockVerifier;

/// On-disk CLI state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    /// Ledger, registry, and configuration.
    pub ledger: LedgerSnapshot,
    /// Nullifiers the development verifier has accepted.
    #[serde(default)]
    pub spent_nullifiers: Vec<U256>,
}

impl StateFile {
    /// Fresh state for `config`: empty ledger, no claims, no spent nullifiers.
    pub fn new(config: IssuanceConfig) -> Result<Self> {
        let verifier = MockVerifier::new(config.group_id);
        let gate = ClaimGate::initialize(config, verifier).context("invalid issuance configuration")?;
        Ok(Self::capture(&gate))
    }

    /// Capture a running gate.
    pub fn capture<C: Clock>(gate: &ClaimGate<MockVerifier, C>) -> Self {
        Self {
            ledger: gate.snapshot(),
            spent_nullifiers: gate.verifier().spent_nullifiers(),
        }
    }

    /// Rebuild the gate with the development verifier and `clock`.
    pub fn into_gate<C: Clock>(self, clock: C) -> Result<ClaimGate<MockVerifier, C>> {
        let verifier =
            MockVerifier::new(self.ledger.config.group_id).with_spent(self.spent_nullifiers);
        ClaimGate::restore(self.ledger, verifier, clock).context("state file failed validation")
    }

    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "failed to read state file {} (run `cash init` first)",
                path.display()
            )
        })?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse state file {}", path.display()))
    }

    /// Write to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("failed to serialize state")?;
        let tmp = temp_path(path);
        std::fs::write(&tmp, content)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace state file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "state saved");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
