//! # Issuance Configuration
//!
//! Fixed parameters of a deployed ledger: the verifier binding (application
//! id, action label, group), the rate limit, the issuance amount, and the
//! token metadata. Read once at initialization; nothing here changes while
//! the gate is running.
//!
//! Sources, lowest to highest precedence: built-in defaults, a YAML file,
//! environment variables. Amounts in every source are token units
//! (`"1"`, `"0.5"`), converted to base units on load.
//!
//! | Key | Env | Default |
//! |---|---|---|
//! | `app_id` | `CASH_APP_ID` | `app_cash` |
//! | `action` | `CASH_ACTION` | `claim` |
//! | `group_id` | `CASH_GROUP_ID` | `1` |
//! | `wait_period_secs` | `CASH_WAIT_PERIOD_SECS` | `86400` |
//! | `claim_amount` | `CASH_CLAIM_AMOUNT` | `1` |
//! | `name` | `CASH_TOKEN_NAME` | `CASH` |
//! | `symbol` | `CASH_TOKEN_SYMBOL` | `Cash` |

use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cash_core::{one_token, parse_units, DECIMALS};

use crate::ledger::TokenMetadata;

/// Default application identifier.
pub const DEFAULT_APP_ID: &str = "app_cash";
/// Action label the external nullifier is derived from.
pub const DEFAULT_ACTION: &str = "claim";
/// Minimum seconds between two claims by one claimant.
pub const DEFAULT_WAIT_PERIOD_SECS: u64 = 86_400;
/// Default token name.
pub const DEFAULT_TOKEN_NAME: &str = "CASH";
/// Default token symbol.
pub const DEFAULT_TOKEN_SYMBOL: &str = "Cash";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A supplied value could not be parsed.
    #[error("invalid value for {key}: \"{value}\" ({reason})")]
    InvalidValue {
        /// Config key or environment variable.
        key: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A parsed configuration violates a constraint.
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// The violated constraint.
        reason: &'static str,
    },

    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for this schema.
    #[error("config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Issuance parameters, fixed for the lifetime of a gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceConfig {
    /// Application identifier registered with the identity provider.
    pub app_id: String,
    /// Action label proofs are generated for.
    pub action: String,
    /// Identity group accepted by the verifier.
    pub group_id: U256,
    /// Minimum seconds between two claims by the same claimant.
    pub wait_period_secs: u64,
    /// Base units issued per successful claim.
    pub claim_amount: U256,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            action: DEFAULT_ACTION.to_string(),
            group_id: U256::from(1u64),
            wait_period_secs: DEFAULT_WAIT_PERIOD_SECS,
            claim_amount: one_token(),
            name: DEFAULT_TOKEN_NAME.to_string(),
            symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
        }
    }
}

/// A scalar that YAML may give as a bare integer or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(u64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// On-disk shape: every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    app_id: Option<String>,
    action: Option<String>,
    group_id: Option<Scalar>,
    wait_period_secs: Option<u64>,
    claim_amount: Option<Scalar>,
    name: Option<String>,
    symbol: Option<String>,
}

impl IssuanceConfig {
    /// Load from the process environment over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparseable value
    /// or the result fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load a YAML file over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, and
    /// [`ConfigError::Yaml`] or a value error if it does not parse.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Parse YAML text over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed YAML, unknown keys, unparseable
    /// values, or a failed [`validate`](Self::validate).
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = if text.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        let mut config = Self::default();
        if let Some(v) = raw.app_id {
            config.app_id = v;
        }
        if let Some(v) = raw.action {
            config.action = v;
        }
        if let Some(v) = raw.group_id {
            config.group_id = parse_group("group_id", &v.into_text())?;
        }
        if let Some(v) = raw.wait_period_secs {
            config.wait_period_secs = v;
        }
        if let Some(v) = raw.claim_amount {
            config.claim_amount = parse_amount("claim_amount", &v.into_text())?;
        }
        if let Some(v) = raw.name {
            config.name = v;
        }
        if let Some(v) = raw.symbol {
            config.symbol = v;
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply `CASH_*` overrides from `lookup` on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on an unparseable value or a failed
    /// [`validate`](Self::validate).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("CASH_APP_ID") {
            self.app_id = v;
        }
        if let Some(v) = lookup("CASH_ACTION") {
            self.action = v;
        }
        if let Some(v) = lookup("CASH_GROUP_ID") {
            self.group_id = parse_group("CASH_GROUP_ID", &v)?;
        }
        if let Some(v) = lookup("CASH_WAIT_PERIOD_SECS") {
            self.wait_period_secs =
                v.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: "CASH_WAIT_PERIOD_SECS".to_string(),
                        value: v.clone(),
                        reason: e.to_string(),
                    })?;
        }
        if let Some(v) = lookup("CASH_CLAIM_AMOUNT") {
            self.claim_amount = parse_amount("CASH_CLAIM_AMOUNT", &v)?;
        }
        if let Some(v) = lookup("CASH_TOKEN_NAME") {
            self.name = v;
        }
        if let Some(v) = lookup("CASH_TOKEN_SYMBOL") {
            self.symbol = v;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check structural constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "app_id",
                reason: "must be non-empty",
            });
        }
        if self.action.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "action",
                reason: "must be non-empty",
            });
        }
        if self.wait_period_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "wait_period_secs",
                reason: "must be positive",
            });
        }
        if i64::try_from(self.wait_period_secs).is_err() {
            return Err(ConfigError::Invalid {
                field: "wait_period_secs",
                reason: "must fit in a signed 64-bit second count",
            });
        }
        if self.claim_amount.is_zero() {
            return Err(ConfigError::Invalid {
                field: "claim_amount",
                reason: "must be positive",
            });
        }
        if self.name.is_empty() || self.symbol.is_empty() {
            return Err(ConfigError::Invalid {
                field: "name/symbol",
                reason: "must be non-empty",
            });
        }
        Ok(())
    }

    /// Token metadata derived from this configuration.
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: DECIMALS,
        }
    }
}

fn parse_group(key: &str, value: &str) -> Result<U256, ConfigError> {
    U256::from_str(value.trim()).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_amount(key: &str, value: &str) -> Result<U256, ConfigError> {
    parse_units(value, DECIMALS).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_deployment_constants() {
        let config = IssuanceConfig::default();
        assert_eq!(config.action, "claim");
        assert_eq!(config.wait_period_secs, 86_400);
        assert_eq!(config.claim_amount, one_token());
        assert_eq!(config.group_id, U256::from(1u64));
        assert_eq!(config.metadata().name, "CASH");
        assert_eq!(config.metadata().symbol, "Cash");
        assert_eq!(config.metadata().decimals, 18);
        config.validate().unwrap();
    }

    #[test]
    fn overrides_apply() {
        let config = IssuanceConfig::default()
            .with_overrides(lookup(&[
                ("CASH_APP_ID", "app_staging_42"),
                ("CASH_WAIT_PERIOD_SECS", "3600"),
                ("CASH_CLAIM_AMOUNT", "0.5"),
                ("CASH_GROUP_ID", "0x2"),
            ]))
            .unwrap();
        assert_eq!(config.app_id, "app_staging_42");
        assert_eq!(config.wait_period_secs, 3600);
        assert_eq!(config.claim_amount, one_token() / U256::from(2u64));
        assert_eq!(config.group_id, U256::from(2u64));
    }

    #[test]
    fn unparseable_override_names_the_variable() {
        let err = IssuanceConfig::default()
            .with_overrides(lookup(&[("CASH_WAIT_PERIOD_SECS", "a day")]))
            .unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("CASH_WAIT_PERIOD_SECS"));
        assert!(msg.contains("a day"));
    }

    #[test]
    fn zero_wait_period_is_invalid() {
        let err = IssuanceConfig::default()
            .with_overrides(lookup(&[("CASH_WAIT_PERIOD_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "wait_period_secs",
                ..
            }
        ));
    }

    #[test]
    fn zero_claim_amount_is_invalid() {
        let err = IssuanceConfig::default()
            .with_overrides(lookup(&[("CASH_CLAIM_AMOUNT", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "claim_amount", .. }));
    }

    #[test]
    fn yaml_accepts_integers_and_strings() {
        let config = IssuanceConfig::from_yaml_str(
            "app_id: app_prod_cash\nclaim_amount: 2\ngroup_id: \"0x1\"\nwait_period_secs: 60\n",
        )
        .unwrap();
        assert_eq!(config.app_id, "app_prod_cash");
        assert_eq!(config.claim_amount, one_token() * U256::from(2u64));
        assert_eq!(config.wait_period_secs, 60);
        assert_eq!(config.action, "claim");
    }

    #[test]
    fn empty_yaml_is_defaults() {
        assert_eq!(
            IssuanceConfig::from_yaml_str("").unwrap(),
            IssuanceConfig::default()
        );
    }

    #[test]
    fn yaml_rejects_unknown_keys() {
        let err = IssuanceConfig::from_yaml_str("cooldown: 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn yaml_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "action: vote\nsymbol: CSH").unwrap();
        let config = IssuanceConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.action, "vote");
        assert_eq!(config.symbol, "CSH");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = IssuanceConfig::from_yaml_file(Path::new("/nonexistent/cash.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
