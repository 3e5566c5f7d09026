//! # Token Units
//!
//! Conversion between human-readable token amounts (`"0.5"`) and ledger
//! base units (`500000000000000000`). The ledger itself only ever stores
//! base units; these helpers exist for configuration and the CLI.

use alloy_primitives::U256;

use crate::error::ValidationError;

/// Decimal places of the CASH token.
pub const DECIMALS: u8 = 18;

/// One whole token in base units (`10^18`).
pub fn one_token() -> U256 {
    U256::from(1_000_000_000_000_000_000u128)
}

/// `10^decimals`, or `None` if it does not fit in 256 bits.
fn scale(decimals: u8) -> Option<U256> {
    let ten = U256::from(10u64);
    (0..decimals).try_fold(U256::from(1u64), |acc, _| acc.checked_mul(ten))
}

fn invalid(value: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidAmount {
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Parse a decimal token amount into base units.
///
/// Accepts `"2"`, `"0.5"`, `"1.000000000000000001"`. Rejects signs,
/// exponents, empty parts, and more fractional digits than `decimals`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAmount`] describing the first problem.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, ValidationError> {
    let s = value.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() {
        return Err(invalid(value, "expected digits before the decimal point"));
    }
    if s.contains('.') && frac.is_empty() {
        return Err(invalid(value, "expected digits after the decimal point"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(value, "only decimal digits and one '.' are allowed"));
    }
    if frac.len() > usize::from(decimals) {
        return Err(invalid(
            value,
            format!("at most {decimals} fractional digits are allowed"),
        ));
    }

    let unit = scale(decimals).ok_or_else(|| invalid(value, "decimals too large"))?;
    let whole_units = U256::from_str_radix(whole, 10)
        .map_err(|e| invalid(value, format!("whole part: {e}")))?;

    let frac_units = if frac.is_empty() {
        U256::ZERO
    } else {
        // Width checked above, so the cast cannot truncate.
        let pad = scale(decimals - frac.len() as u8)
            .ok_or_else(|| invalid(value, "decimals too large"))?;
        U256::from_str_radix(frac, 10)
            .map_err(|e| invalid(value, format!("fractional part: {e}")))?
            .checked_mul(pad)
            .ok_or_else(|| invalid(value, "amount exceeds 256 bits"))?
    };

    whole_units
        .checked_mul(unit)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(|| invalid(value, "amount exceeds 256 bits"))
}

/// Format base units as a decimal token amount with trailing zeros trimmed.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let Some(unit) = scale(decimals) else {
        return amount.to_string();
    };
    if decimals == 0 {
        return amount.to_string();
    }
    let whole = amount / unit;
    let frac = amount % unit;
    if frac.is_zero() {
        return whole.to_string();
    }
    let padded = format!("{:0>width$}", frac.to_string(), width = usize::from(decimals));
    format!("{whole}.{}", padded.trim_end_matches('0'))
}
