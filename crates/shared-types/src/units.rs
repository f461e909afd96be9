//! Decimal <-> base-unit conversion.
//!
//! Amounts are typed by operators as decimal strings ("4000", "0.25") and
//! sent on chain as integers scaled by the asset's decimals.

use crate::errors::UnitsError;
use primitive_types::U256;

/// Decimals of a gwei amount expressed in wei.
pub const GWEI_DECIMALS: u8 = 9;

/// Parse a plain decimal string into base units.
///
/// Accepts `digits`, `digits.digits`, `.digits` and `digits.`. Signs,
/// exponents and separators are rejected. Fails when the string has more
/// fractional digits than `decimals`.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, UnitsError> {
    let text = text.trim();
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(UnitsError::NotANumber(text.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            max: decimals,
            found: frac.len(),
        });
    }

    let scale = U256::exp10(decimals as usize);
    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).map_err(|_| UnitsError::Overflow)?
    };

    let mut frac_padded = frac.to_string();
    frac_padded.extend(std::iter::repeat('0').take(decimals as usize - frac.len()));
    let frac = if frac_padded.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&frac_padded).map_err(|_| UnitsError::Overflow)?
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac))
        .ok_or(UnitsError::Overflow)
}

/// Format base units back into a decimal string without trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let scale = U256::exp10(decimals as usize);
    let whole = value / scale;
    let frac = value % scale;

    if frac.is_zero() {
        return whole.to_string();
    }

    let frac = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
