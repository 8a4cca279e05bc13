//! 18-decimal fixed-point amount helpers

use primitive_types::{U256, U512};

use crate::constants::DECIMALS;
use crate::error::{LedgerError, Result};

/// One whole token in base units (10^18)
pub fn unit() -> U256 {
    U256::exp10(DECIMALS)
}

/// `n` whole tokens in base units
pub fn tokens(n: u64) -> U256 {
    U256::from(n) * unit()
}

/// `a * b / c` with a 512-bit intermediate product, floored.
///
/// Returns `None` when `c` is zero or the quotient does not fit in 256 bits.
pub fn mul_div(a: U256, b: U256, c: U256) -> Option<U256> {
    if c.is_zero() {
        return None;
    }
    let quotient = a.full_mul(b) / U512::from(c);
    U256::try_from(quotient).ok()
}

/// Parse a decimal token amount ("12.5") into base units.
pub fn parse_units(value: &str) -> Result<U256> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LedgerError::InvalidInput("empty amount".to_string()));
    }

    let (whole, fraction) = match value.split_once('.') {
        Some((w, f)) => (w, f),
        None => (value, ""),
    };

    if fraction.len() > DECIMALS {
        return Err(LedgerError::InvalidInput(format!(
            "too many decimal places in {}",
            value
        )));
    }
    let digits_ok = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits_ok(whole) || !digits_ok(fraction) || (whole.is_empty() && fraction.is_empty()) {
        return Err(LedgerError::InvalidInput(format!("not a number: {}", value)));
    }

    let padded = format!("{}{:0<width$}", whole, fraction, width = DECIMALS);
    let digits = padded.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits).map_err(|_| LedgerError::Overflow)
}

/// Format base units as a decimal token amount, trimming trailing zeros.
pub fn format_units(amount: U256) -> String {
    let whole = amount / unit();
    let fraction = amount % unit();
    if fraction.is_zero() {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", fraction.to_string(), width = DECIMALS);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}
