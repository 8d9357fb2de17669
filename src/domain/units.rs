//! Value units for the ledger.
//!
//! All balances and stakes are integers in the smallest unit (wei).
//! `1 ether == 10^18 wei`. Decimal ether strings are only accepted at the
//! edges (configuration, tests) and converted exactly, never through floats.

use thiserror::Error;

/// Number of decimal places in one ether.
pub const ETHER_DECIMALS: u32 = 18;

/// Wei in one ether (`10^18`).
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Minimum stake for a single entry: 0.01 ether.
pub const MIN_STAKE_WEI: u128 = WEI_PER_ETHER / 100;

/// Failure to parse a decimal ether amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitParseError {
    /// The input was empty or contained something other than digits and one dot.
    #[error("malformed ether amount: {0:?}")]
    Malformed(String),

    /// More than 18 fractional digits.
    #[error("ether amount {0:?} has more than 18 decimal places")]
    TooPrecise(String),

    /// The value does not fit in a `u128` of wei.
    #[error("ether amount {0:?} overflows")]
    Overflow(String),
}

/// Parses a decimal ether string (e.g. `"0.02"`, `"2"`) into wei.
///
/// # Errors
///
/// Returns [`UnitParseError`] when the string is not a plain non-negative
/// decimal, has more than 18 fractional digits, or overflows `u128`.
pub fn parse_ether(input: &str) -> Result<u128, UnitParseError> {
    let trimmed = input.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(UnitParseError::Malformed(input.to_string()));
    }
    if frac.len() > ETHER_DECIMALS as usize {
        return Err(UnitParseError::TooPrecise(input.to_string()));
    }

    let overflow = || UnitParseError::Overflow(input.to_string());

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(WEI_PER_ETHER)
            .ok_or_else(overflow)?
    };

    let frac_wei = if frac.is_empty() {
        0
    } else {
        let scale = 10u128.pow(ETHER_DECIMALS - frac.len() as u32);
        frac.parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(scale)
            .ok_or_else(overflow)?
    };

    whole_wei.checked_add(frac_wei).ok_or_else(overflow)
}

/// Formats wei as a decimal ether string without trailing zeros.
#[must_use]
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:018}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn min_stake_is_one_hundredth_of_an_ether() {
        assert_eq!(MIN_STAKE_WEI, 10_000_000_000_000_000);
        assert_eq!(parse_ether("0.01"), Ok(MIN_STAKE_WEI));
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_ether("2"), Ok(2 * WEI_PER_ETHER));
        assert_eq!(parse_ether("0.02"), Ok(20_000_000_000_000_000));
        assert_eq!(parse_ether(".5"), Ok(WEI_PER_ETHER / 2));
        assert_eq!(parse_ether("1.8"), Ok(1_800_000_000_000_000_000));
        assert_eq!(parse_ether("0.000000000000000001"), Ok(1));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", ".", "abc", "1.2.3", "-1", "1e18", " . "] {
            let Err(err) = parse_ether(bad) else {
                panic!("{bad:?} should not parse");
            };
            assert!(matches!(err, UnitParseError::Malformed(_)), "{bad:?}: {err}");
        }
    }

    #[test]
    fn rejects_sub_wei_precision() {
        let result = parse_ether("0.0000000000000000001");
        assert!(matches!(result, Err(UnitParseError::TooPrecise(_))));
    }

    #[test]
    fn rejects_overflow() {
        let huge = "999999999999999999999999999999999999999";
        assert!(matches!(parse_ether(huge), Err(UnitParseError::Overflow(_))));
    }

    #[test]
    fn formats_without_trailing_zeros() {
        assert_eq!(format_ether(0), "0");
        assert_eq!(format_ether(2 * WEI_PER_ETHER), "2");
        assert_eq!(format_ether(MIN_STAKE_WEI), "0.01");
        assert_eq!(format_ether(1), "0.000000000000000001");
    }
}
