//! Base-unit to display-amount formatting.

use alloy::primitives::U256;

use crate::error::CoreError;

pub const ETHER_DECIMALS: u8 = 18;

/// Fractional digits kept in display amounts.
const DISPLAY_FRACTION_DIGITS: usize = 4;

/// Integer parts at or above this use a compact suffix.
const COMPACT_THRESHOLD: u64 = 1_000_000;

/// Integer parts at or above this switch to scientific notation.
const SCIENTIFIC_THRESHOLD: u64 = 1_000_000_000_000_000;

const SUFFIXES: &[(u64, &str)] = &[
    (1_000_000_000_000, "T"),
    (1_000_000_000, "B"),
    (1_000_000, "M"),
];

/// Format a decimal base-unit string for display.
///
/// Never fails: input that is not a base-10 integer is returned unchanged.
#[must_use]
pub fn format_token_amount(raw: &str, decimals: u8) -> String {
    match raw.trim().parse::<U256>() {
        Ok(amount) => format_amount(amount, decimals),
        Err(_) => raw.to_owned(),
    }
}

/// Format a base-unit amount for display: at most four fractional digits
/// (truncated, trailing zeros trimmed), `<0.0001` for dust, and a short
/// form for very large quantities.
#[must_use]
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_owned();
    }
    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let integer = amount / divisor;
    let fraction = amount % divisor;

    if integer >= U256::from(SCIENTIFIC_THRESHOLD) {
        return scientific(&integer.to_string());
    }
    let integer = integer.as_limbs()[0];
    if integer >= COMPACT_THRESHOLD {
        return compact(integer);
    }

    let padded = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    let kept: String = padded.chars().take(DISPLAY_FRACTION_DIGITS).collect();
    let kept = kept.trim_end_matches('0');

    match (integer, kept.is_empty()) {
        (0, true) => "<0.0001".to_owned(),
        (_, true) => integer.to_string(),
        (_, false) => format!("{integer}.{kept}"),
    }
}

/// Format a wei amount as ether for display.
#[must_use]
pub fn format_ether(wei: U256) -> String {
    format_amount(wei, ETHER_DECIMALS)
}

/// Exact decimal ether string for a wei amount, e.g. `10.000000000000000001`.
#[must_use]
pub fn wei_to_ether_exact(wei: U256) -> String {
    let divisor = U256::from(10u64).pow(U256::from(ETHER_DECIMALS));
    let integer = wei / divisor;
    let fraction = wei % divisor;
    if fraction.is_zero() {
        return integer.to_string();
    }
    let padded = format!(
        "{:0>width$}",
        fraction.to_string(),
        width = ETHER_DECIMALS as usize
    );
    format!("{integer}.{}", padded.trim_end_matches('0'))
}

/// Parse a decimal ether amount (`"0.1"`, `"10"`) into exact wei.
pub fn parse_ether(raw: &str) -> Result<U256, CoreError> {
    let trimmed = raw.trim();
    let invalid = || CoreError::InvalidInput(format!("invalid ether amount `{trimmed}`"));

    let (integer, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty())
        || !digits_only(integer)
        || !digits_only(fraction)
        || fraction.len() > ETHER_DECIMALS as usize
    {
        return Err(invalid());
    }

    let scaled = format!(
        "{integer}{fraction:0<width$}",
        width = ETHER_DECIMALS as usize
    );
    U256::from_str_radix(&scaled, 10).map_err(|_| invalid())
}

fn compact(integer: u64) -> String {
    let (unit, suffix) = SUFFIXES
        .iter()
        .copied()
        .find(|(unit, _)| integer >= *unit)
        .unwrap_or((1, ""));
    let hundredths = integer / (unit / 100);
    let whole = hundredths / 100;
    let frac = format!("{:02}", hundredths % 100);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{whole}{suffix}")
    } else {
        format!("{whole}.{frac}{suffix}")
    }
}

fn scientific(digits: &str) -> String {
    let exponent = digits.len() - 1;
    let (lead, rest) = digits.split_at(1);
    let mantissa: String = rest.chars().take(2).collect();
    let mantissa = mantissa.trim_end_matches('0');
    if mantissa.is_empty() {
        format!("{lead}e{exponent}")
    } else {
        format!("{lead}.{mantissa}e{exponent}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(s: &str) -> String {
        format_token_amount(s, ETHER_DECIMALS)
    }

    #[test]
    fn formats_whole_and_fractional_ether() {
        assert_eq!(ether("100000000000000000"), "0.1");
        assert_eq!(ether("1000000000000000000"), "1");
        assert_eq!(ether("1500000000000000000"), "1.5");
        assert_eq!(ether("15000000000000000000"), "15");
        assert_eq!(ether("0"), "0");
    }

    #[test]
    fn truncates_to_four_fraction_digits() {
        assert_eq!(ether("123456789000000000"), "0.1234");
        assert_eq!(ether("1999999999999999999"), "1.9999");
    }

    #[test]
    fn dust_is_marked() {
        assert_eq!(ether("1"), "<0.0001");
        assert_eq!(ether("99999999999999"), "<0.0001");
    }

    #[test]
    fn respects_decimals() {
        assert_eq!(format_token_amount("2500000", 6), "2.5");
        assert_eq!(format_token_amount("42", 0), "42");
    }

    #[test]
    fn large_amounts_use_compact_form() {
        assert_eq!(format_token_amount("1500000", 0), "1.5M");
        assert_eq!(format_token_amount("2000000000", 0), "2B");
        assert_eq!(format_token_amount("1234000000000", 0), "1.23T");
        assert_eq!(format_amount(U256::MAX, ETHER_DECIMALS), "1.15e59");
    }

    #[test]
    fn non_numeric_input_is_returned_verbatim() {
        assert_eq!(ether("abc"), "abc");
        assert_eq!(ether("-5"), "-5");
    }

    #[test]
    fn exact_ether_keeps_every_wei() {
        let ten = U256::from(10_000_000_000_000_000_000u128);
        assert_eq!(wei_to_ether_exact(ten), "10");
        assert_eq!(
            wei_to_ether_exact(ten + U256::from(1)),
            "10.000000000000000001"
        );
        assert_eq!(wei_to_ether_exact(U256::from(100_000_000_000_000_000u64)), "0.1");
        assert_eq!(wei_to_ether_exact(U256::ZERO), "0");
    }

    #[test]
    fn parse_ether_is_exact() {
        assert_eq!(
            parse_ether("0.1").unwrap(),
            U256::from(100_000_000_000_000_000u64)
        );
        assert_eq!(
            parse_ether("10.000000000000000001").unwrap(),
            U256::from(10_000_000_000_000_000_001u128)
        );
        assert_eq!(parse_ether("2").unwrap(), U256::from(2_000_000_000_000_000_000u128));
        assert_eq!(parse_ether(".5").unwrap(), U256::from(500_000_000_000_000_000u64));
    }

    #[test]
    fn parse_ether_rejects_malformed_amounts() {
        for raw in ["", ".", "-1", "1e18", "abc", "0.0000000000000000001", "1.2.3"] {
            assert!(parse_ether(raw).is_err(), "{raw}");
        }
    }
}
