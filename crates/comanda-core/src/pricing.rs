//! # Pricing Parser
//!
//! Menu price cells are display strings ("$1,250.00", "$85", "--"). This
//! module turns them into numbers and back.
//!
//! ## Parsing Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "$1,250.50 MXN"                                                        │
//! │       │  keep only digits and '.'                                       │
//! │       ▼                                                                 │
//! │  "1250.50"                                                              │
//! │       │  longest valid decimal prefix (a second '.' ends it)            │
//! │       ▼                                                                 │
//! │  1250.5                                                                 │
//! │                                                                         │
//! │  "" / "--" / "abc" / "."  ──►  0                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing never fails. A bad cell logs a warning and prices at zero.

use tracing::warn;

use crate::money::Money;

/// Placeholder shown for a price column the product is not sold in.
pub const NO_PRICE: &str = "--";

/// Extracts a numeric price from a display string.
///
/// ## Example
/// ```rust
/// use comanda_core::pricing::extract_price;
///
/// assert_eq!(extract_price("$1,250.50"), 1250.5);
/// assert_eq!(extract_price("--"), 0.0);
/// ```
pub fn extract_price(text: &str) -> f64 {
    if text.is_empty() {
        warn!(price_text = text, "Empty price text");
        return 0.0;
    }

    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match leading_decimal(&numeric) {
        Some(value) => value,
        None => {
            warn!(price_text = text, "Unparseable price text");
            0.0
        }
    }
}

/// Formats money as a price cell (`$155.50`).
pub fn format_price(amount: Money) -> String {
    amount.to_string()
}

/// Re-formats a raw price cell for display.
///
/// `""` and `"--"` stay `"--"`. A leading `$` and thousands separators are
/// ignored. Text that does not start with a number is returned unchanged.
///
/// ## Example
/// ```rust
/// use comanda_core::pricing::format_price_text;
///
/// assert_eq!(format_price_text("85"), "$85.00");
/// assert_eq!(format_price_text("$ 120.5"), "$120.50");
/// assert_eq!(format_price_text("$1,450.00"), "$1450.00");
/// assert_eq!(format_price_text("Consultar"), "Consultar");
/// ```
pub fn format_price_text(text: &str) -> String {
    if text.is_empty() || text == NO_PRICE {
        return NO_PRICE.to_string();
    }

    let stripped = text.replacen('$', "", 1).replace(',', "");
    let stripped = stripped.trim();

    let (negative, digits) = match stripped.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, stripped.strip_prefix('+').unwrap_or(stripped)),
    };

    match leading_decimal(digits) {
        Some(value) => {
            let value = if negative { -value } else { value };
            format!("${:.2}", value)
        }
        None => text.to_string(),
    }
}

/// Parses the longest `digits[.digits]` prefix. `None` when the prefix holds
/// no digit at all.
fn leading_decimal(input: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (idx, c) in input.char_indices() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }

    input[..end].trim_end_matches('.').parse::<f64>().ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("$100.00", 100.0)]
    #[case("$55.50", 55.5)]
    #[case("$1,250.50", 1250.5)]
    #[case("MXN 85", 85.0)]
    #[case(".5", 0.5)]
    #[case("1.2.3", 1.2)]
    #[case("12.", 12.0)]
    fn test_extract_price(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(extract_price(text), expected);
    }

    #[rstest]
    #[case("")]
    #[case("--")]
    #[case("abc")]
    #[case(".")]
    fn test_extract_price_defaults_to_zero(#[case] text: &str) {
        assert_eq!(extract_price(text), 0.0);
    }

    #[rstest]
    #[case("", "--")]
    #[case("--", "--")]
    #[case("85", "$85.00")]
    #[case("$120.5", "$120.50")]
    #[case("-3", "$-3.00")]
    #[case("$1,450.00", "$1450.00")]
    #[case("N/D", "N/D")]
    fn test_format_price_text(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(format_price_text(text), expected);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Money::from_cents(15550)), "$155.50");
        assert_eq!(format_price(Money::zero()), "$0.00");
    }

    proptest! {
        #[test]
        fn prop_format_then_extract_round_trips(cents in 0i64..100_000_000) {
            let amount = Money::from_cents(cents);
            let parsed = extract_price(&format_price(amount));
            prop_assert_eq!(Money::from_decimal(parsed), amount);
        }
    }
}
