//! Keystroke guard for numeric cells.

use once_cell::sync::Lazy;
use regex::Regex;

/// Digits, an optional decimal point, at most two decimals.
static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d*\.?\d{0,2}$").expect("number pattern is valid"));

/// Outcome of coercing the raw text of a numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coercion {
    /// The cell was emptied.
    Cleared,
    /// The text is an accepted number.
    Value(f64),
    /// The text is not acceptable; the previous value stands.
    Rejected,
}

/// Coerce raw numeric-cell text into a value.
///
/// Sign and range are left to the caller. Text that passes the pattern but
/// carries no digits (a lone `"."`) reads as cleared.
pub fn coerce_number(raw: &str) -> Coercion {
    if raw.is_empty() {
        return Coercion::Cleared;
    }
    if !NUMBER_PATTERN.is_match(raw) {
        return Coercion::Rejected;
    }
    if !raw.bytes().any(|b| b.is_ascii_digit()) {
        return Coercion::Cleared;
    }
    raw.parse::<f64>()
        .map(Coercion::Value)
        .unwrap_or(Coercion::Rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_clears() {
        assert_eq!(coerce_number(""), Coercion::Cleared);
    }

    #[test]
    fn test_integer() {
        assert_eq!(coerce_number("12"), Coercion::Value(12.0));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(coerce_number("12.3"), Coercion::Value(12.3));
        assert_eq!(coerce_number("12.34"), Coercion::Value(12.34));
        assert_eq!(coerce_number(".5"), Coercion::Value(0.5));
    }

    #[test]
    fn test_trailing_point_accepted() {
        assert_eq!(coerce_number("12."), Coercion::Value(12.0));
    }

    #[test]
    fn test_lone_point_clears() {
        assert_eq!(coerce_number("."), Coercion::Cleared);
    }

    #[test]
    fn test_three_decimals_rejected() {
        assert_eq!(coerce_number("12.345"), Coercion::Rejected);
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert_eq!(coerce_number("abc"), Coercion::Rejected);
        assert_eq!(coerce_number("1a"), Coercion::Rejected);
        assert_eq!(coerce_number("-3"), Coercion::Rejected);
        assert_eq!(coerce_number("1.2.3"), Coercion::Rejected);
        assert_eq!(coerce_number(" 1"), Coercion::Rejected);
    }
}
