// 💰 Monetary Formatter - pt-BR display of cent amounts
// "123456" (cents) -> "1.234,56"

use crate::mask::unformat;

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Format a count of cents with two decimals and pt-BR separators.
///
/// Non-digits are ignored; an input without digits formats to `""`. The
/// arithmetic is done on the digit string, so any length is exact.
pub fn format_cents(raw: &str) -> String {
    let digits = unformat(raw);
    if digits.is_empty() {
        return String::new();
    }

    let significant = digits.trim_start_matches('0');
    let padded = format!("{:0>3}", significant);
    let (integer, fraction) = padded.split_at(padded.len() - 2);

    let mut out = group_thousands(integer);
    out.push(DECIMAL_SEPARATOR);
    out.push_str(fraction);
    out
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(c);
    }

    out
}

/// Parse a pt-BR number ("1.234,56") into a finite `f64`.
///
/// Every `.` is dropped and the first `,` becomes the decimal point. The
/// whole string must be numeric: trailing text such as `"12abc"` is rejected
/// rather than read as its numeric prefix.
pub fn parse_amount(text: &str) -> Option<f64> {
    let normalized = text
        .trim()
        .replace(THOUSANDS_SEPARATOR, "")
        .replacen(DECIMAL_SEPARATOR, ".", 1);

    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Raw cents to the decimal amount, when the value fits an `f64`.
pub fn cents_to_amount(raw: &str) -> Option<f64> {
    let digits = unformat(raw);
    if digits.is_empty() {
        return None;
    }
    digits
        .parse::<f64>()
        .ok()
        .map(|cents| cents / 100.0)
        .filter(|value| value.is_finite())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents_examples() {
        assert_eq!(format_cents(""), "");
        assert_eq!(format_cents("0"), "0,00");
        assert_eq!(format_cents("5"), "0,05");
        assert_eq!(format_cents("50"), "0,50");
        assert_eq!(format_cents("100"), "1,00");
        assert_eq!(format_cents("100000"), "1.000,00");
        assert_eq!(format_cents("123456789"), "1.234.567,89");
    }

    #[test]
    fn test_format_cents_leading_zeros() {
        assert_eq!(format_cents("000"), "0,00");
        assert_eq!(format_cents("0007"), "0,07");
        assert_eq!(format_cents("0100000"), "1.000,00");
    }

    #[test]
    fn test_format_cents_strips_non_digits() {
        assert_eq!(format_cents("R$ 1.000,00"), "1.000,00");
        assert_eq!(format_cents("abc"), "");
    }

    #[test]
    fn test_format_cents_huge_values_are_exact() {
        assert_eq!(
            format_cents("123456789012345678901234"),
            "1.234.567.890.123.456.789.012,34"
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("100000"), Some(100000.0));
        assert_eq!(parse_amount("0,5"), Some(0.5));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1,2,3"), None);
    }

    #[test]
    fn test_parse_amount_rejects_trailing_text() {
        assert_eq!(parse_amount("12abc"), None);
        assert_eq!(parse_amount("1.500,00 reais"), None);
    }

    #[test]
    fn test_cents_to_amount() {
        assert_eq!(cents_to_amount("150000"), Some(1500.0));
        assert_eq!(cents_to_amount(""), None);
    }
}
