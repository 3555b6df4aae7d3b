// 🎭 Mask Engine - display punctuation for digit-only fields
// Display strings are always derived from the raw digits, never stored

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// MASK KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskKind {
    /// CPF while the value has up to 11 digits, CNPJ past that
    Identifier,
    /// Area code plus mobile or landline number
    Phone,
    /// CEP
    PostalCode,
}

impl MaskKind {
    pub const ALL: [MaskKind; 3] = [MaskKind::Identifier, MaskKind::Phone, MaskKind::PostalCode];

    /// Maximum number of raw digits this kind accepts
    pub fn max_digits(&self) -> usize {
        match self {
            MaskKind::Identifier => 14,
            MaskKind::Phone => 11,
            MaskKind::PostalCode => 8,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MaskKind::Identifier => "identifier",
            MaskKind::Phone => "phone",
            MaskKind::PostalCode => "postal-code",
        }
    }

    /// Group layout for a value with `digit_count` digits.
    ///
    /// Only the identifier mask depends on the count: it switches from the
    /// individual to the corporate layout once the 12th digit arrives.
    fn layout(&self, digit_count: usize) -> &'static [Group] {
        match self {
            MaskKind::Identifier if digit_count <= INDIVIDUAL_DIGITS => INDIVIDUAL_LAYOUT,
            MaskKind::Identifier => CORPORATE_LAYOUT,
            MaskKind::Phone => PHONE_LAYOUT,
            MaskKind::PostalCode => POSTAL_CODE_LAYOUT,
        }
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "identifier" | "cpf" | "cnpj" | "cpf-cnpj" => Ok(MaskKind::Identifier),
            "phone" | "telefone" => Ok(MaskKind::Phone),
            "postal-code" | "postal_code" | "cep" => Ok(MaskKind::PostalCode),
            other => Err(format!(
                "Unknown mask kind '{}' (expected identifier, phone or postal-code)",
                other
            )),
        }
    }
}

// ============================================================================
// LAYOUTS
// ============================================================================

const INDIVIDUAL_DIGITS: usize = 11;

/// A run of digits with the decoration that surrounds it.
///
/// `open` and `close` are only emitted once digits exist past the end of the
/// group, so a partially typed value never ends in punctuation.
#[derive(Debug)]
struct Group {
    width: usize,
    open: &'static str,
    close: &'static str,
}

const fn group(width: usize, open: &'static str, close: &'static str) -> Group {
    Group { width, open, close }
}

// XXX.XXX.XXX-XX
const INDIVIDUAL_LAYOUT: &[Group] = &[
    group(3, "", "."),
    group(3, "", "."),
    group(3, "", "-"),
    group(2, "", ""),
];

// XX.XXX.XXX/XXXX-XX
const CORPORATE_LAYOUT: &[Group] = &[
    group(2, "", "."),
    group(3, "", "."),
    group(3, "", "/"),
    group(4, "", "-"),
    group(2, "", ""),
];

// (XX) XXXXX-XXXX
const PHONE_LAYOUT: &[Group] = &[group(2, "(", ") "), group(5, "", "-"), group(4, "", "")];

// XXXXX-XXX
const POSTAL_CODE_LAYOUT: &[Group] = &[group(5, "", "-"), group(3, "", "")];

// ============================================================================
// FORMAT / UNFORMAT
// ============================================================================

/// Strip everything but ASCII digits, keeping their order.
pub fn unformat(displayed: &str) -> String {
    displayed.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Characters a mask may insert around digits
const DECORATION: &[char] = &['.', '-', '/', '(', ')', ' '];

/// Remove mask decoration only. Any other non-digit survives, so a stored
/// value can still be rejected for containing it.
pub fn strip_decoration(displayed: &str) -> String {
    displayed.chars().filter(|c| !DECORATION.contains(c)).collect()
}

/// Number of digits in a raw or masked value, or `None` when it holds
/// anything besides digits and mask decoration.
pub fn digit_count(value: &str) -> Option<usize> {
    let mut count = 0;
    for c in value.chars() {
        if c.is_ascii_digit() {
            count += 1;
        } else if !DECORATION.contains(&c) {
            return None;
        }
    }
    Some(count)
}

/// Render raw digits with the punctuation of `kind`.
///
/// Non-digit characters in `raw` are ignored and digits past
/// [`MaskKind::max_digits`] are discarded.
pub fn format(raw: &str, kind: MaskKind) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(kind.max_digits())
        .collect();

    let mut out = String::with_capacity(digits.len() + 4);
    let mut rest: &[char] = &digits;

    for group in kind.layout(digits.len()) {
        if rest.is_empty() {
            break;
        }

        if rest.len() > group.width {
            out.push_str(group.open);
            out.extend(&rest[..group.width]);
            out.push_str(group.close);
            rest = &rest[group.width..];
        } else {
            out.extend(rest);
            break;
        }
    }

    out
}

/// Normalise arbitrary keystroke text into the raw value stored for `kind`.
pub fn to_raw(input: &str, kind: MaskKind) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(kind.max_digits())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn punctuation(s: &str) -> usize {
        s.chars().filter(|c| !c.is_ascii_digit()).count()
    }

    #[test]
    fn test_empty_input() {
        for kind in MaskKind::ALL {
            assert_eq!(format("", kind), "");
        }
        assert_eq!(unformat(""), "");
    }

    #[test]
    fn test_individual_identifier_progression() {
        assert_eq!(format("1", MaskKind::Identifier), "1");
        assert_eq!(format("123", MaskKind::Identifier), "123");
        assert_eq!(format("1234", MaskKind::Identifier), "123.4");
        assert_eq!(format("1234567", MaskKind::Identifier), "123.456.7");
        assert_eq!(format("123456789", MaskKind::Identifier), "123.456.789");
        assert_eq!(format("1234567890", MaskKind::Identifier), "123.456.789-0");
        assert_eq!(format("11144477735", MaskKind::Identifier), "111.444.777-35");
    }

    #[test]
    fn test_corporate_identifier() {
        assert_eq!(format("112223330001", MaskKind::Identifier), "11.222.333/0001");
        assert_eq!(format("1122233300018", MaskKind::Identifier), "11.222.333/0001-8");
        assert_eq!(
            format("11222333000181", MaskKind::Identifier),
            "11.222.333/0001-81"
        );
    }

    #[test]
    fn test_identifier_truncates_past_fourteen_digits() {
        assert_eq!(
            format("112223330001819999", MaskKind::Identifier),
            "11.222.333/0001-81"
        );
    }

    #[test]
    fn test_phone() {
        assert_eq!(format("1", MaskKind::Phone), "1");
        assert_eq!(format("11", MaskKind::Phone), "11");
        assert_eq!(format("119", MaskKind::Phone), "(11) 9");
        assert_eq!(format("1198765", MaskKind::Phone), "(11) 98765");
        assert_eq!(format("11987654", MaskKind::Phone), "(11) 98765-4");
        assert_eq!(format("11987654321", MaskKind::Phone), "(11) 98765-4321");
        assert_eq!(format("119876543210", MaskKind::Phone), "(11) 98765-4321");
    }

    #[test]
    fn test_postal_code() {
        assert_eq!(format("01310", MaskKind::PostalCode), "01310");
        assert_eq!(format("013101", MaskKind::PostalCode), "01310-1");
        assert_eq!(format("01310100", MaskKind::PostalCode), "01310-100");
        assert_eq!(format("0131010099", MaskKind::PostalCode), "01310-100");
    }

    #[test]
    fn test_format_ignores_non_digits() {
        assert_eq!(format("111.444.777-35", MaskKind::Identifier), "111.444.777-35");
        assert_eq!(format("abc", MaskKind::Phone), "");
    }

    #[test]
    fn test_unformat_pasted_text() {
        assert_eq!(unformat("111.444.777-35"), "11144477735");
        assert_eq!(unformat("(11) 98765-4321"), "11987654321");
        assert_eq!(unformat("CEP: 01310-100 SP"), "01310100");
        assert_eq!(unformat("no digits here"), "");
    }

    #[test]
    fn test_identifier_pattern_switches_at_twelfth_digit() {
        let digits = "11222333000181";
        let mut previous = 0;

        for len in 1..=digits.len() {
            let shown = format(&digits[..len], MaskKind::Identifier);
            let marks = punctuation(&shown);
            assert!(marks >= previous, "punctuation dropped at {} digits", len);
            previous = marks;

            if len <= 11 {
                assert!(!shown.contains('/'), "{} digits: {}", len, shown);
            } else {
                assert!(shown.contains('/'), "{} digits: {}", len, shown);
            }
        }
    }

    #[test]
    fn test_mask_kind_from_str() {
        assert_eq!("cep".parse::<MaskKind>(), Ok(MaskKind::PostalCode));
        assert_eq!("Phone".parse::<MaskKind>(), Ok(MaskKind::Phone));
        assert_eq!("cpf-cnpj".parse::<MaskKind>(), Ok(MaskKind::Identifier));
        assert!("zip".parse::<MaskKind>().is_err());
    }

    #[test]
    fn test_to_raw_truncates() {
        assert_eq!(to_raw("(11) 98765-43219", MaskKind::Phone), "11987654321");
        assert_eq!(to_raw("12345-6789", MaskKind::PostalCode), "12345678");
    }

    #[test]
    fn test_strip_decoration_keeps_length_and_letters() {
        assert_eq!(strip_decoration("(11) 98765-432199"), "1198765432199");
        assert_eq!(strip_decoration("01310-2009999"), "013102009999");
        assert_eq!(strip_decoration("11a9"), "11a9");
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count("(11) 3333-4444"), Some(10));
        assert_eq!(digit_count("01310-200"), Some(8));
        assert_eq!(digit_count(""), Some(0));
        assert_eq!(digit_count("abcdefghij"), None);
        assert_eq!(digit_count("0131020A"), None);
    }
}
