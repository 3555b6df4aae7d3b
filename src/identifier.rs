// 🪪 Identifier Validator - CPF / CNPJ modulo-11 check digits
//
// Both identifiers end in two check digits. Each one is a weighted sum of the
// preceding digits reduced modulo 11; remainders 0 and 1 map to digit 0,
// anything else to 11 - remainder.

use crate::mask::unformat;
use serde::{Deserialize, Serialize};

pub const INDIVIDUAL_LEN: usize = 11;
pub const CORPORATE_LEN: usize = 14;

// ============================================================================
// IDENTIFIER KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierKind {
    /// CPF, 11 digits
    Individual,
    /// CNPJ, 14 digits
    Corporate,
}

impl IdentifierKind {
    /// Kind implied by the digit count of `raw`, if it has a valid length.
    pub fn detect(raw: &str) -> Option<Self> {
        match unformat(raw).len() {
            INDIVIDUAL_LEN => Some(IdentifierKind::Individual),
            CORPORATE_LEN => Some(IdentifierKind::Corporate),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            IdentifierKind::Individual => "CPF",
            IdentifierKind::Corporate => "CNPJ",
        }
    }
}

// ============================================================================
// WEIGHTS
// ============================================================================

/// Descending CNPJ weight counter: yields `start`, `start - 1`, ... down to 2,
/// then wraps to 9 and keeps descending.
#[derive(Debug, Clone)]
struct CyclicWeights {
    next: u32,
}

impl CyclicWeights {
    fn starting_at(start: u32) -> Self {
        CyclicWeights { next: start }
    }
}

impl Iterator for CyclicWeights {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let weight = self.next;
        self.next = if weight <= 2 { 9 } else { weight - 1 };
        Some(weight)
    }
}

/// CPF weights: `top`, `top - 1`, ... (one per digit, never wraps)
fn descending_from(top: u32) -> impl Iterator<Item = u32> {
    (2..=top).rev()
}

fn check_digit<I>(digits: &[u32], weights: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// Parse an exact-length, digits-only string.
fn parse_digits(raw: &str, len: usize) -> Option<Vec<u32>> {
    if raw.len() != len {
        return None;
    }
    raw.chars().map(|c| c.to_digit(10)).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

// ============================================================================
// CHECK DIGIT COMPUTATION
// ============================================================================

/// Both CPF check digits for a 9-digit base.
pub fn individual_check_digits(base: &str) -> Option<(u32, u32)> {
    let mut digits = parse_digits(base, INDIVIDUAL_LEN - 2)?;

    let first = check_digit(&digits, descending_from(10));
    digits.push(first);
    let second = check_digit(&digits, descending_from(11));

    Some((first, second))
}

/// Both CNPJ check digits for a 12-digit base.
pub fn corporate_check_digits(base: &str) -> Option<(u32, u32)> {
    let mut digits = parse_digits(base, CORPORATE_LEN - 2)?;

    let first = check_digit(&digits, CyclicWeights::starting_at(5));
    digits.push(first);
    let second = check_digit(&digits, CyclicWeights::starting_at(6));

    Some((first, second))
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate an 11-digit CPF (digits only).
pub fn is_valid_individual(digits: &str) -> bool {
    let Some(parsed) = parse_digits(digits, INDIVIDUAL_LEN) else {
        return false;
    };
    if all_same(&parsed) {
        return false;
    }

    match individual_check_digits(&digits[..INDIVIDUAL_LEN - 2]) {
        Some((first, second)) => parsed[9] == first && parsed[10] == second,
        None => false,
    }
}

/// Validate a 14-digit CNPJ (digits only).
pub fn is_valid_corporate(digits: &str) -> bool {
    let Some(parsed) = parse_digits(digits, CORPORATE_LEN) else {
        return false;
    };
    if all_same(&parsed) {
        return false;
    }

    match corporate_check_digits(&digits[..CORPORATE_LEN - 2]) {
        Some((first, second)) => parsed[12] == first && parsed[13] == second,
        None => false,
    }
}

/// Validate a CPF or CNPJ, picking the algorithm by digit count.
///
/// Punctuation is stripped first, so `"111.444.777-35"` and `"11144477735"`
/// give the same answer. Any count other than 11 or 14 is invalid.
pub fn is_valid_identifier(raw: &str) -> bool {
    let digits = unformat(raw);
    match IdentifierKind::detect(&digits) {
        Some(IdentifierKind::Individual) => is_valid_individual(&digits),
        Some(IdentifierKind::Corporate) => is_valid_corporate(&digits),
        None => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================
