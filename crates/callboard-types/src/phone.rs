//! Phone-number normalization and validation.
//!
//! Destinations typed by users are normalized to E.164 (`+` followed by 8 to
//! 15 digits). A bare 10-digit number is treated as North American and gets
//! the `+1` country code. Common separators (spaces, dashes, dots,
//! parentheses) are stripped; anything else is rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Wire-format check applied to `customerPhoneNumber` on the HTTP surface.
static CUSTOMER_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("static regex is valid"));

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;
const NANP_LOCAL_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneNumberError {
    #[error("phone number is empty")]
    Empty,
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("phone number must have between 8 and 15 digits, got {0}")]
    Length(usize),
    #[error("country code cannot start with 0")]
    LeadingZero,
}

/// A normalized E.164 phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes a user-entered destination to E.164.
///
/// # Errors
///
/// Returns `PhoneNumberError` if the input has characters other than digits,
/// separators and a single leading `+`, or if the digit count falls outside
/// 8..=15 after normalization.
pub fn normalize_destination(input: &str) -> Result<PhoneNumber, PhoneNumberError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PhoneNumberError::Empty);
    }

    let (has_plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut digits = String::with_capacity(rest.len() + 1);
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            other => return Err(PhoneNumberError::InvalidCharacter(other)),
        }
    }

    if digits.is_empty() {
        return Err(PhoneNumberError::Empty);
    }

    if !has_plus && digits.len() == NANP_LOCAL_DIGITS {
        digits.insert(0, '1');
    }

    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
        return Err(PhoneNumberError::Length(digits.len()));
    }
    if digits.starts_with('0') {
        return Err(PhoneNumberError::LeadingZero);
    }

    Ok(PhoneNumber(format!("+{digits}")))
}

/// Returns `true` if `number` matches `^\+?[1-9]\d{1,14}$`.
pub fn is_valid_customer_number(number: &str) -> bool {
    CUSTOMER_NUMBER_REGEX.is_match(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_digit_number_gets_nanp_prefix() {
        let number = normalize_destination("5551234567").unwrap();
        assert_eq!(number.as_str(), "+15551234567");
    }

    #[test]
    fn international_number_passes_unchanged() {
        let number = normalize_destination("+442071234567").unwrap();
        assert_eq!(number.as_str(), "+442071234567");
    }

    #[test]
    fn short_number_is_rejected() {
        assert_eq!(
            normalize_destination("123"),
            Err(PhoneNumberError::Length(3))
        );
    }

    #[test]
    fn separators_are_stripped() {
        let number = normalize_destination("(555) 123-4567").unwrap();
        assert_eq!(number.as_str(), "+15551234567");
        let number = normalize_destination("+44 20.7123.4567").unwrap();
        assert_eq!(number.as_str(), "+442071234567");
    }

    #[test]
    fn letters_are_rejected() {
        assert_eq!(
            normalize_destination("555-CALL-NOW"),
            Err(PhoneNumberError::InvalidCharacter('C'))
        );
    }

    #[test]
    fn plus_only_allowed_as_prefix() {
        assert_eq!(
            normalize_destination("44+2071234567"),
            Err(PhoneNumberError::InvalidCharacter('+'))
        );
    }

    #[test]
    fn empty_and_too_long_inputs() {
        assert_eq!(normalize_destination("   "), Err(PhoneNumberError::Empty));
        assert_eq!(normalize_destination("+"), Err(PhoneNumberError::Empty));
        assert_eq!(
            normalize_destination("+1234567890123456"),
            Err(PhoneNumberError::Length(16))
        );
    }

    #[test]
    fn leading_zero_country_code_rejected() {
        assert_eq!(
            normalize_destination("+0441234567"),
            Err(PhoneNumberError::LeadingZero)
        );
    }

    #[test]
    fn customer_number_wire_check() {
        assert!(is_valid_customer_number("+15551234567"));
        assert!(is_valid_customer_number("15551234567"));
        assert!(!is_valid_customer_number("+05551234567"));
        assert!(!is_valid_customer_number("555-123-4567"));
        assert!(!is_valid_customer_number("+1234567890123456"));
    }
}
