//! Format validators for tokenizable categories.
//!
//! Both validators are pure and total: malformed input returns `false`
//! rather than failing. A side effect of that is that empty or
//! whitespace-only plaintext can never reach the hash generator.

use lazy_static::lazy_static;
use regex::Regex;

/// Checksum weights for the first 17 digits of an identity number.
const IDENTITY_WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];

/// Expected check character, indexed by `weighted_sum % 11`.
const IDENTITY_CHECK_CHARS: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

lazy_static! {
    // Mainland mobile number: 11 ASCII digits, leading 1, second digit 3-9.
    // [0-9] rather than \d, which would also match Unicode decimal digits.
    static ref PHONE_REGEX: Regex = Regex::new(r"^1[3-9][0-9]{9}$").unwrap();
}

/// Validate an 18-character national identity number.
///
/// The first 17 characters must be decimal digits; the 18th must match the
/// weighted-modulus check character, compared case-insensitively (a trailing
/// `x` is accepted as `X`).
pub fn is_valid_identity_number(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() != 18 {
        return false;
    }

    let mut sum = 0u32;
    for (i, c) in chars[..17].iter().enumerate() {
        match c.to_digit(10) {
            Some(digit) => sum += digit * IDENTITY_WEIGHTS[i],
            None => return false,
        }
    }

    let expected = IDENTITY_CHECK_CHARS[(sum % 11) as usize];
    chars[17].to_ascii_uppercase() == expected
}

/// Validate a mobile phone number.
pub fn is_valid_phone_number(value: &str) -> bool {
    PHONE_REGEX.is_match(value)
}
