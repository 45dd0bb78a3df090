//! UPC-A encoding
//!
//! A UPC-A symbol is 95 modules wide: a 3-module start guard, six 7-module
//! left digits (L-codes), a 5-module center guard, six 7-module right digits
//! (R-codes) and a 3-module end guard.

use crate::{CoreError, Result};
use std::fmt;

/// Left-half digit encodings (odd parity), indexed by digit value
const L_CODES: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
    "0110111", "0001011",
];

/// Right-half digit encodings, indexed by digit value
const R_CODES: [&str; 10] = [
    "1110010", "1100110", "1101100", "1000010", "1011100", "1001110", "1010000", "1000100",
    "1001000", "1110100",
];

const START_GUARD: &str = "101";
const CENTER_GUARD: &str = "01010";
const END_GUARD: &str = "101";

/// Number of modules in every UPC-A pattern
pub const PATTERN_LEN: usize = 95;

/// A 12-digit UPC-A code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpcCode(String);

impl UpcCode {
    /// The twelve digits as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the twelfth digit matches the check digit of the first eleven
    pub fn has_valid_check_digit(&self) -> bool {
        let expected = check_digit(&self.0[..11]);
        self.0.as_bytes()[11] == b'0' + expected
    }

    /// Human-readable digit line: `d  ddddd  ddddd  d`
    pub fn human_readable(&self) -> String {
        let s = &self.0;
        format!("{}  {}  {}  {}", &s[..1], &s[1..6], &s[6..11], &s[11..])
    }
}

impl fmt::Display for UpcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 95-module UPC-A bar pattern of `'0'`/`'1'` characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarPattern(String);

impl BarPattern {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate modules as booleans (`true` = bar)
    pub fn modules(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.bytes().map(|b| b == b'1')
    }

    /// Whether module `index` belongs to the start, center or end guard
    pub fn is_guard(&self, index: usize) -> bool {
        let n = self.len();
        index < 3 || (45..50).contains(&index) || (n >= 3 && index >= n - 3 && index < n)
    }
}

/// Compute the UPC-A check digit for 11 data digits
///
/// Digits at even 0-based positions are weighted by 3, the others by 1;
/// the check digit brings the weighted sum up to a multiple of ten.
/// Non-digit characters are ignored.
pub fn check_digit(digits11: &str) -> u8 {
    let (odd, even) = digits11
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .fold((0u32, 0u32), |(odd, even), (i, d)| {
            if i % 2 == 0 {
                (odd + d, even)
            } else {
                (odd, even + d)
            }
        });
    let total = odd * 3 + even;
    ((10 - total % 10) % 10) as u8
}

/// Build a 12-digit UPC-A code from arbitrary input
///
/// All non-digit characters are stripped. Eleven remaining digits get the
/// computed check digit appended; twelve are accepted as they are.
///
/// # Errors
/// `CoreError::InvalidBarcodeInput` for any other digit count.
pub fn normalize(input: &str) -> Result<UpcCode> {
    let mut digits: String = input.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        11 => {
            let check = check_digit(&digits);
            digits.push(char::from(b'0' + check));
            Ok(UpcCode(digits))
        }
        12 => {
            let code = UpcCode(digits);
            if !code.has_valid_check_digit() {
                log::warn!("UPC {code} has a check digit that does not match its data digits");
            }
            Ok(code)
        }
        n => Err(CoreError::InvalidBarcodeInput(format!(
            "UPC must have 11 or 12 digits, got '{input}' ({n} digits)"
        ))),
    }
}

/// Encode a UPC-A code into its 95-module bar pattern
pub fn encode(code: &UpcCode) -> BarPattern {
    let digits = code.as_str().as_bytes();
    let mut bits = String::with_capacity(PATTERN_LEN);

    bits.push_str(START_GUARD);
    for d in &digits[..6] {
        bits.push_str(L_CODES[usize::from(d - b'0')]);
    }
    bits.push_str(CENTER_GUARD);
    for d in &digits[6..] {
        bits.push_str(R_CODES[usize::from(d - b'0')]);
    }
    bits.push_str(END_GUARD);

    BarPattern(bits)
}
