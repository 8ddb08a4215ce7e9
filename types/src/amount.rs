//! Token amounts: raw `uint256` values paired with their token's decimals.
//!
//! All arithmetic stays in integer space. Human-readable strings are only
//! produced at the display edge and only parsed at the input edge.

use crate::error::AmountError;
use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendered in place of a value that has not been loaded yet.
pub const UNKNOWN_DISPLAY: &str = "—";

/// Highest decimals value a `uint256` can meaningfully scale by.
pub const MAX_DECIMALS: u8 = 77;

/// A token amount in raw base units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::ZERO, decimals)
    }

    /// Parse a human-entered decimal string (`"12.5"`) into raw units.
    ///
    /// Surrounding whitespace is ignored. Rejects empty, negative, non-numeric
    /// input and input with more fraction digits than the token has decimals.
    pub fn parse(input: &str, decimals: u8) -> Result<Self, AmountError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AmountError::Empty);
        }
        if input.starts_with('-') {
            return Err(AmountError::Negative);
        }
        if decimals > MAX_DECIMALS {
            return Err(AmountError::Malformed(format!(
                "decimals {decimals} exceeds {MAX_DECIMALS}"
            )));
        }

        let (int_part, frac_part) = match input.split_once('.') {
            Some((i, f)) => (i, f),
            None => (input, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Malformed(input.to_string()));
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmountError::Malformed(input.to_string()));
        }
        if frac_part.len() > decimals as usize {
            return Err(AmountError::Malformed(format!(
                "{input} has more than {decimals} fraction digits"
            )));
        }

        let normalized = match (int_part.is_empty(), frac_part.is_empty()) {
            (true, _) => format!("0.{frac_part}"),
            (false, true) => int_part.to_string(),
            (false, false) => format!("{int_part}.{frac_part}"),
        };
        let parsed = parse_units(&normalized, decimals)
            .map_err(|e| AmountError::Malformed(format!("{input}: {e}")))?;
        Ok(Self::new(parsed.get_absolute(), decimals))
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Render for the UI: thousands-separated integer part, fraction truncated
    /// to `max_fraction_digits` with trailing zeros removed.
    pub fn display(&self, max_fraction_digits: usize) -> String {
        if self.raw.is_zero() {
            return "0".to_string();
        }
        // format_units only fails on decimals > 77, which `parse` already rejects.
        let plain = format_units(self.raw, self.decimals).unwrap_or_else(|_| self.raw.to_string());
        let (int_part, frac_part) = match plain.split_once('.') {
            Some((i, f)) => (i, f),
            None => (plain.as_str(), ""),
        };

        let mut out = group_thousands(int_part);
        let frac: String = frac_part.chars().take(max_fraction_digits).collect();
        let frac = frac.trim_end_matches('0');
        if !frac.is_empty() {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(4))
    }
}

/// Render a possibly-unloaded raw value; unknown never renders as zero.
pub fn format_optional(raw: Option<U256>, decimals: u8, max_fraction_digits: usize) -> String {
    match raw {
        Some(raw) => TokenAmount::new(raw, decimals).display(max_fraction_digits),
        None => UNKNOWN_DISPLAY.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
