//! Canonical hex forms for account addresses and hashes.
//!
//! [`HexString`] is a validated, lowercase, `0x`-prefixed hex string of any
//! non-zero even length (hashes, handles). [`AccountAddress`] is the fixed-width
//! 32-byte identifier with a long canonical form and a short display form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FormatError;

pub const ADDRESS_LENGTH: usize = 32;

const PREFIX: &str = "0x";

fn strip_prefix(input: &str) -> &str {
    input
        .strip_prefix(PREFIX)
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decode bare hex digits, rejecting odd lengths and non-hex characters.
fn decode_digits(input: &str, digits: &str) -> Result<Vec<u8>, FormatError> {
    if digits.is_empty() {
        return Err(FormatError::new(input, "no hex digits"));
    }
    if digits.len() % 2 != 0 {
        return Err(FormatError::new(input, "odd number of hex digits"));
    }
    hex::decode(digits).map_err(|e| FormatError::new(input, e.to_string()))
}

// ==============================================================================
// Hex String
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexString(String);

impl HexString {
    /// Canonicalize `input`, adding the `0x` prefix only when it is absent.
    pub fn ensure(input: impl AsRef<str>) -> Result<Self, FormatError> {
        let input = input.as_ref();
        let bytes = decode_digits(input, strip_prefix(input))?;
        Ok(Self::encode(&bytes))
    }

    /// Empty input is rejected, since `0x` alone is not a valid hex string.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.is_empty() {
            return Err(FormatError::new(PREFIX, "no hex digits"));
        }
        Ok(Self::encode(bytes))
    }

    fn encode(bytes: &[u8]) -> Self {
        Self(format!("{PREFIX}{}", hex::encode(bytes)))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // Construction guarantees valid digits.
        hex::decode(self.no_prefix()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn no_prefix(&self) -> &str {
        &self.0[PREFIX.len()..]
    }
}

impl fmt::Display for HexString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexString {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ensure(s)
    }
}

impl AsRef<str> for HexString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ==============================================================================
// Account Address
// ==============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    pub const ZERO: Self = Self([0; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let array: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            FormatError::new(
                hex::encode(bytes),
                format!("expected {ADDRESS_LENGTH} bytes, got {}", bytes.len()),
            )
        })?;
        Ok(Self(array))
    }

    /// Parse the long form or the short form produced by [`Self::short_form`].
    /// Unlike [`HexString::ensure`], an odd digit count is accepted since short
    /// forms drop leading zeros; the digits are left-padded to full width.
    pub fn from_hex(input: impl AsRef<str>) -> Result<Self, FormatError> {
        let input = input.as_ref();
        let digits = strip_prefix(input);
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(FormatError::new(
                input,
                format!("more than {} hex digits", ADDRESS_LENGTH * 2),
            ));
        }
        if digits.is_empty() {
            return Err(FormatError::new(input, "no hex digits"));
        }
        let padded = format!("{digits:0>width$}", width = ADDRESS_LENGTH * 2);
        let bytes = decode_digits(input, &padded)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Long canonical form: `0x` followed by all 64 digits.
    pub fn to_hex(&self) -> HexString {
        HexString::encode(&self.0)
    }

    /// Leading zero digits stripped, keeping at least one (`0x0`, `0x1`).
    pub fn short_form(&self) -> String {
        let long = hex::encode(self.0);
        let trimmed = long.trim_start_matches('0');
        if trimmed.is_empty() {
            format!("{PREFIX}0")
        } else {
            format!("{PREFIX}{trimmed}")
        }
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_hex().as_str())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.short_form())
    }
}

impl FromStr for AccountAddress {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_hex().as_str())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
