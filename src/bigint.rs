//! Arbitrary-precision amount/time fields, wire-encoded as decimal strings.
//!
//! x402 carries `value`, `validAfter`, `validBefore`, and `maxAmountRequired` as JSON strings of
//! base-10 digits so they survive round-trips through languages without 256-bit integers. This
//! module is the one place those strings become [`alloy_primitives::U256`] and back.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A non-negative, arbitrary-precision integer, serialized as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct BigUint(pub U256);

impl BigUint {
    pub fn value(self) -> U256 {
        self.0
    }
}

impl From<U256> for BigUint {
    fn from(v: U256) -> Self {
        BigUint(v)
    }
}

impl fmt::Display for BigUint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BigUint {
    type Err = ParseBigUintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseBigUintError(s.to_string()));
        }
        U256::from_str_radix(s, 10)
            .map(BigUint)
            .map_err(|_| ParseBigUintError(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("not a non-negative base-10 integer: {0:?}")]
pub struct ParseBigUintError(String);

impl Serialize for BigUint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for BigUint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
