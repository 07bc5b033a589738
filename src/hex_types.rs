//! A 65-byte `r ‖ s ‖ v` EVM signature, wire-encoded as a `0x`-prefixed 130-hex-char string.
//!
//! `alloy_primitives` has no single "raw 65-byte ECDSA signature" wire type of its own (its
//! `Signature` already carries parsed `r`/`s`/`v`/parity), so this crate owns the byte-exact wire
//! representation and hands the bytes to [`crate::crypto::eip712::recover`] for the actual math.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EvmSignature(pub [u8; 65]);

impl fmt::Debug for EvmSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmSignature({})", self.to_hex())
    }
}

impl EvmSignature {
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
#[error("signature must be a 0x-prefixed 130-hex-char string, got {0:?}")]
pub struct ParseSignatureError(String);

impl std::str::FromStr for EvmSignature {
    type Err = ParseSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| ParseSignatureError(s.to_string()))?;
        if hex_part.len() != 130 {
            return Err(ParseSignatureError(s.to_string()));
        }
        let bytes = hex::decode(hex_part).map_err(|_| ParseSignatureError(s.to_string()))?;
        let mut out = [0u8; 65];
        out.copy_from_slice(&bytes);
        Ok(EvmSignature(out))
    }
}

impl Serialize for EvmSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EvmSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
