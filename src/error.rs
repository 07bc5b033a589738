//! The closed set of error codes returned verbatim to x402 clients.
//!
//! These tokens are an external contract shared with every x402 client that talks to this
//! facilitator: changing a variant's wire representation breaks them. Internal failures
//! (RPC errors, malformed config, a signer that won't parse) are represented by their own
//! `thiserror` types elsewhere and collapse into one of these codes before reaching a response.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A code from the x402 facilitator's closed error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unknown,
    InvalidX402Version,
    InvalidPayload,
    UnsupportedScheme,
    InvalidNetwork,
    InvalidExactEvmPayloadSignature,
    InvalidExactEvmPayloadAuthorizationValue,
    InvalidExactEvmPayloadRecipientMismatch,
    InsufficientFunds,
    InvalidTransactionState,
    UnexpectedSettleError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json.trim_matches('"'))
    }
}
