//! EIP-712 typed-data hashing and EIP-3009 message construction.
//!
//! These two modules are the cryptographic core of the facilitator: everything else in the
//! verification pipeline either produces inputs for them ([`eip3009`]) or consumes their output
//! ([`eip712::recover`]).

pub mod eip3009;
pub mod eip712;

use thiserror::Error;

/// Failure modes for signature recovery and verification.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("signature must be 65 bytes, got {0}")]
    BadSignatureLength(usize),
    #[error("failed to recover signer from signature: {0}")]
    RecoveryFailed(String),
    #[error("signature mismatch: expected {expected}, recovered {recovered}")]
    Mismatch {
        expected: alloy_primitives::Address,
        recovered: alloy_primitives::Address,
    },
}
