//! EIP-3009 `TransferWithAuthorization` message hashing, built on [`super::eip712`].

use alloy_primitives::{Address, B256, U256, keccak256};

use super::eip712::{domain_separator, left_pad32, typed_hash};

/// The authorization type string hashed into the EIP-712 struct hash.
pub const AUTHORIZATION_TYPE: &str = "TransferWithAuthorization(address from,address to,uint256 value,uint256 validAfter,uint256 validBefore,bytes32 nonce)";

/// The six signed fields of a `transferWithAuthorization` call.
#[derive(Debug, Clone, Copy)]
pub struct TransferWithAuthorization {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub valid_after: U256,
    pub valid_before: U256,
    pub nonce: B256,
}

fn struct_hash(auth: &TransferWithAuthorization) -> B256 {
    let type_hash = keccak256(AUTHORIZATION_TYPE.as_bytes());
    let mut buf = Vec::with_capacity(32 * 7);
    buf.extend_from_slice(type_hash.as_slice());
    buf.extend_from_slice(&left_pad32(auth.from.as_slice()));
    buf.extend_from_slice(&left_pad32(auth.to.as_slice()));
    buf.extend_from_slice(&auth.value.to_be_bytes::<32>());
    buf.extend_from_slice(&auth.valid_after.to_be_bytes::<32>());
    buf.extend_from_slice(&auth.valid_before.to_be_bytes::<32>());
    buf.extend_from_slice(auth.nonce.as_slice());
    keccak256(buf)
}

/// Computes the final EIP-712 digest that the payer's signature must recover against.
///
/// `name`/`version` come from `paymentRequirements.extra` verbatim; empty strings are hashed
/// as the empty byte string, matching [`super::eip712::domain_separator`]'s contract.
pub fn hash(
    chain_id: U256,
    asset: Address,
    name: &str,
    version: &str,
    auth: &TransferWithAuthorization,
) -> B256 {
    let domain = domain_separator(name, version, chain_id, asset);
    typed_hash(domain, struct_hash(auth))
}
