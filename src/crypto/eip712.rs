//! Domain-separator and typed-message hashing per EIP-712, plus signature recovery.

use alloy_primitives::{Address, B256, Signature, U256, keccak256};

use super::CryptoError;

/// The one and only domain type this facilitator ever hashes against.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Left-zero-pads `bytes` to 32 bytes, big-endian. Panics if `bytes` is longer than 32.
pub fn left_pad32(bytes: &[u8]) -> [u8; 32] {
    assert!(bytes.len() <= 32, "value wider than 32 bytes");
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    out
}

/// Computes the EIP-712 domain separator for `(name, version, chain_id, verifying_contract)`.
///
/// `name`/`version` are hashed exactly as given — an empty string hashes to `keccak256("")`.
/// No implicit defaults are applied here or anywhere upstream of this function.
pub fn domain_separator(
    name: &str,
    version: &str,
    chain_id: U256,
    verifying_contract: Address,
) -> B256 {
    let type_hash = keccak256(DOMAIN_TYPE.as_bytes());
    let name_hash = keccak256(name.as_bytes());
    let version_hash = keccak256(version.as_bytes());
    let chain_id_padded = chain_id.to_be_bytes::<32>();
    let contract_padded = left_pad32(verifying_contract.as_slice());

    let mut buf = Vec::with_capacity(32 * 5);
    buf.extend_from_slice(type_hash.as_slice());
    buf.extend_from_slice(name_hash.as_slice());
    buf.extend_from_slice(version_hash.as_slice());
    buf.extend_from_slice(&chain_id_padded);
    buf.extend_from_slice(&contract_padded);
    keccak256(buf)
}

/// Combines a domain separator and a struct hash into the final EIP-712 digest:
/// `keccak256(0x19 0x01 || domain_separator || struct_hash)`.
pub fn typed_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.push(0x19);
    buf.push(0x01);
    buf.extend_from_slice(domain_separator.as_slice());
    buf.extend_from_slice(struct_hash.as_slice());
    keccak256(buf)
}

/// Recovers the signer address from a 65-byte `r || s || v` signature over `message_hash`.
///
/// `v` is accepted as `{0, 1, 27, 28}` and normalized to `{0, 1}` before recovery, per EIP-712 —
/// not the EIP-155 transaction-signing convention.
pub fn recover(message_hash: B256, signature_bytes: &[u8]) -> Result<Address, CryptoError> {
    if signature_bytes.len() != 65 {
        return Err(CryptoError::BadSignatureLength(signature_bytes.len()));
    }
    let mut normalized = [0u8; 65];
    normalized.copy_from_slice(signature_bytes);
    if normalized[64] >= 27 {
        normalized[64] -= 27;
    }
    let signature = Signature::from_raw_array(&normalized)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;
    signature
        .recover_address_from_prehash(&message_hash)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))
}

/// Recovers the signer and compares it, case-insensitively, against `expected_address`.
pub fn verify_signature(
    message_hash: B256,
    signature_bytes: &[u8],
    expected_address: Address,
) -> Result<(), CryptoError> {
    let recovered = recover(message_hash, signature_bytes)?;
    if recovered != expected_address {
        return Err(CryptoError::Mismatch {
            expected: expected_address,
            recovered,
        });
    }
    Ok(())
}
