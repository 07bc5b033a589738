//! Shared well-formed request builder for verifier unit tests.
#![cfg(test)]

use crate::bigint::BigUint;
use crate::hex_types::EvmSignature;
use crate::proto::*;
use alloy_primitives::{Address, B256};
use std::str::FromStr;

pub fn sample_request() -> VerifyRequest {
    VerifyRequest {
        x402_version: 1,
        payment_payload: PaymentPayload {
            x402_version: 1,
            scheme: "exact".into(),
            network: "base-sepolia".into(),
            payload: ExactPayload {
                signature: EvmSignature::from_str(&format!("0x{}", "ab".repeat(65))).unwrap(),
                authorization: Authorization {
                    from: Address::with_last_byte(1),
                    to: Address::with_last_byte(2),
                    value: "1000".parse::<BigUint>().unwrap(),
                    valid_after: "0".parse::<BigUint>().unwrap(),
                    valid_before: "9999999999".parse::<BigUint>().unwrap(),
                    nonce: B256::with_last_byte(7),
                },
            },
        },
        payment_requirements: PaymentRequirements {
            scheme: "exact".into(),
            network: "base-sepolia".into(),
            max_amount_required: "1000".parse::<BigUint>().unwrap(),
            resource: "https://example.com".into(),
            description: None,
            mime_type: None,
            pay_to: Address::with_last_byte(2),
            max_timeout_seconds: 60,
            asset: Address::with_last_byte(3),
            output_schema: None,
            extra: Extra {
                name: "USD Coin".into(),
                version: "2".into(),
            },
        },
    }
}
