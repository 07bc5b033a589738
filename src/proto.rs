//! Wire types for the x402 `/verify`, `/settle`, and `/supported` endpoints.
//!
//! Field names follow the x402 JSON wire format exactly (camelCase); internal naming stays
//! snake_case, with `#[serde(rename_all = "camelCase")]` bridging the two.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::bigint::BigUint;
use crate::error::ErrorCode;
use crate::hex_types::EvmSignature;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub from: Address,
    pub to: Address,
    pub value: BigUint,
    pub valid_after: BigUint,
    pub valid_before: BigUint,
    pub nonce: alloy_primitives::B256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExactPayload {
    pub signature: EvmSignature,
    pub authorization: Authorization,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub x402_version: u64,
    pub scheme: String,
    pub network: String,
    pub payload: ExactPayload,
}

/// EIP-712 domain overrides carried in `paymentRequirements.extra`.
///
/// Absent or empty `name`/`version` hash as the empty string — see
/// [`crate::crypto::eip712::domain_separator`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extra {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    pub scheme: String,
    pub network: String,
    pub max_amount_required: BigUint,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub pay_to: Address,
    pub max_timeout_seconds: u64,
    pub asset: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,
    #[serde(default)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub x402_version: u64,
    pub payment_payload: PaymentPayload,
    pub payment_requirements: PaymentRequirements,
}

/// Structurally identical to [`VerifyRequest`]; `/settle` re-runs the same pipeline first.
pub type SettleRequest = VerifyRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<ErrorCode>,
    pub payer: String,
}

impl VerifyResponse {
    pub fn ok(payer: String) -> Self {
        VerifyResponse {
            is_valid: true,
            invalid_reason: None,
            payer,
        }
    }

    pub fn fail(code: ErrorCode, payer: String) -> Self {
        VerifyResponse {
            is_valid: false,
            invalid_reason: Some(code),
            payer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    pub network: String,
    pub payer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedKind {
    pub x402_version: u64,
    pub scheme: String,
    pub network: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedResponse {
    pub kinds: Vec<SupportedKind>,
}

/// Renders an address the way every response field in this crate echoes one: lowercase hex,
/// `0x`-prefixed. Case never carries meaning here — comparisons against it are case-insensitive.
pub fn address_to_string(address: Address) -> String {
    format!("{address:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_request_round_trips_camelcase_field_names() {
        let json = serde_json::json!({
            "x402Version": 1,
            "paymentPayload": {
                "x402Version": 1,
                "scheme": "exact",
                "network": "base-sepolia",
                "payload": {
                    "signature": format!("0x{}", "ab".repeat(65)),
                    "authorization": {
                        "from": "0x0000000000000000000000000000000000000001",
                        "to": "0x0000000000000000000000000000000000000002",
                        "value": "1000",
                        "validAfter": "0",
                        "validBefore": "9999999999",
                        "nonce": format!("0x{}", "11".repeat(32)),
                    }
                }
            },
            "paymentRequirements": {
                "scheme": "exact",
                "network": "base-sepolia",
                "maxAmountRequired": "1000",
                "resource": "https://example.com/resource",
                "payTo": "0x0000000000000000000000000000000000000002",
                "maxTimeoutSeconds": 60,
                "asset": "0x0000000000000000000000000000000000000003",
                "extra": { "name": "USD Coin", "version": "2" }
            }
        });
        let req: VerifyRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.x402_version, 1);
        assert_eq!(req.payment_payload.scheme, "exact");
        assert_eq!(
            req.payment_requirements.max_amount_required.to_string(),
            "1000"
        );
    }

    #[test]
    fn verify_response_omits_invalid_reason_when_valid() {
        let resp = VerifyResponse::ok("0xabc".to_string());
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("invalidReason").is_none());
        assert_eq!(json["isValid"], true);
    }

    #[test]
    fn verify_response_serializes_error_code_as_screaming_snake() {
        let resp = VerifyResponse::fail(ErrorCode::InsufficientFunds, "0xabc".to_string());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["invalidReason"], "INSUFFICIENT_FUNDS");
    }
}
