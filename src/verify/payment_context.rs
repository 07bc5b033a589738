//! Semantic cross-checks between the payload and the requirements it claims to satisfy.
//!
//! Deliberately does not check `validAfter`/`validBefore` against the current time: the on-chain
//! asset enforces that window at settlement, and duplicating it here would let the facilitator's
//! clock disagree with the chain's.

use crate::chain::ChainGateway;
use crate::error::ErrorCode;
use crate::proto::VerifyRequest;

use super::{VerificationResult, VerificationStep, Verifier};

#[derive(Debug, Default)]
pub struct PaymentContextVerifier;

impl<G: ChainGateway> Verifier<G> for PaymentContextVerifier {
    async fn verify(&self, gateway: &G, request: &VerifyRequest) -> VerificationResult {
        if request.x402_version != 1 {
            return VerificationResult::fail(
                ErrorCode::InvalidX402Version,
                format!("unsupported x402Version {}", request.x402_version),
            );
        }

        let requirements = &request.payment_requirements;
        let payload = &request.payment_payload;

        if requirements.scheme != "exact" {
            return VerificationResult::fail(
                ErrorCode::UnsupportedScheme,
                format!("unsupported scheme {:?}", requirements.scheme),
            );
        }
        if payload.scheme != requirements.scheme {
            return VerificationResult::fail(
                ErrorCode::UnsupportedScheme,
                "payload.scheme does not match paymentRequirements.scheme",
            );
        }

        if gateway.chain_id(&requirements.network).is_err() {
            return VerificationResult::fail(
                ErrorCode::InvalidNetwork,
                format!("network {:?} is not configured", requirements.network),
            );
        }
        if payload.network != requirements.network {
            return VerificationResult::fail(
                ErrorCode::InvalidNetwork,
                "payload.network does not match paymentRequirements.network",
            );
        }

        let auth = &payload.payload.authorization;
        if !addresses_equal_case_insensitive(auth.to, requirements.pay_to) {
            return VerificationResult::fail(
                ErrorCode::InvalidExactEvmPayloadRecipientMismatch,
                "authorization.to does not match paymentRequirements.payTo",
            );
        }

        if auth.value.value() < requirements.max_amount_required.value() {
            return VerificationResult::fail(
                ErrorCode::InvalidExactEvmPayloadAuthorizationValue,
                "authorization.value is less than maxAmountRequired",
            );
        }

        VerificationResult::ok()
    }

    fn step(&self) -> VerificationStep {
        VerificationStep::PaymentContext
    }

    fn order(&self) -> u8 {
        2
    }
}

fn addresses_equal_case_insensitive(a: alloy_primitives::Address, b: alloy_primitives::Address) -> bool {
    // Addresses are already a fixed 20-byte value; comparing them is inherently case-insensitive.
    // This helper exists to document that the wire format's case never carries meaning.
    a == b
}
