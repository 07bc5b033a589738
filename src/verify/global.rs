//! Structural and syntactic validation of a parsed request, ahead of any semantic or on-chain check.

use crate::chain::ChainGateway;
use crate::error::ErrorCode;
use crate::proto::VerifyRequest;

use super::{VerificationResult, VerificationStep, Verifier};

/// Required-field presence and shape: non-empty `resource`, non-zero timeout, a recognized
/// signature/nonce length. Most of this is already enforced by [`crate::proto`]'s `FromStr`
/// impls at deserialization time; this verifier covers what deserialization can't, like
/// cross-field zero checks.
#[derive(Debug, Default)]
pub struct GlobalVerifier;

impl<G: ChainGateway> Verifier<G> for GlobalVerifier {
    async fn verify(&self, _gateway: &G, request: &VerifyRequest) -> VerificationResult {
        let requirements = &request.payment_requirements;
        let auth = &request.payment_payload.payload.authorization;

        if requirements.resource.trim().is_empty() {
            return VerificationResult::fail(ErrorCode::InvalidPayload, "resource is empty");
        }
        if requirements.max_timeout_seconds == 0 {
            return VerificationResult::fail(
                ErrorCode::InvalidPayload,
                "maxTimeoutSeconds must be non-zero",
            );
        }
        if requirements.scheme.trim().is_empty() {
            return VerificationResult::fail(ErrorCode::InvalidPayload, "scheme is empty");
        }
        if requirements.network.trim().is_empty() {
            return VerificationResult::fail(ErrorCode::InvalidPayload, "network is empty");
        }
        if auth.from == alloy_primitives::Address::ZERO {
            return VerificationResult::fail(
                ErrorCode::InvalidPayload,
                "authorization.from is the zero address",
            );
        }
        if auth.to == alloy_primitives::Address::ZERO {
            return VerificationResult::fail(
                ErrorCode::InvalidPayload,
                "authorization.to is the zero address",
            );
        }

        VerificationResult::ok()
    }

    fn step(&self) -> VerificationStep {
        VerificationStep::Global
    }

    fn order(&self) -> u8 {
        1
    }
}
