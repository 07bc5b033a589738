//! Confirms the payer actually authorized this exact transfer.

use alloy_primitives::U256;

use crate::chain::ChainGateway;
use crate::crypto::eip3009::{self, TransferWithAuthorization};
use crate::crypto::eip712::verify_signature;
use crate::error::ErrorCode;
use crate::proto::VerifyRequest;

use super::{VerificationResult, VerificationStep, Verifier};

#[derive(Debug, Default)]
pub struct SignatureVerifier;

impl<G: ChainGateway> Verifier<G> for SignatureVerifier {
    async fn verify(&self, gateway: &G, request: &VerifyRequest) -> VerificationResult {
        let requirements = &request.payment_requirements;
        let payload = &request.payment_payload;
        let auth = &payload.payload.authorization;

        let chain_id = match gateway.chain_id(&payload.network) {
            Ok(id) => id,
            Err(_) => {
                return VerificationResult::fail(
                    ErrorCode::InvalidExactEvmPayloadSignature,
                    "could not resolve chain id for signature verification",
                );
            }
        };

        let hash = eip3009::hash(
            chain_id,
            requirements.asset,
            &requirements.extra.name,
            &requirements.extra.version,
            &TransferWithAuthorization {
                from: auth.from,
                to: auth.to,
                value: auth.value.value(),
                valid_after: auth.valid_after.value(),
                valid_before: auth.valid_before.value(),
                nonce: auth.nonce,
            },
        );

        match verify_signature(hash, payload.payload.signature.as_bytes(), auth.from) {
            Ok(()) => VerificationResult::ok(),
            Err(_) => VerificationResult::fail(
                ErrorCode::InvalidExactEvmPayloadSignature,
                "signature does not recover to authorization.from",
            ),
        }
    }

    fn step(&self) -> VerificationStep {
        VerificationStep::Signature
    }

    fn order(&self) -> u8 {
        4
    }
}
