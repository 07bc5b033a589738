//! Confirms the asset contract is actually an EIP-3009 token before anyone signs against it.

use alloy_primitives::{Address, B256};

use crate::chain::{ChainGateway, ChainGatewayError};
use crate::error::ErrorCode;
use crate::proto::VerifyRequest;

use super::{VerificationResult, VerificationStep, Verifier};

#[derive(Debug, Default)]
pub struct Eip3009AssetVerifier;

impl<G: ChainGateway> Verifier<G> for Eip3009AssetVerifier {
    async fn verify(&self, gateway: &G, request: &VerifyRequest) -> VerificationResult {
        let network = &request.payment_requirements.network;
        let asset = request.payment_requirements.asset;

        match gateway.code_at(network, asset).await {
            Ok(code) if code.is_empty() => {
                return VerificationResult::fail(
                    ErrorCode::InvalidPayload,
                    "Asset address is not a contract",
                );
            }
            Ok(_) => {}
            Err(ChainGatewayError::NetworkNotConfigured(_)) => {
                return VerificationResult::fail(ErrorCode::InvalidNetwork, "network not configured");
            }
            Err(_) => {
                return VerificationResult::fail(ErrorCode::Unknown, "code_at call failed");
            }
        }

        match gateway
            .call_authorization_state(network, asset, Address::ZERO, B256::ZERO)
            .await
        {
            Ok(_) => VerificationResult::ok(),
            Err(ChainGatewayError::Rpc(_) | ChainGatewayError::Transport(_)) => {
                VerificationResult::fail(
                    ErrorCode::InvalidPayload,
                    "Asset does not support EIP-3009 authorizationState",
                )
            }
            Err(_) => VerificationResult::fail(ErrorCode::Unknown, "authorizationState probe failed"),
        }
    }

    fn step(&self) -> VerificationStep {
        VerificationStep::Eip3009Asset
    }

    fn order(&self) -> u8 {
        3
    }
}
