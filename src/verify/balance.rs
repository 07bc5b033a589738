//! Confirms the payer actually holds enough of the asset to cover the authorization.

use crate::chain::ChainGateway;
use crate::error::ErrorCode;
use crate::proto::VerifyRequest;

use super::{VerificationResult, VerificationStep, Verifier};

#[derive(Debug, Default)]
pub struct UserBalanceVerifier;

impl<G: ChainGateway> Verifier<G> for UserBalanceVerifier {
    async fn verify(&self, gateway: &G, request: &VerifyRequest) -> VerificationResult {
        let requirements = &request.payment_requirements;
        let auth = &request.payment_payload.payload.authorization;

        match gateway
            .call_balance_of(&requirements.network, requirements.asset, auth.from)
            .await
        {
            Ok(balance) if balance < auth.value.value() => {
                VerificationResult::fail(ErrorCode::InsufficientFunds, "balance below authorization.value")
            }
            Ok(_) => VerificationResult::ok(),
            Err(_) => VerificationResult::fail(ErrorCode::Unknown, "balanceOf call failed"),
        }
    }

    fn step(&self) -> VerificationStep {
        VerificationStep::UserBalance
    }

    fn order(&self) -> u8 {
        5
    }
}
