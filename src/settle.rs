//! Drives a validated request through broadcast and on-chain confirmation.

use tokio_util::sync::CancellationToken;

use crate::chain::{ChainGateway, ChainGatewayError, ReceiptStatus};
use crate::error::ErrorCode;
use crate::proto::{address_to_string, SettleRequest, SettleResponse};
use crate::verify::VerifyPipeline;

/// Settles a request that has already passed [`VerifyPipeline`] (settle re-verifies first, since
/// a request can arrive at `/settle` without a prior `/verify` call).
pub struct SettleEngine<G: ChainGateway> {
    pipeline: VerifyPipeline<G>,
}

impl<G: ChainGateway + Sync> SettleEngine<G> {
    pub fn new(pipeline: VerifyPipeline<G>) -> Self {
        SettleEngine { pipeline }
    }

    pub async fn settle(
        &self,
        gateway: &G,
        request: &SettleRequest,
        cancel: &CancellationToken,
    ) -> SettleResponse {
        let network = request.payment_payload.network.clone();
        let payer = address_to_string(request.payment_payload.payload.authorization.from);

        let verdict = self.pipeline.run(gateway, request, cancel).await;
        if !verdict.is_valid {
            let code = verdict.invalid_reason.unwrap_or(ErrorCode::Unknown);
            tracing::warn!(%network, %payer, error_code = %code, "settle rejected at verification");
            return SettleResponse {
                success: false,
                error_reason: Some(code),
                transaction: None,
                network,
                payer,
            };
        }

        let requirements = &request.payment_requirements;
        let auth = &request.payment_payload.payload.authorization;

        // chain_id for signing is resolved inside the gateway's provider stack, not from the
        // payload: gateway state is authoritative by the time a request reaches settlement.
        tracing::info!(%network, %payer, "broadcasting transferWithAuthorization");
        let tx_hash = match gateway
            .send_transfer_with_authorization(
                &network,
                requirements.asset,
                auth.from,
                auth.to,
                auth.value.value(),
                auth.valid_after.value(),
                auth.valid_before.value(),
                auth.nonce,
                request.payment_payload.payload.signature,
            )
            .await
        {
            Ok(hash) => hash,
            Err(_) => {
                tracing::warn!(%network, %payer, "transferWithAuthorization reverted on send");
                return errored(ErrorCode::InvalidTransactionState, network, payer);
            }
        };

        tracing::info!(%network, %payer, tx_hash = %tx_hash, "waiting for receipt");
        match gateway.wait_mined(&network, tx_hash, cancel).await {
            Ok(receipt) if receipt.status == ReceiptStatus::Success => {
                tracing::info!(%network, %payer, tx_hash = %tx_hash, "settled");
                SettleResponse {
                    success: true,
                    error_reason: None,
                    transaction: Some(format!("{tx_hash:#x}")),
                    network,
                    payer,
                }
            }
            Ok(_failed_receipt) => {
                tracing::warn!(%network, %payer, tx_hash = %tx_hash, "receipt reports failure");
                errored(ErrorCode::InvalidTransactionState, network, payer)
            }
            Err(ChainGatewayError::Cancelled) => {
                tracing::warn!(%network, %payer, "settle cancelled while awaiting receipt");
                errored(ErrorCode::UnexpectedSettleError, network, payer)
            }
            Err(_) => {
                tracing::error!(%network, %payer, "error waiting for receipt");
                errored(ErrorCode::UnexpectedSettleError, network, payer)
            }
        }
    }
}

fn errored(code: ErrorCode, network: String, payer: String) -> SettleResponse {
    SettleResponse {
        success: false,
        error_reason: Some(code),
        transaction: None,
        network,
        payer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::stub::StubChainGateway;
    use crate::chain::Receipt;
    use crate::verify::balance::UserBalanceVerifier;
    use crate::verify::eip3009_asset::Eip3009AssetVerifier;
    use crate::verify::global::GlobalVerifier;
    use crate::verify::payment_context::PaymentContextVerifier;
    use crate::verify::signature::SignatureVerifier;
    use alloy_primitives::{B256, U256};
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;

    #[path = "verify/global_test_fixture.rs"]
    mod fixture;

    fn signed_request() -> SettleRequest {
        let signer = PrivateKeySigner::random();
        let mut req = fixture::sample_request();
        req.payment_payload.payload.authorization.from = signer.address();
        let hash = crate::crypto::eip3009::hash(
            U256::from(84532u64),
            req.payment_requirements.asset,
            &req.payment_requirements.extra.name,
            &req.payment_requirements.extra.version,
            &crate::crypto::eip3009::TransferWithAuthorization {
                from: req.payment_payload.payload.authorization.from,
                to: req.payment_payload.payload.authorization.to,
                value: req.payment_payload.payload.authorization.value.value(),
                valid_after: req.payment_payload.payload.authorization.valid_after.value(),
                valid_before: req.payment_payload.payload.authorization.valid_before.value(),
                nonce: req.payment_payload.payload.authorization.nonce,
            },
        );
        let sig = signer.sign_hash_sync(&hash).unwrap();
        req.payment_payload.payload.signature = crate::hex_types::EvmSignature(sig.as_bytes());
        req
    }

    fn standard_pipeline() -> VerifyPipeline<StubChainGateway> {
        VerifyPipeline::standard(
            GlobalVerifier,
            PaymentContextVerifier,
            Eip3009AssetVerifier,
            SignatureVerifier,
            UserBalanceVerifier,
        )
    }

    #[tokio::test]
    async fn settles_successfully_on_valid_request() {
        let req = signed_request();
        let auth = &req.payment_payload.payload.authorization;
        let gateway = StubChainGateway::default()
            .with_network("base-sepolia", 84532)
            .with_contract_code("base-sepolia", req.payment_requirements.asset, vec![0x60])
            .with_balance(
                "base-sepolia",
                req.payment_requirements.asset,
                auth.from,
                U256::from(5000u64),
            )
            .with_send_result(Ok(B256::with_last_byte(0xab)))
            .with_wait_result(Ok(Receipt {
                status: ReceiptStatus::Success,
                block_number: 100,
            }));

        let engine = SettleEngine::new(standard_pipeline());
        let resp = engine
            .settle(&gateway, &req, &CancellationToken::new())
            .await;
        assert!(resp.success);
        assert!(resp.transaction.is_some());
    }

    #[tokio::test]
    async fn rejects_without_broadcasting_when_verification_fails() {
        let req = signed_request();
        let gateway = StubChainGateway::default(); // no network configured -> fails PaymentContextVerifier
        let engine = SettleEngine::new(standard_pipeline());
        let resp = engine
            .settle(&gateway, &req, &CancellationToken::new())
            .await;
        assert!(!resp.success);
        assert_eq!(resp.error_reason, Some(ErrorCode::InvalidNetwork));
        assert!(resp.transaction.is_none());
    }

    #[tokio::test]
    async fn maps_failed_receipt_to_invalid_transaction_state() {
        let req = signed_request();
        let auth = &req.payment_payload.payload.authorization;
        let gateway = StubChainGateway::default()
            .with_network("base-sepolia", 84532)
            .with_contract_code("base-sepolia", req.payment_requirements.asset, vec![0x60])
            .with_balance(
                "base-sepolia",
                req.payment_requirements.asset,
                auth.from,
                U256::from(5000u64),
            )
            .with_send_result(Ok(B256::with_last_byte(0xab)))
            .with_wait_result(Ok(Receipt {
                status: ReceiptStatus::Failed,
                block_number: 100,
            }));

        let engine = SettleEngine::new(standard_pipeline());
        let resp = engine
            .settle(&gateway, &req, &CancellationToken::new())
            .await;
        assert!(!resp.success);
        assert_eq!(resp.error_reason, Some(ErrorCode::InvalidTransactionState));
    }
}
