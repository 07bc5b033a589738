//! The ordered chain of checks a payment payload must clear before it is valid or settleable.

pub mod balance;
pub mod eip3009_asset;
pub mod global;
pub mod payment_context;
pub mod signature;

use tokio_util::sync::CancellationToken;

use crate::chain::ChainGateway;
use crate::error::ErrorCode;
use crate::proto::{address_to_string, VerifyRequest, VerifyResponse};

/// Which stage of the pipeline produced a result, echoed into logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStep {
    Global,
    PaymentContext,
    Eip3009Asset,
    Signature,
    UserBalance,
}

impl VerificationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStep::Global => "global",
            VerificationStep::PaymentContext => "payment_context",
            VerificationStep::Eip3009Asset => "eip3009_asset",
            VerificationStep::Signature => "signature",
            VerificationStep::UserBalance => "user_balance",
        }
    }
}

#[derive(Debug, Clone)]
pub enum VerificationResult {
    Ok,
    Fail {
        error_code: ErrorCode,
        message: String,
    },
}

impl VerificationResult {
    pub fn ok() -> Self {
        VerificationResult::Ok
    }

    pub fn fail(error_code: ErrorCode, message: impl Into<String>) -> Self {
        VerificationResult::Fail {
            error_code,
            message: message.into(),
        }
    }
}

/// One stage of the verify pipeline. Stateless with respect to request data: implementors hold
/// only immutable references to collaborators such as the chain gateway.
pub trait Verifier<G: ChainGateway> {
    fn verify(
        &self,
        gateway: &G,
        request: &VerifyRequest,
    ) -> impl Future<Output = VerificationResult> + Send;

    fn step(&self) -> VerificationStep;

    fn order(&self) -> u8;
}

/// The five verifiers run in ascending [`Verifier::order`], short-circuiting on first failure.
///
/// Order is part of the wire contract: clients rely on cheapest-then-most-revealing failure
/// causes, so callers must construct this with all five verifiers, not a subset.
pub struct VerifyPipeline<G: ChainGateway> {
    verifiers: Vec<Box<dyn ErasedVerifier<G>>>,
}

/// Object-safe wrapper so heterogeneous verifier types can share one `Vec`.
///
/// [`Verifier`] itself can't be boxed as `dyn` because of its `impl Future` return; this trait
/// boxes the future instead, at the cost of one allocation per verify call.
pub(crate) trait ErasedVerifier<G: ChainGateway>: Send + Sync {
    fn verify<'a>(
        &'a self,
        gateway: &'a G,
        request: &'a VerifyRequest,
    ) -> std::pin::Pin<Box<dyn Future<Output = VerificationResult> + Send + 'a>>;

    fn step(&self) -> VerificationStep;

    fn order(&self) -> u8;
}

impl<G: ChainGateway + Sync, V: Verifier<G> + Send + Sync> ErasedVerifier<G> for V {
    fn verify<'a>(
        &'a self,
        gateway: &'a G,
        request: &'a VerifyRequest,
    ) -> std::pin::Pin<Box<dyn Future<Output = VerificationResult> + Send + 'a>> {
        Box::pin(Verifier::verify(self, gateway, request))
    }

    fn step(&self) -> VerificationStep {
        Verifier::step(self)
    }

    fn order(&self) -> u8 {
        Verifier::order(self)
    }
}

impl<G: ChainGateway + Sync> VerifyPipeline<G> {
    pub(crate) fn new(verifiers: Vec<Box<dyn ErasedVerifier<G>>>) -> Self {
        let mut verifiers = verifiers;
        verifiers.sort_by_key(|v| v.order());
        VerifyPipeline { verifiers }
    }

    /// Builds the pipeline from the five verifiers in their fixed, contractual order.
    pub fn standard(
        global: global::GlobalVerifier,
        payment_context: payment_context::PaymentContextVerifier,
        eip3009_asset: eip3009_asset::Eip3009AssetVerifier,
        signature: signature::SignatureVerifier,
        user_balance: balance::UserBalanceVerifier,
    ) -> Self {
        Self::new(vec![
            Box::new(global),
            Box::new(payment_context),
            Box::new(eip3009_asset),
            Box::new(signature),
            Box::new(user_balance),
        ])
    }

    pub async fn run(
        &self,
        gateway: &G,
        request: &VerifyRequest,
        cancel: &CancellationToken,
    ) -> VerifyResponse {
        let payer = address_to_string(request.payment_payload.payload.authorization.from);
        for verifier in &self.verifiers {
            if cancel.is_cancelled() {
                return VerifyResponse::fail(ErrorCode::Unknown, payer);
            }
            match verifier.verify(gateway, request).await {
                VerificationResult::Ok => {
                    tracing::debug!(step = verifier.step().as_str(), %payer, "verifier passed");
                }
                VerificationResult::Fail { error_code, message } => {
                    tracing::warn!(
                        step = verifier.step().as_str(),
                        %payer,
                        error_code = %error_code,
                        message,
                        "verifier failed"
                    );
                    return VerifyResponse::fail(error_code, payer);
                }
            }
        }
        VerifyResponse::ok(payer)
    }
}
