//! HTTP surface: `/verify`, `/settle`, `/supported`, `/health`.
//!
//! Semantic outcomes always return 200; 400 is reserved for JSON bodies that don't parse at all.

use std::sync::Arc;

use axum::extract::{rejection::JsonRejection, State};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;

use crate::chain::ChainGateway;
use crate::error::ErrorCode;
use crate::facilitator::Facilitator;
use crate::proto::{SettleRequest, VerifyRequest, VerifyResponse};

pub fn router<G: ChainGateway + Sync + Send + 'static>(facilitator: Arc<Facilitator<G>>) -> Router {
    Router::new()
        .route("/verify", post(verify::<G>))
        .route("/settle", post(settle::<G>))
        .route("/supported", get(supported::<G>))
        .route("/health", get(health))
        .with_state(facilitator)
}

async fn verify<G: ChainGateway + Sync + Send + 'static>(
    State(facilitator): State<Arc<Facilitator<G>>>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(json) => json,
        Err(rejection) => return verify_bind_failure_response(rejection),
    };
    let response = facilitator.verify(&request).await;
    axum::Json(response).into_response()
}

async fn settle<G: ChainGateway + Sync + Send + 'static>(
    State(facilitator): State<Arc<Facilitator<G>>>,
    body: Result<Json<SettleRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(json) => json,
        Err(rejection) => return settle_bind_failure_response(rejection),
    };
    let response = facilitator.settle(&request).await;
    axum::Json(response).into_response()
}

async fn supported<G: ChainGateway + Sync + Send + 'static>(
    State(facilitator): State<Arc<Facilitator<G>>>,
) -> Response {
    axum::Json(facilitator.supported()).into_response()
}

async fn health() -> Response {
    axum::Json(json!({"status": "ok"})).into_response()
}

/// `VerifyResponse`'s fields (`isValid`/`invalidReason`/`payer`) flattened alongside the bind
/// error, not nested under an envelope key — a client reading a `/verify` response only ever
/// looks at the top level. A body that fails to parse at all can't carry a `payer`, so the
/// best-effort echo is empty.
#[derive(serde::Serialize)]
struct VerifyBindFailureBody {
    error: &'static str,
    details: String,
    #[serde(flatten)]
    verify: VerifyResponse,
}

fn verify_bind_failure_response(rejection: JsonRejection) -> Response {
    tracing::warn!(error = %rejection, "request body failed to bind");
    let body = VerifyBindFailureBody {
        error: "Invalid request body",
        details: rejection.to_string(),
        verify: VerifyResponse::fail(ErrorCode::InvalidPayload, String::new()),
    };
    (axum::http::StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}

/// `/settle` carries no `VerifyResponse`-shaped payload on bind failure, unlike `/verify`: a
/// malformed settle body never gets far enough to have a scheme to re-verify.
fn settle_bind_failure_response(rejection: JsonRejection) -> Response {
    tracing::warn!(error = %rejection, "request body failed to bind");
    (
        axum::http::StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "Invalid request body",
            "details": rejection.to_string(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SupportedCatalog;
    use crate::chain::stub::StubChainGateway;
    use crate::settle::SettleEngine;
    use crate::verify::balance::UserBalanceVerifier;
    use crate::verify::eip3009_asset::Eip3009AssetVerifier;
    use crate::verify::global::GlobalVerifier;
    use crate::verify::payment_context::PaymentContextVerifier;
    use crate::verify::signature::SignatureVerifier;
    use crate::verify::VerifyPipeline;
    use axum::body::Body;
    use axum::http::Request;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let gateway = StubChainGateway::default();
        let pipeline = VerifyPipeline::standard(
            GlobalVerifier,
            PaymentContextVerifier,
            Eip3009AssetVerifier,
            SignatureVerifier,
            UserBalanceVerifier,
        );
        let settle_pipeline = VerifyPipeline::standard(
            GlobalVerifier,
            PaymentContextVerifier,
            Eip3009AssetVerifier,
            SignatureVerifier,
            UserBalanceVerifier,
        );
        let facilitator = Arc::new(Facilitator::new(
            gateway,
            pipeline,
            SettleEngine::new(settle_pipeline),
            SupportedCatalog::from_networks(&[]),
            CancellationToken::new(),
        ));
        router(facilitator)
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = test_app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn verify_returns_400_on_malformed_body() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::post("/verify")
                    .header("content-type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["isValid"], false);
        assert_eq!(body["invalidReason"], "INVALID_PAYLOAD");
        assert_eq!(body["payer"], "");
        assert!(body.get("verify").is_none());
    }

    #[tokio::test]
    async fn settle_bind_failure_omits_verify_payload() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::post("/settle")
                    .header("content-type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert!(body.get("isValid").is_none());
        assert!(body.get("verify").is_none());
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn supported_returns_200_with_empty_kinds() {
        let app = test_app();
        let response = app
            .oneshot(Request::get("/supported").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
