//! x402 facilitator HTTP entrypoint.
//!
//! Endpoints:
//! - `POST /verify` – verify a payment payload against requirements
//! - `POST /settle` – settle an accepted payment payload on-chain
//! - `GET /supported` – list supported `{x402Version, scheme, network}` kinds
//! - `GET /health` – liveness probe
//!
//! Environment:
//! - `.env` values loaded at startup (best-effort)
//! - `X402_FACILITATOR_PRIVATE_KEY` (required): facilitator signing key
//! - `CONFIG_PATH` (optional): override for `config.yaml`'s location
//! - `RUST_LOG` (optional): overrides `logging.level` from `config.yaml`

mod bigint;
mod catalog;
mod chain;
mod config;
mod crypto;
mod error;
mod facilitator;
mod handlers;
mod hex_types;
mod proto;
mod request_id;
mod settle;
mod sig_down;
mod verify;

use std::net::SocketAddr;
use std::sync::Arc;

use alloy_signer_local::PrivateKeySigner;
use axum::http::Method;
use dotenvy::dotenv;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::catalog::SupportedCatalog;
use crate::chain::{EvmChainGateway, NetworkDialConfig};
use crate::config::Config;
use crate::facilitator::Facilitator;
use crate::request_id::MakeUuidV4RequestId;
use crate::settle::SettleEngine;
use crate::sig_down::SigDown;
use crate::verify::balance::UserBalanceVerifier;
use crate::verify::eip3009_asset::Eip3009AssetVerifier;
use crate::verify::global::GlobalVerifier;
use crate::verify::payment_context::PaymentContextVerifier;
use crate::verify::signature::SignatureVerifier;
use crate::verify::VerifyPipeline;

fn init_logging(logging: &config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format.as_str() {
        "console" => builder.pretty().init(),
        _ => builder.json().init(),
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    let dial_configs: Vec<NetworkDialConfig> = config
        .networks
        .iter()
        .map(|n| NetworkDialConfig {
            name: n.name.clone(),
            rpc_url: n.rpc_url.clone(),
            chain_id: n.chain_id,
        })
        .collect();

    let signer = PrivateKeySigner::from_bytes(&config.private_key.0).unwrap_or_else(|err| {
        tracing::error!("invalid facilitator private key: {err}");
        std::process::exit(1);
    });

    let gateway = match EvmChainGateway::dial(&dial_configs, signer).await {
        Ok(gateway) => gateway,
        Err(err) => {
            tracing::error!("failed to dial configured networks: {err}");
            std::process::exit(1);
        }
    };

    let sig_down = match SigDown::try_new() {
        Ok(sig_down) => sig_down,
        Err(err) => {
            tracing::error!("failed to install signal handlers: {err}");
            std::process::exit(1);
        }
    };
    let shutdown_token = sig_down.cancellation_token();

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
    let catalog = SupportedCatalog::from_networks(&config.networks);

    let facilitator = Arc::new(Facilitator::new(
        gateway,
        pipeline,
        SettleEngine::new(settle_pipeline),
        catalog,
        shutdown_token.clone(),
    ));

    // Axum wraps outer-to-inner in reverse call order, so this reads innermost-first: the
    // request id is propagated onto the response just before reaching the router, traced,
    // stamped, CORS-handled, and finally wrapped in panic recovery as the outermost layer.
    let request_id_header = axum::http::HeaderName::from_static("x-request-id");
    let app = handlers::router(facilitator)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeUuidV4RequestId,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(cors::Any),
        )
        .layer(CatchPanicLayer::new());

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .unwrap_or_else(|_| "0.0.0.0".parse().unwrap()),
        config.server.port as u16,
    );
    tracing::info!("starting server at http://{addr}");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind to {addr}: {err}");
            std::process::exit(1);
        }
    };

    let graceful_shutdown = async move { shutdown_token.cancelled().await };
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown)
        .await
    {
        tracing::error!("server error: {err}");
        std::process::exit(1);
    }
}
