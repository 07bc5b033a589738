//! Wires the verify pipeline, settle engine, and supported-kinds catalog behind one handle
//! shared by every HTTP handler.

use tokio_util::sync::CancellationToken;

use crate::catalog::SupportedCatalog;
use crate::chain::ChainGateway;
use crate::proto::{SettleRequest, SettleResponse, SupportedResponse, VerifyRequest, VerifyResponse};
use crate::settle::SettleEngine;
use crate::verify::VerifyPipeline;

pub struct Facilitator<G: ChainGateway> {
    gateway: G,
    pipeline: VerifyPipeline<G>,
    settle_engine: SettleEngine<G>,
    catalog: SupportedCatalog,
    shutdown: CancellationToken,
}

impl<G: ChainGateway + Sync> Facilitator<G> {
    pub fn new(
        gateway: G,
        pipeline: VerifyPipeline<G>,
        settle_engine: SettleEngine<G>,
        catalog: SupportedCatalog,
        shutdown: CancellationToken,
    ) -> Self {
        Facilitator {
            gateway,
            pipeline,
            settle_engine,
            catalog,
            shutdown,
        }
    }

    pub async fn verify(&self, request: &VerifyRequest) -> VerifyResponse {
        let cancel = self.shutdown.child_token();
        self.pipeline.run(&self.gateway, request, &cancel).await
    }

    pub async fn settle(&self, request: &SettleRequest) -> SettleResponse {
        let cancel = self.shutdown.child_token();
        self.settle_engine.settle(&self.gateway, request, &cancel).await
    }

    pub fn supported(&self) -> SupportedResponse {
        self.catalog.response()
    }
}
