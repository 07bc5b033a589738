//! Derives the `/supported` response from configured networks. Pure, no I/O.

use crate::config::NetworkInfo;
use crate::proto::{SupportedKind, SupportedResponse};

pub struct SupportedCatalog {
    kinds: Vec<SupportedKind>,
}

impl SupportedCatalog {
    pub fn from_networks(networks: &[NetworkInfo]) -> Self {
        let kinds = networks
            .iter()
            .map(|n| SupportedKind {
                x402_version: n.x402_version,
                scheme: n.scheme.clone(),
                network: n.name.clone(),
            })
            .collect();
        SupportedCatalog { kinds }
    }

    pub fn response(&self) -> SupportedResponse {
        SupportedResponse {
            kinds: self.kinds.clone(),
        }
    }
}
