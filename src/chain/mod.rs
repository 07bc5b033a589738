//! Per-network RPC client registry and the EIP-3009 contract calls this facilitator makes.

pub mod asset;
#[cfg(test)]
pub mod stub;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy_network::{Ethereum, EthereumWallet};
use alloy_primitives::{Address, B256, U256};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use asset::IEip3009Token;

/// One network's dialed RPC client plus the chain id it was configured with.
///
/// `chain_id` comes from configuration, not from a live `eth_chainId` call: the gateway is the
/// single source of truth a verifier or the settle engine consults, never the request payload.
struct NetworkHandle {
    provider: DynProvider,
    chain_id: U256,
    rpc_url: String,
}

/// The outcome of waiting for a submitted transaction to land on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy)]
pub struct Receipt {
    pub status: ReceiptStatus,
    pub block_number: u64,
}

#[derive(Debug, Error)]
pub enum ChainGatewayError {
    #[error("network {0:?} is not configured")]
    NetworkNotConfigured(String),
    #[error("failed to dial {rpc_url:?} for network {network:?}: {source}")]
    Dial {
        network: String,
        rpc_url: String,
        #[source]
        source: alloy_transport::TransportError,
    },
    #[error("rpc call failed: {0}")]
    Rpc(#[from] alloy_contract::Error),
    #[error("transport error: {0}")]
    Transport(#[from] alloy_transport::TransportError),
    #[error("wait for transaction receipt was cancelled")]
    Cancelled,
    #[error("transaction {0} was never mined")]
    NeverMined(B256),
    #[error("error waiting for transaction receipt: {0}")]
    Wait(String),
}

/// What the verify pipeline and the settle engine need from the chain.
///
/// Methods take `&self` and a network name rather than a pre-resolved client handle: callers
/// never see the registry's internals, only the network string already present on every request.
/// Implemented with native `impl Future` returns (no `async-trait`), so this trait is generic-only
/// — callers are written against a concrete type or a type parameter, never `dyn ChainGateway`.
pub trait ChainGateway {
    fn chain_id(&self, network: &str) -> Result<U256, ChainGatewayError>;

    fn code_at(
        &self,
        network: &str,
        address: Address,
    ) -> impl Future<Output = Result<Vec<u8>, ChainGatewayError>> + Send;

    fn call_balance_of(
        &self,
        network: &str,
        asset: Address,
        owner: Address,
    ) -> impl Future<Output = Result<U256, ChainGatewayError>> + Send;

    fn call_authorization_state(
        &self,
        network: &str,
        asset: Address,
        authorizer: Address,
        nonce: B256,
    ) -> impl Future<Output = Result<bool, ChainGatewayError>> + Send;

    fn send_transfer_with_authorization(
        &self,
        network: &str,
        asset: Address,
        from: Address,
        to: Address,
        value: U256,
        valid_after: U256,
        valid_before: U256,
        nonce: B256,
        signature: crate::hex_types::EvmSignature,
    ) -> impl Future<Output = Result<B256, ChainGatewayError>> + Send;

    fn wait_mined(
        &self,
        network: &str,
        tx_hash: B256,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Receipt, ChainGatewayError>> + Send;
}

/// Configuration needed to dial one network, as read from [`crate::config::Config`].
pub struct NetworkDialConfig {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
}

/// Live EVM implementation of [`ChainGateway`], backed by one `alloy` provider per network.
///
/// `DynProvider` erases the filler/wallet stack `ProviderBuilder` assembles, so the registry can
/// hold one homogeneous map instead of a distinct generic type per network.
pub struct EvmChainGateway {
    networks: HashMap<String, NetworkHandle>,
    /// Transactions broadcast but not yet confirmed, keyed by hash. `send_transfer_with_authorization`
    /// inserts the `PendingTransactionBuilder` alloy hands back from `.send()`; `wait_mined` removes
    /// it and polls it to completion via `get_receipt()`, the same handle the teacher's
    /// `facilitator_local.rs` retains across its own send/receipt split.
    pending: Mutex<HashMap<B256, PendingTransactionBuilder<Ethereum>>>,
}

impl EvmChainGateway {
    /// Dials every configured network with the facilitator's single signing key. Fails closed:
    /// the first network that won't dial aborts the whole gateway.
    pub async fn dial(
        networks: &[NetworkDialConfig],
        signer: PrivateKeySigner,
    ) -> Result<Self, ChainGatewayError> {
        let wallet = EthereumWallet::from(signer);
        let mut map = HashMap::with_capacity(networks.len());
        for net in networks {
            let url = net
                .rpc_url
                .parse()
                .map_err(|_| ChainGatewayError::NetworkNotConfigured(net.name.clone()))?;
            let provider = ProviderBuilder::new()
                .wallet(wallet.clone())
                .connect_http(url);
            let erased = DynProvider::new(provider);
            // Touch the endpoint once at startup so a bad RPC URL fails fast, not on first use.
            erased
                .get_block_number()
                .await
                .map_err(|source| ChainGatewayError::Dial {
                    network: net.name.clone(),
                    rpc_url: net.rpc_url.clone(),
                    source,
                })?;
            map.insert(
                net.name.clone(),
                NetworkHandle {
                    provider: erased,
                    chain_id: U256::from(net.chain_id),
                    rpc_url: net.rpc_url.clone(),
                },
            );
        }
        Ok(EvmChainGateway {
            networks: map,
            pending: Mutex::new(HashMap::new()),
        })
    }

    fn handle(&self, network: &str) -> Result<&NetworkHandle, ChainGatewayError> {
        self.networks
            .get(network)
            .ok_or_else(|| ChainGatewayError::NetworkNotConfigured(network.to_string()))
    }

    /// The RPC URL a network was dialed with, for diagnostics/logging only.
    pub fn rpc_url(&self, network: &str) -> Result<&str, ChainGatewayError> {
        self.handle(network).map(|h| h.rpc_url.as_str())
    }
}

impl ChainGateway for EvmChainGateway {
    fn chain_id(&self, network: &str) -> Result<U256, ChainGatewayError> {
        self.handle(network).map(|h| h.chain_id)
    }

    async fn code_at(
        &self,
        network: &str,
        address: Address,
    ) -> Result<Vec<u8>, ChainGatewayError> {
        let handle = self.handle(network)?;
        let code = handle.provider.get_code_at(address).await?;
        Ok(code.to_vec())
    }

    async fn call_balance_of(
        &self,
        network: &str,
        asset: Address,
        owner: Address,
    ) -> Result<U256, ChainGatewayError> {
        let handle = self.handle(network)?;
        let token = IEip3009Token::new(asset, Arc::new(handle.provider.clone()));
        let balance = token.balanceOf(owner).call().await?;
        Ok(balance)
    }

    async fn call_authorization_state(
        &self,
        network: &str,
        asset: Address,
        authorizer: Address,
        nonce: B256,
    ) -> Result<bool, ChainGatewayError> {
        let handle = self.handle(network)?;
        let token = IEip3009Token::new(asset, Arc::new(handle.provider.clone()));
        let used = token.authorizationState(authorizer, nonce).call().await?;
        Ok(used)
    }

    async fn send_transfer_with_authorization(
        &self,
        network: &str,
        asset: Address,
        from: Address,
        to: Address,
        value: U256,
        valid_after: U256,
        valid_before: U256,
        nonce: B256,
        signature: crate::hex_types::EvmSignature,
    ) -> Result<B256, ChainGatewayError> {
        let handle = self.handle(network)?;
        let token = IEip3009Token::new(asset, Arc::new(handle.provider.clone()));
        let pending_tx = token
            .transferWithAuthorization(
                from,
                to,
                value,
                valid_after,
                valid_before,
                nonce,
                signature.as_bytes().to_vec().into(),
            )
            .send()
            .await?;
        let tx_hash = *pending_tx.tx_hash();
        self.pending.lock().unwrap().insert(tx_hash, pending_tx);
        Ok(tx_hash)
    }

    async fn wait_mined(
        &self,
        network: &str,
        tx_hash: B256,
        cancel: &CancellationToken,
    ) -> Result<Receipt, ChainGatewayError> {
        self.handle(network)?;
        let pending_tx = self
            .pending
            .lock()
            .unwrap()
            .remove(&tx_hash)
            .ok_or(ChainGatewayError::NeverMined(tx_hash))?;

        // `get_receipt()` actually waits for inclusion (alloy polls/watches internally), unlike a
        // single `get_transaction_receipt` call, which would return `None` immediately after send.
        let receipt = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ChainGatewayError::Cancelled),
            result = pending_tx.get_receipt() => {
                result.map_err(|e| ChainGatewayError::Wait(e.to_string()))?
            }
        };

        Ok(Receipt {
            status: if receipt.status() {
                ReceiptStatus::Success
            } else {
                ReceiptStatus::Failed
            },
            block_number: receipt.block_number.unwrap_or_default(),
        })
    }
}
