//! In-memory [`ChainGateway`] double for pipeline- and settle-engine-level tests.
//!
//! Mirrors the spec's own "stub `ChainGateway`" testing language: no RPC endpoint required,
//! responses are configured per test via plain fields guarded by a `std::sync::Mutex`.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, B256, U256};
use tokio_util::sync::CancellationToken;

use super::{ChainGateway, ChainGatewayError, Receipt, ReceiptStatus};
use crate::hex_types::EvmSignature;

#[derive(Default)]
pub struct StubChainGateway {
    pub chain_ids: HashMap<String, U256>,
    pub code_at: HashMap<(String, Address), Vec<u8>>,
    pub balances: HashMap<(String, Address, Address), U256>,
    pub authorization_used: HashMap<(String, Address, Address, B256), bool>,
    pub send_result: Mutex<Option<Result<B256, String>>>,
    pub wait_result: Mutex<Option<Result<Receipt, String>>>,
    pub sent_calls: Mutex<Vec<(Address, Address, Address, U256)>>,
}

impl StubChainGateway {
    pub fn with_network(mut self, network: &str, chain_id: u64) -> Self {
        self.chain_ids
            .insert(network.to_string(), U256::from(chain_id));
        self
    }

    pub fn with_contract_code(mut self, network: &str, asset: Address, code: Vec<u8>) -> Self {
        self.code_at.insert((network.to_string(), asset), code);
        self
    }

    pub fn with_balance(mut self, network: &str, asset: Address, owner: Address, bal: U256) -> Self {
        self.balances
            .insert((network.to_string(), asset, owner), bal);
        self
    }

    pub fn with_authorization_state(
        mut self,
        network: &str,
        asset: Address,
        authorizer: Address,
        nonce: B256,
        used: bool,
    ) -> Self {
        self.authorization_used
            .insert((network.to_string(), asset, authorizer, nonce), used);
        self
    }

    pub fn with_send_result(self, result: Result<B256, String>) -> Self {
        *self.send_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_wait_result(self, result: Result<Receipt, String>) -> Self {
        *self.wait_result.lock().unwrap() = Some(result);
        self
    }
}

impl ChainGateway for StubChainGateway {
    fn chain_id(&self, network: &str) -> Result<U256, ChainGatewayError> {
        self.chain_ids
            .get(network)
            .copied()
            .ok_or_else(|| ChainGatewayError::NetworkNotConfigured(network.to_string()))
    }

    async fn code_at(&self, network: &str, address: Address) -> Result<Vec<u8>, ChainGatewayError> {
        self.chain_id(network)?;
        Ok(self
            .code_at
            .get(&(network.to_string(), address))
            .cloned()
            .unwrap_or_default())
    }

    async fn call_balance_of(
        &self,
        network: &str,
        asset: Address,
        owner: Address,
    ) -> Result<U256, ChainGatewayError> {
        self.chain_id(network)?;
        Ok(self
            .balances
            .get(&(network.to_string(), asset, owner))
            .copied()
            .unwrap_or_default())
    }

    async fn call_authorization_state(
        &self,
        network: &str,
        asset: Address,
        authorizer: Address,
        nonce: B256,
    ) -> Result<bool, ChainGatewayError> {
        self.chain_id(network)?;
        Ok(self
            .authorization_used
            .get(&(network.to_string(), asset, authorizer, nonce))
            .copied()
            .unwrap_or(false))
    }

    async fn send_transfer_with_authorization(
        &self,
        network: &str,
        _asset: Address,
        from: Address,
        to: Address,
        value: U256,
        _valid_after: U256,
        _valid_before: U256,
        _nonce: B256,
        _signature: EvmSignature,
    ) -> Result<B256, ChainGatewayError> {
        self.chain_id(network)?;
        self.sent_calls
            .lock()
            .unwrap()
            .push((from, to, _asset, value));
        match self.send_result.lock().unwrap().clone() {
            Some(Ok(hash)) => Ok(hash),
            Some(Err(msg)) => Err(ChainGatewayError::NetworkNotConfigured(msg)),
            None => Ok(B256::ZERO),
        }
    }

    async fn wait_mined(
        &self,
        network: &str,
        _tx_hash: B256,
        _cancel: &CancellationToken,
    ) -> Result<Receipt, ChainGatewayError> {
        self.chain_id(network)?;
        match self.wait_result.lock().unwrap().clone() {
            Some(Ok(receipt)) => Ok(receipt),
            Some(Err(msg)) => Err(ChainGatewayError::NetworkNotConfigured(msg)),
            None => Ok(Receipt {
                status: ReceiptStatus::Success,
                block_number: 1,
            }),
        }
    }
}
