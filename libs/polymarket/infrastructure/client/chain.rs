//! Chain state reads needed before submitting a transaction.

use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::{Address, U256};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Provider error: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, ChainError>;

/// Read access to the account nonce and current gas price
///
/// Both values are read fresh on every call; implementations must not cache.
#[async_trait]
pub trait ChainState: Send + Sync {
    /// Transaction count (nonce) of `account`
    async fn transaction_count(&self, account: Address) -> Result<U256>;

    /// Current network gas price in wei
    async fn gas_price(&self) -> Result<U256>;
}

/// [`ChainState`] backed by a JSON-RPC provider
pub struct RpcChain<M: Middleware> {
    provider: Arc<M>,
}

impl<M: Middleware> RpcChain<M> {
    pub fn new(provider: Arc<M>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<M: Middleware + 'static> ChainState for RpcChain<M> {
    async fn transaction_count(&self, account: Address) -> Result<U256> {
        let nonce = self
            .provider
            .get_transaction_count(account, None)
            .await
            .map_err(|e| ChainError::Provider(format!("Failed to fetch nonce: {}", e)))?;
        debug!("[Chain] Nonce for {:?}: {}", account, nonce);
        Ok(nonce)
    }

    async fn gas_price(&self) -> Result<U256> {
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Provider(format!("Failed to fetch gas price: {}", e)))?;
        debug!("[Chain] Gas price: {} wei", gas_price);
        Ok(gas_price)
    }
}
