//! Merge use case - turn YES + NO positions back into USDC via the Safe.
//!
//! One call to [`MergeExecutor::merge`] performs exactly one attempt:
//! build the call, read nonce and gas price, hand the call to the Safe
//! executor, wait for the receipt. Any failure is returned as-is; nothing is
//! retried and no later step runs after a failed one.

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TxHash};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::MergeRequest;
use crate::infrastructure::client::{
    ChainError, ChainState, ExecutionParams, GnosisSafeExecutor, MergeCall, RpcChain, SafeError,
    SafeExecutor, TransactionPayload,
};
use crate::infrastructure::config::{ConfigError, MergerConfig};

/// Provider that signs outer transactions with the owner wallet
pub type SignerProvider = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Executor wired to the real RPC endpoint and Safe
pub type LiveMergeExecutor = MergeExecutor<RpcChain<SignerProvider>, GnosisSafeExecutor<SignerProvider>>;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Safe(#[from] SafeError),
}

pub type Result<T> = std::result::Result<T, MergeError>;

/// Executes position merges through a multisig wallet
pub struct MergeExecutor<C: ChainState, E: SafeExecutor> {
    chain: C,
    executor: E,
    /// EOA that sends the outer transaction (its nonce is read before each merge)
    signer: Address,
}

impl<C: ChainState, E: SafeExecutor> MergeExecutor<C, E> {
    pub fn new(chain: C, executor: E, signer: Address) -> Self {
        Self {
            chain,
            executor,
            signer,
        }
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Build the full transaction for `request` using fresh nonce and gas price
    pub async fn prepare(&self, request: &MergeRequest) -> Result<TransactionPayload> {
        let call = MergeCall::from_request(request);

        let nonce = self.chain.transaction_count(self.signer).await?;
        let gas_price = self.chain.gas_price().await?;

        let payload = TransactionPayload::new(&call, nonce, gas_price);
        debug!(
            "[Merge] Payload: to={:?} chain_id={} nonce={} gas_price={} gas_limit={}",
            payload.to, payload.chain_id, payload.nonce, payload.gas_price, payload.gas_limit
        );
        Ok(payload)
    }

    /// Merge `request.amount` YES + NO tokens of one condition into collateral
    ///
    /// Returns the hash of the confirmed Safe transaction.
    pub async fn merge(&self, request: &MergeRequest) -> Result<TxHash> {
        info!(
            "[Merge] Merging {} tokens for condition {} ({} market)",
            request.amount,
            request.condition_id_hex(),
            request.market
        );

        let payload = self.prepare(request).await?;
        let params = ExecutionParams {
            gas_price: payload.gas_price,
            gas_limit: payload.gas_limit,
            nonce: payload.nonce,
        };

        info!("[Merge] Signing transaction");
        let tx_hash = self.executor.execute(payload.to, payload.data, params).await?;

        info!("[Merge] Transaction sent, waiting for confirmation: {:?}", tx_hash);
        let receipt = self.executor.confirm(tx_hash).await?;

        info!("[Merge] Merged positions: {:?}", receipt.transaction_hash);
        Ok(receipt.transaction_hash)
    }
}

/// Wire a [`MergeExecutor`] to the configured RPC endpoint and Safe
pub fn connect(config: &MergerConfig) -> Result<LiveMergeExecutor> {
    let wallet = config.wallet()?;
    let signer = wallet.address();

    let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
        .map_err(|e| MergeError::Provider(e.to_string()))?;
    let provider = Arc::new(SignerMiddleware::new(provider, wallet.clone()));

    let chain = RpcChain::new(provider.clone());
    let executor = GnosisSafeExecutor::new(config.safe_address, wallet, provider);

    Ok(MergeExecutor::new(chain, executor, signer))
}
