//! Gnosis Safe transaction execution
//!
//! Wraps an arbitrary contract call in `execTransaction` on a Safe owned by a
//! single EOA (threshold 1). The owner signs the EIP-712 `SafeTx` hash and the
//! same EOA submits the outer transaction and pays gas.
//!
//! # Concurrency Warning
//!
//! The Safe nonce is read right before signing. Two executions racing against
//! the same Safe can sign the same nonce and one of them will revert.

use async_trait::async_trait;
use ethers::abi::{encode, Token};
use ethers::contract::abigen;
use ethers::prelude::*;
use ethers::utils::keccak256;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use super::ctf::POLYGON_CHAIN_ID;

/// How long to wait for the receipt once the transaction is sent
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);

/// `operation` value for a plain CALL (1 would be DELEGATECALL)
const OPERATION_CALL: u8 = 0;

const DOMAIN_TYPE: &[u8] = b"EIP712Domain(uint256 chainId,address verifyingContract)";
const SAFE_TX_TYPE: &[u8] = b"SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)";

abigen!(
    GnosisSafe,
    r#"[
        function execTransaction(address to, uint256 value, bytes calldata data, uint8 operation, uint256 safeTxGas, uint256 baseGas, uint256 gasPrice, address gasToken, address payable refundReceiver, bytes memory signatures) external payable returns (bool success)
        function nonce() external view returns (uint256)
    ]"#
);

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum SafeError {
    #[error("Contract error: {0}")]
    ContractError(String),
    #[error("Signing error: {0}")]
    SigningError(String),
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    #[error("Timed out waiting for receipt. TX: {0:?}")]
    Timeout(TxHash),
}

pub type Result<T> = std::result::Result<T, SafeError>;

// =============================================================================
// Executor capability
// =============================================================================

/// Gas and nonce for the outer transaction sent by the owner EOA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionParams {
    pub gas_price: U256,
    pub gas_limit: U256,
    pub nonce: U256,
}

/// Signs and submits calls through a multisig wallet
///
/// Split in two steps so callers can log between submission and confirmation.
#[async_trait]
pub trait SafeExecutor: Send + Sync {
    /// Sign and submit `data` to `to` through the Safe. Returns the outer tx hash.
    async fn execute(&self, to: Address, data: Bytes, params: ExecutionParams) -> Result<TxHash>;

    /// Wait until `tx_hash` is mined and return its receipt.
    async fn confirm(&self, tx_hash: TxHash) -> Result<TransactionReceipt>;
}

// =============================================================================
// SafeTx hashing
// =============================================================================

/// The Safe's internal transaction, as signed by the owners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeTx {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: u8,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: U256,
}

impl SafeTx {
    /// Plain call with no value and no gas refund
    pub fn call(to: Address, data: Bytes, nonce: U256) -> Self {
        Self {
            to,
            value: U256::zero(),
            data,
            operation: OPERATION_CALL,
            safe_tx_gas: U256::zero(),
            base_gas: U256::zero(),
            gas_price: U256::zero(),
            gas_token: Address::zero(),
            refund_receiver: Address::zero(),
            nonce,
        }
    }

    fn struct_hash(&self) -> [u8; 32] {
        keccak256(encode(&[
            Token::FixedBytes(keccak256(SAFE_TX_TYPE).to_vec()),
            Token::Address(self.to),
            Token::Uint(self.value),
            Token::FixedBytes(keccak256(&self.data).to_vec()),
            Token::Uint(U256::from(self.operation)),
            Token::Uint(self.safe_tx_gas),
            Token::Uint(self.base_gas),
            Token::Uint(self.gas_price),
            Token::Address(self.gas_token),
            Token::Address(self.refund_receiver),
            Token::Uint(self.nonce),
        ]))
    }

    /// EIP-712 digest the owners sign
    pub fn signing_hash(&self, safe: Address, chain_id: u64) -> H256 {
        let domain_separator = keccak256(encode(&[
            Token::FixedBytes(keccak256(DOMAIN_TYPE).to_vec()),
            Token::Uint(U256::from(chain_id)),
            Token::Address(safe),
        ]));

        let mut digest_input = Vec::with_capacity(66);
        digest_input.extend_from_slice(&[0x19, 0x01]);
        digest_input.extend_from_slice(&domain_separator);
        digest_input.extend_from_slice(&self.struct_hash());

        H256::from(keccak256(&digest_input))
    }

    /// Owner signature in the 65-byte `r || s || v` layout `execTransaction` expects
    pub fn sign(&self, wallet: &LocalWallet, safe: Address, chain_id: u64) -> Result<Signature> {
        wallet
            .sign_hash(self.signing_hash(safe, chain_id))
            .map_err(|e| SafeError::SigningError(e.to_string()))
    }
}

// =============================================================================
// Gnosis Safe executor
// =============================================================================

/// [`SafeExecutor`] for a single-owner Gnosis Safe
pub struct GnosisSafeExecutor<M: Middleware> {
    safe: GnosisSafe<M>,
    safe_address: Address,
    owner: LocalWallet,
    provider: Arc<M>,
    confirmation_timeout: Duration,
}

impl<M: Middleware + 'static> GnosisSafeExecutor<M> {
    pub fn new(safe_address: Address, owner: LocalWallet, provider: Arc<M>) -> Self {
        Self {
            safe: GnosisSafe::new(safe_address, provider.clone()),
            safe_address,
            owner,
            provider,
            confirmation_timeout: CONFIRMATION_TIMEOUT,
        }
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }
}

#[async_trait]
impl<M: Middleware + 'static> SafeExecutor for GnosisSafeExecutor<M> {
    async fn execute(&self, to: Address, data: Bytes, params: ExecutionParams) -> Result<TxHash> {
        let safe_nonce = self
            .safe
            .nonce()
            .call()
            .await
            .map_err(|e| SafeError::ContractError(e.to_string()))?;

        let safe_tx = SafeTx::call(to, data, safe_nonce);
        let signature = safe_tx.sign(&self.owner, self.safe_address, POLYGON_CHAIN_ID)?;
        debug!("[Safe] Signed SafeTx nonce={} for {:?}", safe_nonce, self.safe_address);

        let call = self
            .safe
            .exec_transaction(
                safe_tx.to,
                safe_tx.value,
                safe_tx.data,
                safe_tx.operation,
                safe_tx.safe_tx_gas,
                safe_tx.base_gas,
                safe_tx.gas_price,
                safe_tx.gas_token,
                safe_tx.refund_receiver,
                signature.to_vec().into(),
            )
            .gas(params.gas_limit)
            .gas_price(params.gas_price)
            .nonce(params.nonce);

        let pending_tx = call
            .send()
            .await
            .map_err(|e| SafeError::ContractError(e.to_string()))?;

        let tx_hash = pending_tx.tx_hash();
        debug!(
            "[Safe] Transaction sent: {:?} (gas_price: {} gwei)",
            tx_hash,
            params.gas_price / U256::from(1_000_000_000u64)
        );
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<TransactionReceipt> {
        let pending_tx = PendingTransaction::new(tx_hash, self.provider.provider());

        let receipt = tokio::time::timeout(self.confirmation_timeout, pending_tx)
            .await
            .map_err(|_| SafeError::Timeout(tx_hash))?
            .map_err(|e| SafeError::TransactionFailed(e.to_string()))?
            .ok_or_else(|| SafeError::TransactionFailed(format!("No receipt. TX: {:?}", tx_hash)))?;

        if receipt.status == Some(U64::from(1)) {
            info!("[Safe] Transaction confirmed: {:?}", tx_hash);
            Ok(receipt)
        } else {
            Err(SafeError::TransactionFailed(format!(
                "Transaction reverted. TX: {:?}",
                tx_hash
            )))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
