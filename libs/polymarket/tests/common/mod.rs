//! Common test utilities for merge tests
//!
//! Recording stand-ins for the chain and the Safe so the merge flow can run
//! without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, TxHash, H256, U256};
use parking_lot::Mutex;
use polymarket::infrastructure::client::chain::{self, ChainError, ChainState};
use polymarket::infrastructure::client::safe::{self, ExecutionParams, SafeError, SafeExecutor};
use std::sync::Arc;

pub const NETWORK_NONCE: u64 = 9;
pub const NETWORK_GAS_PRICE: u64 = 42_000_000_000;

pub fn signer() -> Address {
    Address::repeat_byte(0x11)
}

pub fn submitted_hash() -> TxHash {
    H256::repeat_byte(0xcd)
}

/// How the mocked collaborators should behave
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Failure {
    #[default]
    None,
    Nonce,
    GasPrice,
    Execute,
    Confirm,
}

/// One `execute` invocation as seen by the Safe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteCall {
    pub to: Address,
    pub data: Bytes,
    pub params: ExecutionParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Nonce(Address),
    GasPrice,
    Execute,
    Confirm(TxHash),
}

/// Shared log of everything the mocks were asked to do
#[derive(Default)]
pub struct CallLog {
    pub events: Mutex<Vec<Event>>,
    pub executions: Mutex<Vec<ExecuteCall>>,
}

impl CallLog {
    pub fn count(&self, matcher: impl Fn(&Event) -> bool) -> usize {
        self.events.lock().iter().filter(|e| matcher(e)).count()
    }

    pub fn execute_count(&self) -> usize {
        self.executions.lock().len()
    }

    pub fn confirm_count(&self) -> usize {
        self.count(|e| matches!(e, Event::Confirm(_)))
    }

    pub fn last_execution(&self) -> Option<ExecuteCall> {
        self.executions.lock().last().cloned()
    }
}

pub struct MockChain {
    pub log: Arc<CallLog>,
    pub failure: Failure,
}

#[async_trait]
impl ChainState for MockChain {
    async fn transaction_count(&self, account: Address) -> chain::Result<U256> {
        self.log.events.lock().push(Event::Nonce(account));
        if self.failure == Failure::Nonce {
            return Err(ChainError::Provider("connection refused".to_string()));
        }
        Ok(U256::from(NETWORK_NONCE))
    }

    async fn gas_price(&self) -> chain::Result<U256> {
        self.log.events.lock().push(Event::GasPrice);
        if self.failure == Failure::GasPrice {
            return Err(ChainError::Provider("rate limited".to_string()));
        }
        Ok(U256::from(NETWORK_GAS_PRICE))
    }
}

pub struct MockSafe {
    pub log: Arc<CallLog>,
    pub failure: Failure,
}

#[async_trait]
impl SafeExecutor for MockSafe {
    async fn execute(&self, to: Address, data: Bytes, params: ExecutionParams) -> safe::Result<TxHash> {
        self.log.events.lock().push(Event::Execute);
        self.log.executions.lock().push(ExecuteCall { to, data, params });
        if self.failure == Failure::Execute {
            return Err(SafeError::ContractError("GS013: Safe transaction failed".to_string()));
        }
        Ok(submitted_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> safe::Result<TransactionReceipt> {
        self.log.events.lock().push(Event::Confirm(tx_hash));
        if self.failure == Failure::Confirm {
            return Err(SafeError::Timeout(tx_hash));
        }
        Ok(TransactionReceipt {
            transaction_hash: tx_hash,
            status: Some(1u64.into()),
            ..Default::default()
        })
    }
}

/// Build mocks that share one call log
pub fn mocks(failure: Failure) -> (MockChain, MockSafe, Arc<CallLog>) {
    let log = Arc::new(CallLog::default());
    (
        MockChain {
            log: log.clone(),
            failure,
        },
        MockSafe {
            log: log.clone(),
            failure,
        },
        log,
    )
}
