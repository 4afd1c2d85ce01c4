//! On-chain clients
//!
//! Contract encoding for CTF merges, chain state reads, and Gnosis Safe execution.

pub mod chain;
pub mod ctf;
pub mod safe;

pub use chain::{ChainError, ChainState, RpcChain};
pub use ctf::{
    MergeCall, TransactionPayload, BINARY_PARTITION, CTF_CONTRACT, MERGE_GAS_LIMIT,
    NEG_RISK_ADAPTER, POLYGON_CHAIN_ID, POLYGON_RPC_URL, USDC_ADDRESS,
};
pub use safe::{ExecutionParams, GnosisSafeExecutor, SafeError, SafeExecutor, SafeTx};
