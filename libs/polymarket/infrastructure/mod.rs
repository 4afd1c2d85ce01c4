//! Infrastructure Layer
//!
//! Contains implementations of external interfaces (RPC provider, contracts, Safe).
//! This layer depends on the domain layer but not on the application layer.

pub mod client;
pub mod config;
pub mod logging;

// Re-export commonly used types from client
pub use client::{
    ChainError, ChainState, ExecutionParams, GnosisSafeExecutor, MergeCall, RpcChain, SafeError,
    SafeExecutor, TransactionPayload,
};

// Re-export config types
pub use config::{ConfigError, MergerConfig};

pub use logging::init_tracing;
