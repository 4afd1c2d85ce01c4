//! Polymarket position merger
//!
//! Merges complementary YES/NO outcome tokens back into USDC through a
//! Gnosis Safe, for both regular and negative-risk markets.

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::{connect, MergeError, MergeExecutor};
pub use domain::{MarketKind, MergeRequest, MergeRequestError};
pub use infrastructure::{init_tracing, MergerConfig};

pub use ethers::types::TxHash;
