//! Application Layer
//!
//! Contains use cases and application services.
//! This layer depends on domain and infrastructure layers.

pub mod merge;

pub use merge::{connect, LiveMergeExecutor, MergeError, MergeExecutor, SignerProvider};
