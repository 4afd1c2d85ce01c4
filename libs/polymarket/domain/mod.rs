//! Domain Layer
//!
//! Contains pure business entities and domain models.
//! This layer has no dependencies on infrastructure or application layers.

pub mod merge;

pub use merge::{MarketKind, MergeRequest, MergeRequestError};
