//! Polymarket Position Merger - Main Library
//!
//! This crate provides the main library for the position merger binary,
//! following Clean Architecture principles.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, outcome reporting)
//! - **polymarket**: Core merge logic (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use poly_merger::bin_common::{parse_args, parse_command, report, Command};
//! use poly_merger::polymarket::{connect, MergerConfig};
//! ```

// Re-export workspace libraries for convenience
pub use polymarket;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables
    //!
    //! Provides shared functionality for the presentation layer (binaries)
    //! following Clean Architecture principles.

    pub mod cli;
    pub mod runner;

    pub use cli::{parse_args, parse_command, Command, MergeArgs, USAGE};
    pub use runner::{report, EXIT_FAILURE, EXIT_SUCCESS};
}
