//! Core types shared by every tile-harness module.
//!
//! At the moment this is the error layer: [`HarnessError`] for library results
//! and [`ErrorContext`] / [`user_friendly_error`] for what the binary prints.

pub mod error;

pub use error::{ErrorContext, HarnessError, user_friendly_error};

/// Result alias used across the library.
pub type Result<T, E = HarnessError> = std::result::Result<T, E>;
