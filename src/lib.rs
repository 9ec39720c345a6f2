//! tile-harness - property migrations and an om-driven staging harness
//!
//! Two independent pieces used when developing Ops Manager product tiles:
//!
//! - [`migration`] rewrites the legacy `networking_poe_ssl_cert` property into
//!   the `networking_poe_ssl_certs` list
//! - [`product`] drives the `om` CLI to stage and configure a product, then
//!   renders its manifest into a [`manifest::Manifest`] for test assertions
//!
//! # Modules
//!
//! - [`core`] - Error types and user-facing error rendering
//! - [`config`] - Product configuration and Ops Manager environment
//! - [`runner`] - The [`runner::CommandRunner`] seam and its process-backed
//!   implementation
//! - [`cli`] - The `tile-harness` command line
//!
//! # Environment
//!
//! The product driver requires `OM_USERNAME`, `OM_PASSWORD` and `OM_URL`.

pub mod cli;
pub mod config;
pub mod core;
pub mod manifest;
pub mod migration;
pub mod product;
pub mod runner;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
