//! Integration test suite for tile-harness
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **migrate_cli**: `tile-harness migrate` end to end
//! - **product_cli**: `configure` / `render-manifest` against a fake `om` on `PATH`
//! - **product_service**: the library API driven through `FakeCommandRunner`

mod common;
mod migrate_cli;
mod product_cli;
mod product_service;
