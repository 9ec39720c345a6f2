//! Test utilities for tile-harness
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suite.
//!
//! - [`FakeCommandRunner`] stands in for `om` and `bosh`
//! - [`ProductFixture`] writes the documents a product config points at
//! - [`init_test_logging`] routes `tracing` output to the test writer
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tile_harness::product::ProductService;
//! use tile_harness::test_utils::{FakeCommandRunner, ProductFixture, om_env};
//!
//! let fixture = ProductFixture::basic().unwrap();
//! let fake = Arc::new(FakeCommandRunner::new());
//! let service = ProductService::with_environment(
//!     fixture.config("p-redis", "1.0.0"),
//!     om_env,
//!     fake.clone(),
//! )
//! .unwrap();
//! service.configure(&Default::default()).unwrap();
//! assert_eq!(fake.call_count(), 3);
//! ```

pub mod fake_runner;
pub mod fixtures;

pub use fake_runner::{FakeCommandRunner, Invocation};
pub use fixtures::{ProductFixture, TEST_OM_URL, om_env};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; does nothing when neither
/// is set. Safe to call from every test.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
