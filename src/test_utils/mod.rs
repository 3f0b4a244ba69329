//! Test utilities for frontmatter-collection
//!
//! Helpers for writing content files into temporary projects and for
//! turning on logging inside tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use frontmatter_collection::test_utils::{ContentFixture, ContentProject};
//!
//! let project = ContentProject::new().unwrap();
//! project.add(&ContentFixture::post("hello", "Hello", "2024-01-01")).unwrap();
//! assert!(project.path().join("content/posts/hello.mdx").exists());
//! ```

pub mod fixtures;

pub use fixtures::{ContentFixture, ContentProject};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Installs a `tracing` subscriber once per test binary. With `level` set it
/// is used directly; otherwise `RUST_LOG` decides, and without either no
/// subscriber is installed.
///
/// ```bash
/// RUST_LOG=frontmatter_collection=debug cargo test
/// ```
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
            .with_ansi(true)
            .try_init();
    });
}
