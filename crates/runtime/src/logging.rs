//! Log subscriber setup.
//!
//! Libraries only emit `tracing` events; binaries and tests call [`init`] once
//! to print them. `RUST_LOG` overrides the default directive.
use tracing_subscriber::EnvFilter;

use crate::api::{Result, RuntimeError};

/// Directive used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init() -> Result<()> {
    init_with(DEFAULT_DIRECTIVE)
}

/// Like [`init`], falling back to `directive` when `RUST_LOG` is unset.
pub fn init_with(directive: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| RuntimeError::Logging(err.to_string()))?;
    tracing::debug!(directive, "logging initialized");
    Ok(())
}

/// Installs a subscriber that writes through the test harness capture.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported() {
        init_for_tests();
        assert!(matches!(init(), Err(RuntimeError::Logging(_))));
    }
}
