//! Diagnostics for the logger itself.
//!
//! The crate reports its own lifecycle (file opened, rotation, archive
//! written, failed destination writes) through `tracing`. Applications that
//! want to see those events can install a subscriber here.
//!
//! # Example
//!
//! ```rust,no_run
//! use quicklog::diagnostics::init_diagnostics;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_diagnostics()?;
//!     // ... application code ...
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};

/// Filter applied when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "warn";

/// Install a `tracing` subscriber printing to stderr.
///
/// Filtering follows `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn init_diagnostics() -> Result<()> {
    init_diagnostics_with(DEFAULT_FILTER)
}

/// Install a `tracing` subscriber printing to stderr, falling back to
/// `default_filter` when `RUST_LOG` is not set.
pub fn init_diagnostics_with(default_filter: &str) -> Result<()> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    Ok(())
}
