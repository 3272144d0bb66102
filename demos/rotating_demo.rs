//! Example: leveled logging with a daily rotating file.
//!
//! # Run the demo
//! ```bash
//! RUST_LOG=quicklog=debug cargo run --example rotating_demo -- /tmp/quicklog-demo/
//! ```
//!
//! Lines appear on stdout and in `/tmp/quicklog-demo/current.log`; closing
//! the logger leaves a `<date>_<n>.log.gz` archive next to it.

use anyhow::Result;
use quicklog::diagnostics::init_diagnostics;
use quicklog::{debugf, errorf, infof, tracef, warnf, Config, LogLevel, Logger};

fn main() -> Result<()> {
    init_diagnostics()?;

    let dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./logs/".to_string());

    let config = match std::env::var("QUICKLOG_CONFIG") {
        Ok(path) => Config::from_json_file(path)?,
        Err(_) => Config::default().label("demo").level(LogLevel::Trace),
    };

    let mut logger = Logger::with_config(&dir, config);

    debugf!(logger, "not shown at TRACE threshold")?;
    tracef!(logger, "starting in {}", dir)?;
    infof!(logger, "processing {} items", 3)?;
    warnf!(logger, "item {} took {}ms", 2, 1250)?;
    errorf!(logger, "item {} failed", 3)?;

    logger.close()?;
    Ok(())
}
