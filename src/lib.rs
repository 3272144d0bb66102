//! # quicklog
//!
//! Leveled logger that writes timestamped lines to a stream and mirrors them
//! to a daily log file, gzip-archiving the previous day's file when a new day
//! begins.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quicklog::{tracef, warnf, Config, LogLevel, Logger};
//!
//! fn main() -> Result<(), quicklog::LogError> {
//!     let mut logger = Logger::with_config("./logs/", Config::default().level(LogLevel::Trace));
//!
//!     warnf!(logger, "queue depth {} over limit", 128)?;
//!     tracef!(logger, "retrying")?;
//!
//!     logger.close()
//! }
//! ```
//!
//! ## Files
//!
//! ```text
//! logs/current.log             active file, truncated whenever it is opened
//! logs/2026-10-18_1.log.gz     archive of a rotated file
//! logs/2026-10-18_2.log.gz     second archive for the same date
//! ```
//!
//! ## Line format
//!
//! ```text
//! [W; 2026-10-19; 14:03:55] queue depth 128 over limit
//! ```

pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod global;
pub mod level;
pub mod logger;
pub mod sink;

// Re-exports for convenience
pub use clock::{Clock, SystemClock};
pub use config::{Config, Destination};
pub use error::LogError;
pub use level::LogLevel;
pub use logger::{format_line, Logger, TIMESTAMP_FORMAT};
pub use sink::Sink;

/// Log at DEBUG: `debugf!(logger, "fmt", args..)`.
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::std::format_args!($($arg)+))
    };
}

/// Log at TRACE with the invocation's `[file:line]` prepended.
#[macro_export]
macro_rules! tracef {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace(::std::format_args!($($arg)+))
    };
}

/// Log at INFO: `infof!(logger, "fmt", args..)`.
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::std::format_args!($($arg)+))
    };
}

/// Log at WARN: `warnf!(logger, "fmt", args..)`.
#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(::std::format_args!($($arg)+))
    };
}

/// Log at ERROR: `errorf!(logger, "fmt", args..)`.
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(::std::format_args!($($arg)+))
    };
}

/// Log at FATAL, then panic with the message.
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(::std::format_args!($($arg)+))
    };
}
