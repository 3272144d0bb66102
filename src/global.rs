//! Process-wide default logger.
//!
//! Nothing is created implicitly: call [`init`] (or [`install`]) once before
//! using the forwarding functions, and [`close`] before exit so the last
//! day's content is archived. Every forwarder returns
//! [`LogError::NotInitialized`] until then.
//!
//! ```rust,no_run
//! use quicklog::global;
//!
//! global::init()?;
//! global::info(format_args!("started with pid {}", std::process::id()))?;
//! global::close()?;
//! # Ok::<(), quicklog::LogError>(())
//! ```

use std::fmt::{self, Display};
use std::panic::Location;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::warn;

use crate::config::Config;
use crate::error::LogError;
use crate::level::LogLevel;
use crate::logger::Logger;

/// Directory used by [`init`].
pub const DEFAULT_DIR: &str = "./logs/";

static DEFAULT: OnceLock<Mutex<Logger>> = OnceLock::new();

/// Install the default logger: `./logs/`, level DEBUG, file output and
/// archiving enabled, writing to stdout.
pub fn init() -> Result<(), LogError> {
    install(Logger::with_config(
        DEFAULT_DIR,
        Config::default()
            .level(LogLevel::Debug)
            .write_log_file(true)
            .archive_logs(true),
    ))
}

/// Install a caller-built logger as the default. Succeeds at most once per
/// process.
pub fn install(logger: Logger) -> Result<(), LogError> {
    DEFAULT
        .set(Mutex::new(logger))
        .map_err(|_| LogError::AlreadyInitialized)
}

pub fn is_initialized() -> bool {
    DEFAULT.get().is_some()
}

/// Run `f` against the default logger.
///
/// A panic inside a previous call (a fatal message) poisons the lock; the
/// logger itself is still usable, so the poison is ignored.
pub fn with_logger<T>(f: impl FnOnce(&mut Logger) -> T) -> Result<T, LogError> {
    let lock = DEFAULT.get().ok_or(LogError::NotInitialized)?;
    let mut guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(f(&mut *guard))
}

pub fn set_dir(dir: impl AsRef<Path>) -> Result<(), LogError> {
    with_logger(|logger| logger.set_dir(dir))
}

pub fn level() -> Result<LogLevel, LogError> {
    with_logger(|logger| logger.level())
}

pub fn set_level(level: LogLevel) -> Result<(), LogError> {
    with_logger(|logger| logger.set_level(level))
}

pub fn is_archiving() -> Result<bool, LogError> {
    with_logger(|logger| logger.is_archiving())
}

pub fn set_archiving(enabled: bool) -> Result<(), LogError> {
    with_logger(|logger| logger.set_archiving(enabled))
}

pub fn set_write_log_file(enabled: bool) -> Result<(), LogError> {
    with_logger(|logger| logger.set_write_log_file(enabled))
}

pub fn log(level: LogLevel, args: fmt::Arguments<'_>) -> Result<(), LogError> {
    with_logger(|logger| logger.log(level, args))?
}

pub fn debug(args: fmt::Arguments<'_>) -> Result<(), LogError> {
    log(LogLevel::Debug, args)
}

/// Log at TRACE, prefixed with the location that called this function.
#[track_caller]
pub fn trace(args: fmt::Arguments<'_>) -> Result<(), LogError> {
    let caller = Location::caller();
    log(
        LogLevel::Trace,
        format_args!("[{}:{}] {}", caller.file(), caller.line(), args),
    )
}

pub fn info(args: fmt::Arguments<'_>) -> Result<(), LogError> {
    log(LogLevel::Info, args)
}

pub fn warn(args: fmt::Arguments<'_>) -> Result<(), LogError> {
    log(LogLevel::Warn, args)
}

pub fn error(args: fmt::Arguments<'_>) -> Result<(), LogError> {
    log(LogLevel::Error, args)
}

pub fn log_err<E: Display + ?Sized>(err: &E) -> Result<(), LogError> {
    with_logger(|logger| logger.log_err(err))?
}

/// Log at FATAL through the default logger (if installed), then panic.
///
/// The lock is released before panicking so the default logger stays usable
/// for a final [`close`].
pub fn fatal(args: fmt::Arguments<'_>) -> ! {
    let message = fmt::format(args);
    if with_logger(|logger| logger.record_fatal(&message)).is_err() {
        warn!(fatal = %message, "Fatal message not logged: default logger is not initialized");
    }
    panic!("{}", message)
}

pub fn fatal_err<E: Display>(err: E) -> ! {
    fatal(format_args!("{}", err))
}

/// Archive and close the default logger's active file.
pub fn close() -> Result<(), LogError> {
    with_logger(|logger| logger.close())?
}
