//! Leveled logger with daily rotation.
//!
//! Every line goes to the configured [`Destination`] first, then (when file
//! output is enabled) to `current.log` in the log directory. The first write
//! that finds `current.log` created on an earlier day rotates it: the file is
//! gzip-archived, closed, and reopened empty.
//!
//! The line that triggers a rotation is written to the destination only; it
//! is not appended to the freshly opened file.
//!
//! # Example
//!
//! ```rust,no_run
//! use quicklog::{infof, Config, LogLevel, Logger};
//!
//! let mut logger = Logger::with_config("./logs/", Config::default().level(LogLevel::Info));
//! infof!(logger, "listening on {}", 8080)?;
//! logger.close()?;
//! # Ok::<(), quicklog::LogError>(())
//! ```

use std::fmt::{self, Display};
use std::io::{self, Write};
use std::panic::Location;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{expand_path, Config, Destination};
use crate::error::LogError;
use crate::level::LogLevel;
use crate::sink::{Sink, CURRENT_LOG_NAME};

/// `chrono` format of the timestamp inside the line header.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d; %H:%M:%S";

/// Render one log line: `[<prefix>; <timestamp>] <message>\n`, with
/// `{<label>} ` before the message when a label is set.
pub fn format_line(level: LogLevel, at: DateTime<Local>, label: &str, message: &str) -> String {
    let timestamp = at.format(TIMESTAMP_FORMAT);
    if label.is_empty() {
        format!("[{}; {}] {}\n", level.prefix(), timestamp, message)
    } else {
        format!("[{}; {}] {{{}}} {}\n", level.prefix(), timestamp, label, message)
    }
}

/// Single-threaded leveled logger owning one [`Sink`].
///
/// Not synchronized: share across threads only behind a lock, since the
/// rotate-then-write sequence is not atomic.
pub struct Logger {
    dir: PathBuf,
    current_log_path: PathBuf,
    sink: Sink,
    config: Config,
    clock: Box<dyn Clock>,
}

impl Logger {
    /// Create a logger with the default configuration.
    ///
    /// # Arguments
    /// * `dir` - Directory holding `current.log` and its archives (supports `~` expansion)
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_config(dir, Config::default())
    }

    /// Create a logger whose settings are exactly `config`.
    pub fn with_config(dir: impl AsRef<Path>, config: Config) -> Self {
        let mut logger = Self {
            dir: PathBuf::new(),
            current_log_path: PathBuf::new(),
            sink: Sink::empty(),
            config,
            clock: Box::new(SystemClock),
        };
        logger.set_dir(dir);
        logger
    }

    /// Replace the clock used for timestamps and the freshness check.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Change the log directory. An already open file keeps being used
    /// until the next rotation; that file is then archived in the directory
    /// it was opened in, and the fresh `current.log` opens under `dir`.
    pub fn set_dir(&mut self, dir: impl AsRef<Path>) {
        self.dir = expand_path(dir.as_ref());
        self.current_log_path = self.dir.join(CURRENT_LOG_NAME);
    }

    /// Directory the next `current.log` will be opened in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/current.log`.
    pub fn current_log_path(&self) -> &Path {
        &self.current_log_path
    }

    /// Lowest level that produces output.
    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    /// Set the lowest level that produces output.
    pub fn set_level(&mut self, level: LogLevel) {
        self.config.level = level;
    }

    /// Whether rotation and close produce gzip archives.
    pub fn is_archiving(&self) -> bool {
        self.config.archive_logs
    }

    /// Enable or disable archiving. Disabling it without
    /// [`set_write_log_file`](Self::set_write_log_file) also stops file output.
    pub fn set_archiving(&mut self, enabled: bool) {
        self.config.archive_logs = enabled;
    }

    /// Whether lines are mirrored to `current.log` independently of archiving.
    pub fn is_writing_log_file(&self) -> bool {
        self.config.write_log_file
    }

    /// Mirror lines to `current.log` even when archiving is disabled.
    pub fn set_write_log_file(&mut self, enabled: bool) {
        self.config.write_log_file = enabled;
    }

    /// Label written as `{label}` after the line header; empty for none.
    pub fn label(&self) -> &str {
        &self.config.label
    }

    /// Set the label. An empty label removes it from the line format.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.config.label = label.into();
    }

    /// Stream receiving every line before the file.
    pub fn destination_mut(&mut self) -> &mut Destination {
        &mut self.config.destination
    }

    /// The active log file state.
    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Format and deliver one line regardless of the level threshold.
    pub fn write_line(&mut self, message: &str, level: LogLevel) -> Result<(), LogError> {
        let line = format_line(level, self.clock.now(), &self.config.label, message);
        self.deliver(line.as_bytes())
    }

    /// Log at `level` if it meets the threshold.
    pub fn log(&mut self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        if level < self.config.level {
            return Ok(());
        }
        self.write_line(&fmt::format(args), level)
    }

    /// Log at DEBUG.
    pub fn debug(&mut self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(LogLevel::Debug, args)
    }

    /// Log at TRACE, prefixed with the caller's `[file:line]`.
    #[track_caller]
    pub fn trace(&mut self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        let caller = Location::caller();
        self.log(
            LogLevel::Trace,
            format_args!("[{}:{}] {}", caller.file(), caller.line(), args),
        )
    }

    /// Log at INFO.
    pub fn info(&mut self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(LogLevel::Info, args)
    }

    /// Log at WARN.
    pub fn warn(&mut self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(LogLevel::Warn, args)
    }

    /// Log at ERROR.
    pub fn error(&mut self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(LogLevel::Error, args)
    }

    /// Log an error value at ERROR.
    pub fn log_err<E: Display + ?Sized>(&mut self, err: &E) -> Result<(), LogError> {
        self.log(LogLevel::Error, format_args!("{}", err))
    }

    /// Log at FATAL, then panic with the same message.
    pub fn fatal(&mut self, args: fmt::Arguments<'_>) -> ! {
        let message = fmt::format(args);
        self.record_fatal(&message);
        panic!("{}", message)
    }

    /// Log an error value at FATAL, then panic with it.
    pub fn fatal_err<E: Display>(&mut self, err: E) -> ! {
        let message = err.to_string();
        self.record_fatal(&message);
        panic!("{}", message)
    }

    pub(crate) fn record_fatal(&mut self, message: &str) {
        if let Err(err) = self.log(LogLevel::Fatal, format_args!("{}", message)) {
            warn!(error = %err, "Failed to record fatal message");
        }
    }

    /// Archive the active file one last time and close it.
    ///
    /// Archives land next to the file they were taken from. The file is
    /// closed even when archiving fails.
    pub fn close(&mut self) -> Result<(), LogError> {
        let dir = self.sink.dir().to_path_buf();
        let archived = self.sink.archive(&dir, self.config.archive_logs);
        self.sink.close();
        archived.map(|_| ())
    }

    /// Write to the destination, then to the active file, rotating it if it
    /// was created before today.
    fn deliver(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        if let Err(err) = self.config.destination.write_all(bytes) {
            warn!(error = %err, "Failed to write log line to destination");
        }

        if !self.config.file_output() {
            return Ok(());
        }

        if !self.sink.is_ok() {
            self.sink = Sink::open(&self.dir, &self.current_log_path)?;
        }

        if self.sink.is_same_day(self.clock.now()) {
            self.sink.append(bytes)
        } else {
            self.rotate()
        }
    }

    /// Archive, close and reopen the active file. A failed archive does not
    /// stop the reopen; its error is returned afterwards.
    fn rotate(&mut self) -> Result<(), LogError> {
        debug!(
            path = %self.sink.path().display(),
            created_at = %self.sink.created_at(),
            "Rotating stale log file"
        );
        let dir = self.sink.dir().to_path_buf();
        let archived = self.sink.archive(&dir, self.config.archive_logs);
        self.sink.close();
        self.sink = Sink::open(&self.dir, &self.current_log_path)?;
        archived.map(|_| ())
    }
}

impl Write for Logger {
    /// Raw bytes follow the same path as a formatted line.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.deliver(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.config.destination.flush()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("dir", &self.dir)
            .field("sink", &self.sink)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
