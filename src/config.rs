//! Logger configuration.
//!
//! A [`Config`] passed to [`Logger::with_config`](crate::Logger::with_config)
//! replaces the defaults wholesale. Everything except the destination stream
//! can also be loaded from JSON:
//!
//! ```json
//! {"label":"api","level":"warn","write_log_file":true,"archive_logs":false}
//! ```

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::level::LogLevel;

/// Stream that receives every formatted line immediately.
#[derive(Default)]
pub enum Destination {
    #[default]
    Stdout,
    Stderr,
    /// Any caller-supplied writer (a buffer, a socket, a pipe).
    Writer(Box<dyn Write + Send>),
}

impl Destination {
    /// Wrap an arbitrary writer.
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Destination::Writer(Box::new(writer))
    }
}

impl Write for Destination {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Destination::Stdout => io::stdout().write(buf),
            Destination::Stderr => io::stderr().write(buf),
            Destination::Writer(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Destination::Stdout => io::stdout().flush(),
            Destination::Stderr => io::stderr().flush(),
            Destination::Writer(w) => w.flush(),
        }
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("Stdout"),
            Destination::Stderr => f.write_str("Stderr"),
            Destination::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Logger settings.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Written as `{label}` after the line header when non-empty.
    pub label: String,

    /// Lowest level that produces output.
    pub level: LogLevel,

    /// Mirror lines to `current.log` even when archiving is off.
    pub write_log_file: bool,

    /// Gzip the active file into a dated archive on rotation and close.
    pub archive_logs: bool,

    #[serde(skip)]
    pub destination: Destination,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            label: String::new(),
            level: LogLevel::Debug,
            write_log_file: false,
            archive_logs: true,
            destination: Destination::Stdout,
        }
    }
}

impl Config {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn write_log_file(mut self, enabled: bool) -> Self {
        self.write_log_file = enabled;
        self
    }

    pub fn archive_logs(mut self, enabled: bool) -> Self {
        self.archive_logs = enabled;
        self
    }

    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Whether lines are mirrored to the active log file at all.
    pub fn file_output(&self) -> bool {
        self.write_log_file || self.archive_logs
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse logger config JSON")
    }

    /// Load a JSON configuration file (supports `~` expansion).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = expand_path(path.as_ref());
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read logger config: {}", path.display()))?;
        Self::from_json_str(&content)
    }
}

/// Expand `~` in path to home directory.
pub(crate) fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.as_ref())
}
