//! Error types for sink acquisition and archiving.
//!
//! Failures fall into two tiers: acquiring the active log file (directory
//! creation, open, stat) and archiving it (listing, archive creation,
//! read-back, compression). Both are returned to the caller; whether to
//! escalate to process termination is the embedding application's choice.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the logger and its sink.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log directory could not be created.
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The active log file could not be opened.
    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The active log file's metadata could not be read.
    #[error("failed to stat log file {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A formatted line could not be appended to the active log file.
    #[error("failed to write to log file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Existing archives could not be listed.
    #[error("failed to list archives in {path}: {source}")]
    ListArchives {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive file could not be created.
    #[error("failed to create archive {path}: {source}")]
    CreateArchive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The active log file could not be read back for archiving.
    #[error("failed to read back log file {path}: {source}")]
    ReadBack {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Compressed content could not be written to the archive.
    #[error("failed to compress into archive {path}: {source}")]
    Compress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    #[error("default logger is already initialized")]
    AlreadyInitialized,

    #[error("default logger is not initialized")]
    NotInitialized,
}

impl LogError {
    /// True for failures while materializing the active log file.
    pub fn is_sink_open(&self) -> bool {
        matches!(
            self,
            LogError::CreateDir { .. } | LogError::OpenFile { .. } | LogError::Stat { .. }
        )
    }

    /// True for failures while producing an archive.
    pub fn is_archive(&self) -> bool {
        matches!(
            self,
            LogError::ListArchives { .. }
                | LogError::CreateArchive { .. }
                | LogError::ReadBack { .. }
                | LogError::Compress { .. }
        )
    }
}

impl From<LogError> for io::Error {
    fn from(err: LogError) -> Self {
        io::Error::other(err)
    }
}
