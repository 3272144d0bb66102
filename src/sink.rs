//! The active log file and its archival.
//!
//! A [`Sink`] holds at most one open file, `current.log`, together with the
//! moment it was created. The creation time is taken from the file's on-disk
//! modification time right after it is truncated, so it reflects the
//! filesystem's view rather than the caller's clock.
//!
//! Archives are named `<YYYY-MM-DD>_<n>.log.gz`, where `n` is one more than
//! the number of archives already present for that date.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Datelike, Local, NaiveDate};
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, info};

use crate::error::LogError;

/// Name of the active log file inside the log directory.
pub const CURRENT_LOG_NAME: &str = "current.log";

/// Extension shared by every archive.
pub const ARCHIVE_SUFFIX: &str = ".log.gz";

/// Mode for created directories and files.
#[cfg(unix)]
const FILE_MODE: u32 = 0o775;

/// The single active log file, or nothing.
#[derive(Debug)]
pub struct Sink {
    file: Option<File>,
    dir: PathBuf,
    path: PathBuf,
    created_at: DateTime<Local>,
}

impl Default for Sink {
    fn default() -> Self {
        Self::empty()
    }
}

impl Sink {
    /// A sink holding no file.
    pub fn empty() -> Self {
        Self {
            file: None,
            dir: PathBuf::new(),
            path: PathBuf::new(),
            created_at: DateTime::<Local>::from(UNIX_EPOCH),
        }
    }

    /// Create `dir` if needed, truncate-and-create `path`, and record the
    /// file's modification time as its creation moment.
    pub fn open(dir: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<Self, LogError> {
        let dir = dir.as_ref();
        let path = path.as_ref();

        create_dir_all(dir).map_err(|source| LogError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(FILE_MODE);
        }
        let file = options.open(path).map_err(|source| LogError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;

        let modified = file
            .metadata()
            .and_then(|meta| meta.modified())
            .map_err(|source| LogError::Stat {
                path: path.to_path_buf(),
                source,
            })?;
        let created_at = DateTime::<Local>::from(modified);

        debug!(path = %path.display(), created_at = %created_at, "Opened log file");

        Ok(Self {
            file: Some(file),
            dir: dir.to_path_buf(),
            path: path.to_path_buf(),
            created_at,
        })
    }

    /// True iff a file is held.
    pub fn is_ok(&self) -> bool {
        self.file.is_some()
    }

    /// True iff the file was created on the current calendar day.
    pub fn is_today(&self) -> bool {
        self.is_same_day(Local::now())
    }

    /// True iff `created_at` shares year and day-of-year with `now`.
    pub fn is_same_day(&self, now: DateTime<Local>) -> bool {
        self.created_at.year() == now.year() && self.created_at.ordinal() == now.ordinal()
    }

    /// Modification time of the held file right after it was opened.
    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Directory the held file was opened in; empty when the sink is absent.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the held file; empty when the sink is absent.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append raw bytes to the held file. A no-op on an empty sink.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        file.write_all(bytes).map_err(|source| LogError::WriteFile {
            path: self.path.clone(),
            source,
        })
    }

    /// Drop the held file. Safe to call on an empty sink.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            debug!(path = %self.path.display(), "Closed log file");
        }
    }

    /// Gzip the entire content of the held file into the next free archive
    /// slot for its creation date.
    ///
    /// Returns `Ok(None)` when archiving is disabled or no file is held,
    /// otherwise the path of the archive written.
    pub fn archive(
        &mut self,
        dir: impl AsRef<Path>,
        enabled: bool,
    ) -> Result<Option<PathBuf>, LogError> {
        if !enabled {
            return Ok(None);
        }
        let Some(file) = self.file.as_mut() else {
            return Ok(None);
        };
        let dir = dir.as_ref();

        let (archive_path, archive) = create_archive(dir, self.created_at.date_naive())?;

        let mut content = Vec::new();
        file.seek(SeekFrom::Start(0))
            .and_then(|_| file.read_to_end(&mut content))
            .map_err(|source| LogError::ReadBack {
                path: self.path.clone(),
                source,
            })?;

        let mut encoder = GzEncoder::new(archive, Compression::default());
        encoder
            .write_all(&content)
            .and_then(|_| encoder.finish())
            .map_err(|source| LogError::Compress {
                path: archive_path.clone(),
                source,
            })?;

        info!(
            archive = %archive_path.display(),
            bytes = content.len(),
            "Archived log file"
        );
        Ok(Some(archive_path))
    }
}

/// Path the next archive for `date` would be written to, before checking
/// for a file already occupying that slot.
pub fn archive_path(dir: impl AsRef<Path>, date: NaiveDate) -> Result<PathBuf, LogError> {
    let dir = dir.as_ref();
    let stem = date.format("%Y-%m-%d").to_string();
    let count = count_archives(dir, &stem)?;
    Ok(dir.join(archive_name(&stem, count + 1)))
}

/// Create the next archive file for `date`.
///
/// Starts at `count + 1` and moves past slots that already exist, so a gap
/// in the numbering never causes an existing archive to be overwritten.
fn create_archive(dir: &Path, date: NaiveDate) -> Result<(PathBuf, File), LogError> {
    let stem = date.format("%Y-%m-%d").to_string();
    let mut ordinal = count_archives(dir, &stem)? + 1;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    loop {
        let path = dir.join(archive_name(&stem, ordinal));
        match options.open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!(archive = %path.display(), "Archive slot taken");
                ordinal += 1;
            }
            Err(source) => return Err(LogError::CreateArchive { path, source }),
        }
    }
}

fn archive_name(stem: &str, ordinal: usize) -> String {
    format!("{}_{}{}", stem, ordinal, ARCHIVE_SUFFIX)
}

/// Number of files in `dir` named `<stem>*.log.gz`.
pub fn count_archives(dir: impl AsRef<Path>, stem: &str) -> Result<usize, LogError> {
    let dir = dir.as_ref();
    let list_err = |source| LogError::ListArchives {
        path: dir.to_path_buf(),
        source,
    };

    let mut count = 0;
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(stem) && name.ends_with(ARCHIVE_SUFFIX) {
            count += 1;
        }
    }
    Ok(count)
}

fn create_dir_all(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(FILE_MODE);
    }
    builder.create(dir)
}
