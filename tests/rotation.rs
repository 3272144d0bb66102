//! Integration tests for daily rotation and archival.
//!
//! A [`ManualClock`] moves the logger's notion of "now" forward so that the
//! active file, stamped with its real modification time, becomes stale.

mod common;

use std::fs;
use std::io::Write;

use common::{archives, config, gunzip, ManualClock, SharedBuf};
use flate2::write::GzEncoder;
use flate2::Compression;
use quicklog::{infof, warnf, LogLevel, Logger};
use tempfile::TempDir;

fn logger_in(tmp: &TempDir, buf: &SharedBuf, clock: &ManualClock) -> Logger {
    Logger::with_config(tmp.path(), config(buf, LogLevel::Debug)).with_clock(clock.clone())
}

fn archive_stem(logger: &Logger) -> String {
    logger.sink().created_at().format("%Y-%m-%d").to_string()
}

// ============================================================================
// Same-Day Writes
// ============================================================================

#[test]
fn test_same_day_writes_never_rotate() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "first").unwrap();
    let created = logger.sink().created_at();
    for n in 0..20 {
        infof!(logger, "line {}", n).unwrap();
    }

    assert_eq!(logger.sink().created_at(), created);
    assert!(archives(tmp.path()).is_empty());
    let file = fs::read_to_string(logger.current_log_path()).unwrap();
    assert_eq!(file.lines().count(), 21);
}

// ============================================================================
// Day Change
// ============================================================================

#[test]
fn test_day_change_archives_and_truncates() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "yesterday one").unwrap();
    warnf!(logger, "yesterday two").unwrap();
    let before = fs::read_to_string(logger.current_log_path()).unwrap();
    let stem = archive_stem(&logger);

    clock.advance_days(1);
    infof!(logger, "today").unwrap();

    assert_eq!(archives(tmp.path()), [format!("{}_1.log.gz", stem)]);
    assert_eq!(gunzip(&tmp.path().join(format!("{}_1.log.gz", stem))), before);
    assert!(logger.sink().is_ok());
    assert_eq!(fs::read_to_string(logger.current_log_path()).unwrap(), "");
}

#[test]
fn test_rotating_line_reaches_stream_but_not_new_file() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "before").unwrap();
    clock.advance_days(1);
    infof!(logger, "trigger").unwrap();

    // Known boundary: the line that causes rotation is only on the stream.
    assert!(buf.lines()[1].ends_with("] trigger"));
    let current = fs::read_to_string(logger.current_log_path()).unwrap();
    assert!(!current.contains("trigger"));
    let stem = archive_stem(&logger);
    let archived = gunzip(&tmp.path().join(format!("{}_1.log.gz", stem)));
    assert!(!archived.contains("trigger"));
}

#[test]
fn test_year_old_file_is_stale() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "last year").unwrap();
    clock.advance_days(365);
    infof!(logger, "this year").unwrap();

    assert_eq!(archives(tmp.path()).len(), 1);
}

#[test]
fn test_archive_numbering_continues_after_existing() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "content").unwrap();
    let stem = archive_stem(&logger);
    for n in 1..=4 {
        fs::write(tmp.path().join(format!("{}_{}.log.gz", stem, n)), "").unwrap();
    }

    clock.advance_days(1);
    infof!(logger, "rotate").unwrap();

    let expected = tmp.path().join(format!("{}_5.log.gz", stem));
    assert!(expected.exists());
    assert!(gunzip(&expected).ends_with("] content\n"));
}

#[test]
fn test_repeated_rotations_same_date_count_up() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "seed").unwrap();
    let stem = archive_stem(&logger);
    clock.advance_days(1);

    // Each fresh file is stamped with the real date, so every write under
    // the advanced clock rotates again.
    for _ in 0..3 {
        infof!(logger, "again").unwrap();
    }

    assert_eq!(
        archives(tmp.path()),
        [
            format!("{}_1.log.gz", stem),
            format!("{}_2.log.gz", stem),
            format!("{}_3.log.gz", stem),
        ]
    );
}

#[test]
fn test_rotation_without_archiving() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = Logger::with_config(
        tmp.path(),
        config(&buf, LogLevel::Debug)
            .archive_logs(false)
            .write_log_file(true),
    )
    .with_clock(clock.clone());

    infof!(logger, "old").unwrap();
    clock.advance_days(1);
    infof!(logger, "new").unwrap();

    assert!(archives(tmp.path()).is_empty());
    assert!(logger.sink().is_ok());
    assert_eq!(fs::read_to_string(logger.current_log_path()).unwrap(), "");
}

#[test]
fn test_set_dir_applies_on_next_rotation() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "in first dir").unwrap();
    let moved = tmp.path().join("moved");
    logger.set_dir(&moved);

    infof!(logger, "still first dir").unwrap();
    assert_eq!(logger.sink().path(), tmp.path().join("current.log"));
    assert!(!moved.exists());

    clock.advance_days(1);
    infof!(logger, "rotate").unwrap();
    assert_eq!(logger.sink().path(), moved.join("current.log"));
    assert!(moved.join("current.log").exists());
    // The stale file is archived where it lived.
    assert_eq!(archives(tmp.path()).len(), 1);
    assert!(archives(&moved).is_empty());
}

#[test]
fn test_rotation_skips_occupied_archive_slot() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "new content").unwrap();
    let stem = archive_stem(&logger);
    // `_1` was pruned while `_2` survived.
    let survivor = tmp.path().join(format!("{}_2.log.gz", stem));
    let mut encoder = GzEncoder::new(fs::File::create(&survivor).unwrap(), Compression::default());
    encoder.write_all(b"older day\n").unwrap();
    encoder.finish().unwrap();

    clock.advance_days(1);
    infof!(logger, "rotate").unwrap();

    assert_eq!(gunzip(&survivor), "older day\n");
    let written = tmp.path().join(format!("{}_3.log.gz", stem));
    assert!(gunzip(&written).ends_with("] new content\n"));
}

// ============================================================================
// Archive Failures
// ============================================================================

#[test]
fn test_failed_archive_during_rotation_still_reopens() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("logs");
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger =
        Logger::with_config(&dir, config(&buf, LogLevel::Debug)).with_clock(clock.clone());

    infof!(logger, "doomed").unwrap();
    // The open handle survives, but listing archives now fails.
    fs::remove_dir_all(&dir).unwrap();

    clock.advance_days(1);
    let err = infof!(logger, "rotate").unwrap_err();

    assert!(err.is_archive(), "unexpected error: {err}");
    assert!(logger.sink().is_ok());
    assert_eq!(fs::read_to_string(dir.join("current.log")).unwrap(), "");
    assert!(archives(&dir).is_empty());
}

#[test]
fn test_failed_archive_on_close_still_closes() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("logs");
    let buf = SharedBuf::new();
    let mut logger = Logger::with_config(&dir, config(&buf, LogLevel::Debug));

    infof!(logger, "last words").unwrap();
    fs::remove_dir_all(&dir).unwrap();

    let err = logger.close().unwrap_err();

    assert!(err.is_archive(), "unexpected error: {err}");
    assert!(!logger.sink().is_ok());
}

// ============================================================================
// Close
// ============================================================================

#[test]
fn test_close_archives_and_empties_sink() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "final words").unwrap();
    let stem = archive_stem(&logger);
    let before = fs::read_to_string(logger.current_log_path()).unwrap();

    logger.close().unwrap();

    assert!(!logger.sink().is_ok());
    assert_eq!(gunzip(&tmp.path().join(format!("{}_1.log.gz", stem))), before);
}

#[test]
fn test_close_without_archiving_only_closes() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let mut logger = Logger::with_config(
        tmp.path(),
        config(&buf, LogLevel::Debug)
            .archive_logs(false)
            .write_log_file(true),
    );

    infof!(logger, "x").unwrap();
    logger.close().unwrap();

    assert!(!logger.sink().is_ok());
    assert!(archives(tmp.path()).is_empty());
}

#[test]
fn test_close_before_any_write_is_noop() {
    let tmp = TempDir::new().unwrap();
    let mut logger = Logger::new(tmp.path().join("never"));

    logger.close().unwrap();
    assert!(!tmp.path().join("never").exists());
}

#[test]
fn test_write_after_close_reopens() {
    let tmp = TempDir::new().unwrap();
    let buf = SharedBuf::new();
    let clock = ManualClock::new();
    let mut logger = logger_in(&tmp, &buf, &clock);

    infof!(logger, "session one").unwrap();
    logger.close().unwrap();
    infof!(logger, "session two").unwrap();

    assert!(logger.sink().is_ok());
    let current = fs::read_to_string(logger.current_log_path()).unwrap();
    assert!(current.ends_with("] session two\n"));
    assert!(!current.contains("session one"));
}
