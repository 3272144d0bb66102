//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, NaiveDateTime};
use flate2::read::GzDecoder;
use quicklog::{Clock, Config, Destination, LogLevel, TIMESTAMP_FORMAT};

/// Writer that records everything into a shared buffer.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Destination {
        Destination::writer(self.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that always fails.
pub struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Wall clock shifted by an adjustable offset.
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<Duration>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Duration::zero())))
    }

    pub fn advance_days(&self, days: i64) {
        let mut offset = self.0.lock().unwrap();
        *offset = *offset + Duration::days(days);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        Local::now() + *self.0.lock().unwrap()
    }
}

/// Config writing to `buf`, with the given level.
pub fn config(buf: &SharedBuf, level: LogLevel) -> Config {
    Config::default().level(level).destination(buf.destination())
}

/// Split a line into (prefix, timestamp, message), checking the header shape.
pub fn parse_line(line: &str) -> (String, NaiveDateTime, String) {
    assert!(line.starts_with('['), "bad line: {line}");
    let close = line.find("] ").expect("missing header terminator");
    let header = &line[1..close];
    let (prefix, timestamp) = header.split_once("; ").expect("missing prefix separator");
    let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .unwrap_or_else(|e| panic!("bad timestamp {timestamp:?}: {e}"));
    (prefix.to_string(), timestamp, line[close + 2..].to_string())
}

pub fn gunzip(path: &Path) -> String {
    let mut out = String::new();
    GzDecoder::new(File::open(path).unwrap())
        .read_to_string(&mut out)
        .unwrap();
    out
}

/// Names of all `.log.gz` files in `dir`, sorted.
pub fn archives(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".log.gz"))
        .collect();
    names.sort();
    names
}
