//! Append-only diagnostic log of received envelopes.
//!
//! Each envelope is written as it arrived (every key kept, nothing filled
//! in) but pretty-printed, followed by a newline. The file is plain
//! concatenated JSON, which [`super::ReplaySource`] can read back.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Writer for the envelope log.
#[derive(Debug)]
pub struct EnvelopeLog {
    path: PathBuf,
    file: File,
}

impl EnvelopeLog {
    /// Open (or create) the log for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    /// Returns the path being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one received envelope.
    pub fn record(&mut self, frame: &Value) -> io::Result<()> {
        let json = serde_json::to_string_pretty(frame)?;
        writeln!(self.file, "{}", json)
    }
}
