//! Download state for a single resumable transfer.
//!
//! The partial file on disk is the only resume checkpoint: its size when a
//! session starts is the offset the transfer continues from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{UpdateError, UpdateResult};

/// State of one download session.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadState {
    /// Target file.
    pub path: PathBuf,
    /// Bytes already on disk when the session started.
    pub resume_offset: u64,
    /// Bytes appended during this session.
    pub session_bytes: u64,
    /// Total size of the remote resource, when known.
    pub total_size: Option<u64>,
    /// Whether the file is known to hold the whole resource.
    pub completed: bool,
}

impl DownloadState {
    /// Inspect the target path and derive the resume offset from its size.
    ///
    /// A missing file means a fresh download.
    pub fn prepare(path: impl AsRef<Path>) -> UpdateResult<Self> {
        let path = path.as_ref();
        let resume_offset = match fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => {
                return Err(UpdateError::OpenFile {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::Other, "not a regular file"),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(source) => {
                return Err(UpdateError::OpenFile {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            resume_offset,
            session_bytes: 0,
            total_size: None,
            completed: false,
        })
    }

    /// Set the expected total from a size probe.
    pub fn with_total_size(mut self, total: Option<u64>) -> Self {
        self.total_size = total;
        self
    }

    /// Whether a previous attempt left bytes behind.
    pub fn is_resume(&self) -> bool {
        self.resume_offset > 0
    }

    /// Current size of the file on disk.
    pub fn bytes_on_disk(&self) -> u64 {
        self.resume_offset + self.session_bytes
    }

    /// Bytes this session is expected to transfer. Never negative.
    pub fn expected_session_bytes(&self) -> Option<u64> {
        self.total_size.map(|total| total.saturating_sub(self.resume_offset))
    }

    /// Bytes still missing. Never negative.
    pub fn remaining(&self) -> Option<u64> {
        self.total_size.map(|total| total.saturating_sub(self.bytes_on_disk()))
    }

    /// Whether the partial file already covers the known total.
    pub fn is_satisfied(&self) -> bool {
        self.total_size.is_some_and(|total| self.resume_offset >= total)
    }

    /// Record bytes appended to the file.
    pub fn record(&mut self, bytes: u64) {
        self.session_bytes += bytes;
    }

    /// Mark the download as complete.
    pub fn mark_complete(&mut self) {
        self.completed = true;
    }

    /// Progress as a percentage of the total, 0 when unknown.
    pub fn progress_percent(&self) -> f64 {
        match self.total_size {
            Some(0) => 100.0,
            Some(total) => (self.bytes_on_disk().min(total) as f64 / total as f64) * 100.0,
            None => 0.0,
        }
    }
}
