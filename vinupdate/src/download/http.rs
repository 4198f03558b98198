//! HTTP-based file downloader with resume support.
//!
//! This module provides the core download routine:
//! - Resumable downloads via HTTP Range requests
//! - Append-only writes, the partial file is never truncated
//! - Progress callbacks for UI updates
//! - Cancellation between chunks

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::progress::{CancelToken, ProgressCallback};
use super::state::DownloadState;
use crate::error::{UpdateError, UpdateResult};
use crate::http::HttpClient;
use crate::probe::SizeProbe;

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Single-connection downloader that resumes from an existing partial file.
pub struct ResumableDownloader {
    http: Arc<dyn HttpClient>,
    probe: SizeProbe,
}

impl ResumableDownloader {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        let probe = SizeProbe::new(Arc::clone(&http));
        Self { http, probe }
    }

    /// Download `url` into `state.path`, continuing from the bytes already
    /// on disk.
    ///
    /// When `state.total_size` is unset it is probed with a HEAD request.
    /// Returns the number of bytes written in this session. On failure the
    /// partial file is left in place for the next attempt.
    pub fn download(
        &self,
        url: &str,
        state: &mut DownloadState,
        progress: Option<&ProgressCallback>,
        cancel: &CancelToken,
    ) -> UpdateResult<u64> {
        if state.total_size.is_none() {
            state.total_size = self.probe.try_content_length(url);
        }

        if state.is_satisfied() {
            info!(
                path = %state.path.display(),
                bytes = state.resume_offset,
                "Download already complete, nothing to fetch"
            );
            state.mark_complete();
            if let Some(cb) = progress {
                cb(0, Some(0));
            }
            return Ok(0);
        }

        let file = open_append(state)?;

        let range_start = state.is_resume().then_some(state.resume_offset);
        if let Some(offset) = range_start {
            info!(path = %state.path.display(), offset, "Resuming download");
        } else {
            info!(path = %state.path.display(), "Starting download");
        }

        let stream = self.http.get(url, range_start)?;

        match stream.status {
            416 if range_start.is_some() && state.total_size.is_none() => {
                warn!(
                    url = %url,
                    offset = state.resume_offset,
                    "Server reports nothing left to send, treating as complete"
                );
                state.mark_complete();
                return Ok(0);
            }
            200 if range_start.is_some() => {
                return Err(UpdateError::RangeIgnored {
                    url: url.to_string(),
                    offset: state.resume_offset,
                });
            }
            status if !(200..300).contains(&status) => {
                return Err(UpdateError::Server {
                    url: url.to_string(),
                    status,
                });
            }
            _ => {}
        }

        if state.total_size.is_none() {
            state.total_size = stream
                .content_length
                .map(|len| len + range_start.unwrap_or(0));
        }

        let expected = state.expected_session_bytes();
        debug!(url = %url, status = stream.status, expected = ?expected, "Streaming response body");

        let body: Box<dyn Read + Send> = match expected {
            Some(limit) => Box::new(stream.body.take(limit)),
            None => stream.body,
        };

        stream_to_file(body, file, state, expected, progress, cancel)?;

        if let Some(expected) = expected {
            if state.session_bytes < expected {
                return Err(UpdateError::Transfer {
                    path: state.path.clone(),
                    written: state.session_bytes,
                    reason: format!(
                        "connection closed after {} of {} bytes",
                        state.session_bytes, expected
                    ),
                });
            }
        }

        state.mark_complete();
        info!(
            path = %state.path.display(),
            written = state.session_bytes,
            total = state.bytes_on_disk(),
            "Download complete"
        );
        Ok(state.session_bytes)
    }
}

/// Open the target for appending, creating it and its parent directories.
fn open_append(state: &DownloadState) -> UpdateResult<File> {
    if let Some(parent) = state.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| UpdateError::OpenFile {
            path: state.path.clone(),
            source,
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&state.path)
        .map_err(|source| UpdateError::OpenFile {
            path: state.path.clone(),
            source,
        })
}

/// Copy the body to the file, flushing what was received on every exit path.
fn stream_to_file(
    mut body: Box<dyn Read + Send>,
    file: File,
    state: &mut DownloadState,
    expected: Option<u64>,
    progress: Option<&ProgressCallback>,
    cancel: &CancelToken,
) -> UpdateResult<()> {
    let mut writer = BufWriter::new(file);
    let mut buffer = vec![0u8; BUFFER_SIZE];

    let outcome = loop {
        if cancel.is_cancelled() {
            break Err(UpdateError::Cancelled {
                path: state.path.clone(),
                written: state.session_bytes,
            });
        }

        let bytes_read = match body.read(&mut buffer) {
            Ok(0) => break Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                break Err(UpdateError::Transfer {
                    path: state.path.clone(),
                    written: state.session_bytes,
                    reason: format!("read error: {}", e),
                })
            }
        };

        if let Err(e) = writer.write_all(&buffer[..bytes_read]) {
            break Err(UpdateError::Transfer {
                path: state.path.clone(),
                written: state.session_bytes,
                reason: format!("write error: {}", e),
            });
        }

        state.record(bytes_read as u64);

        if let Some(cb) = progress {
            cb(state.session_bytes, expected);
        }
    };

    let flushed = writer.flush().map_err(|e| UpdateError::Transfer {
        path: state.path.clone(),
        written: state.session_bytes,
        reason: format!("flush error: {}", e),
    });

    if let Err(ref e) = outcome {
        warn!(error = %e, "Download interrupted, partial file kept for resume");
    }
    outcome.and(flushed)
}
