//! Resumable download of a single update package.
//!
//! This module provides:
//! - Single file downloads with HTTP Range resume (`http`)
//! - Download state derived from the partial file on disk (`state`)
//! - Progress callbacks and cancellation (`progress`)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vinupdate::download::{CancelToken, DownloadState, ResumableDownloader};
//!
//! let downloader = ResumableDownloader::new(http);
//! let mut state = DownloadState::prepare("output.bin")?;
//!
//! downloader.download(url, &mut state, Some(&Box::new(|bytes, expected| {
//!     println!("{} of {:?} bytes", bytes, expected);
//! })), &CancelToken::new())?;
//! ```

mod http;
mod progress;
mod state;

pub use http::ResumableDownloader;
pub use progress::{CancelToken, ProgressCallback};
pub use state::DownloadState;
