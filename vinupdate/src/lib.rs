//! vinupdate - Head-unit update discovery and resumable download
//!
//! This library asks the vendor update service which firmware and map
//! updates exist for a vehicle (identified by its VIN), reports them with
//! their download sizes, and downloads an update package to a local file,
//! resuming from any partial file left by an earlier attempt.
//!
//! # Architecture
//!
//! ```text
//! UpdateSession
//!     ├── UpdateQueryClient ──► POST discovery endpoint ──► UpdateQueryResult
//!     ├── SizeProbe ──────────► HEAD update/license URLs ──► UpdateReport
//!     └── ResumableDownloader ► GET (Range: bytes=N-) ────► output file
//! ```
//!
//! All network access goes through the `HttpClient` trait.

pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod logging;
pub mod probe;
pub mod query;
pub mod report;
pub mod session;

pub use error::{UpdateError, UpdateResult};
pub use session::{UpdateCheck, UpdateSession};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
