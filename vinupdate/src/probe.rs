//! Remote size probe.
//!
//! Issues a HEAD request to learn a resource's total length without
//! transferring its body.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{UpdateError, UpdateResult};
use crate::http::HttpClient;

/// HEAD-based content length probe.
pub struct SizeProbe {
    http: Arc<dyn HttpClient>,
}

impl SizeProbe {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Total length of the resource at `url`.
    pub fn content_length(&self, url: &str) -> UpdateResult<u64> {
        let response = self.http.head(url)?;

        if !(200..300).contains(&response.status) {
            return Err(UpdateError::Server {
                url: url.to_string(),
                status: response.status,
            });
        }

        let length = response.content_length.ok_or_else(|| UpdateError::Network {
            url: url.to_string(),
            reason: "response carried no content length".to_string(),
        })?;

        debug!(url = %url, bytes = length, "Probed remote size");
        Ok(length)
    }

    /// Like `content_length`, but degrades any failure to `None`.
    pub fn try_content_length(&self, url: &str) -> Option<u64> {
        match self.content_length(url) {
            Ok(length) => Some(length),
            Err(e) => {
                warn!(url = %url, error = %e, "Size probe failed, size unknown");
                None
            }
        }
    }
}
