//! Top-level orchestration: query, size probes, report and download.
//!
//! Every step returns its error to the caller; deciding whether a failure
//! ends the process is left to the binary.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::config::ServiceConfig;
use crate::download::{CancelToken, DownloadState, ProgressCallback, ResumableDownloader};
use crate::error::{UpdateError, UpdateResult};
use crate::http::{HttpClient, ReqwestClient};
use crate::probe::SizeProbe;
use crate::query::{QueryOutcome, SoftwareType, UpdateQueryClient, Vin};
use crate::report::{resolve_url, UpdateReport};

/// Result of an update check.
#[derive(Debug, Clone)]
pub struct UpdateCheck {
    pub query: QueryOutcome,
    pub report: UpdateReport,
    /// Sizes answered by the HEAD probes, keyed by resolved URL.
    pub probed_sizes: HashMap<String, u64>,
}

/// Update query, probe and download wired to one configuration.
pub struct UpdateSession {
    config: ServiceConfig,
    query: UpdateQueryClient,
    probe: SizeProbe,
    downloader: ResumableDownloader,
}

impl UpdateSession {
    /// Create a session over an arbitrary HTTP client.
    pub fn new(http: Arc<dyn HttpClient>, config: ServiceConfig) -> Self {
        Self {
            query: UpdateQueryClient::new(Arc::clone(&http), config.clone()),
            probe: SizeProbe::new(Arc::clone(&http)),
            downloader: ResumableDownloader::new(http),
            config,
        }
    }

    /// Create a session backed by reqwest.
    pub fn from_config(config: ServiceConfig) -> UpdateResult<Self> {
        let http = Arc::new(ReqwestClient::from_config(&config)?);
        Ok(Self::new(http, config))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Query available updates and build a report with probed sizes.
    ///
    /// Probe failures degrade to the size reported in the response, or
    /// unknown.
    pub fn check(&self, vin: &Vin) -> UpdateResult<UpdateCheck> {
        let query = self.query.query(vin)?;
        let mut probed_sizes = HashMap::new();
        let report = UpdateReport::build(&query.result, &self.config.software_types, |url| {
            let size = self.probe.try_content_length(url);
            if let Some(size) = size {
                probed_sizes.insert(url.to_string(), size);
            }
            size
        });
        Ok(UpdateCheck {
            query,
            report,
            probed_sizes,
        })
    }

    /// Download the latest update of a category into the configured output
    /// file, resuming any partial file already there.
    ///
    /// A size already probed by `check` is reused; otherwise the downloader
    /// probes the URL itself.
    pub fn download(
        &self,
        check: &UpdateCheck,
        software_type: &SoftwareType,
        progress: Option<&ProgressCallback>,
        cancel: &CancelToken,
    ) -> UpdateResult<DownloadState> {
        let update = check.query.result.latest_update(software_type).ok_or_else(|| {
            UpdateError::InvalidInput(format!("no update available for {}", software_type))
        })?;
        if update.url.is_empty() {
            return Err(UpdateError::InvalidInput(format!(
                "update {} for {} has no download URL",
                update.version, software_type
            )));
        }

        let url = resolve_url(&update.url);
        info!(
            software = %software_type,
            version = %update.version,
            output = %self.config.output_path.display(),
            "Downloading update"
        );

        let mut state = DownloadState::prepare(&self.config.output_path)?
            .with_total_size(check.probed_sizes.get(&url).copied());
        self.downloader.download(&url, &mut state, progress, cancel)?;
        Ok(state)
    }
}
