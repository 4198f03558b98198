//! Configuration for the update query client and downloader.
//!
//! `ServiceConfig` carries everything the components need (endpoint,
//! credential, requested categories, output path, timeouts) so nothing is
//! read from global constants at call time. `ConfigFile` is the on-disk INI
//! representation the CLI layers its flags over.

mod file;
mod size;

pub use file::{config_file_path, ConfigError, ConfigFile};
pub use size::{format_optional_size, format_size};

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::{UpdateError, UpdateResult};
use crate::query::SoftwareType;

/// Update discovery endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str =
    "https://api.groupe-psa.com/applications/majesticf/v1/getAvailableUpdate";

/// Application credential sent as the `client_id` query parameter.
pub const DEFAULT_CLIENT_ID: &str = "20a4cf7c-f5fb-41d5-9175-a6e23b9880e5";

/// Output file used when none is configured.
pub const DEFAULT_OUTPUT_PATH: &str = "output.bin";

/// Default timeout for the query and size probe requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout for the download request.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Configuration shared by the query client, size probe and downloader.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Update discovery endpoint (without query string).
    pub endpoint: String,

    /// Application credential attached as `client_id`.
    pub client_id: String,

    /// Software categories named in the request, in request order.
    pub software_types: Vec<SoftwareType>,

    /// Local file the update package is appended to.
    pub output_path: PathBuf,

    /// Upper bound for the query and HEAD requests.
    pub request_timeout: Duration,

    /// Connect timeout for the download. The transfer itself is unbounded.
    pub connect_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            software_types: SoftwareType::default_request_set(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Create a configuration pointing at the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Build a configuration from the INI file, falling back to defaults
    /// for anything it leaves unset.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut config = Self::default();
        if let Some(ref endpoint) = file.api.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(ref client_id) = file.api.client_id {
            config.client_id = client_id.clone();
        }
        if let Some(ref types) = file.api.software_types {
            config.software_types = types.clone();
        }
        if let Some(secs) = file.api.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ref path) = file.download.output {
            config.output_path = path.clone();
        }
        if let Some(secs) = file.download.connect_timeout_secs {
            config.connect_timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Set the application credential.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set the requested software categories.
    pub fn with_software_types(mut self, types: Vec<SoftwareType>) -> Self {
        self.software_types = types;
        self
    }

    /// Set the output file path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the query/probe timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the download connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Full query URL with the credential attached.
    pub fn query_url(&self) -> UpdateResult<String> {
        Url::parse_with_params(&self.endpoint, &[("client_id", self.client_id.as_str())])
            .map(String::from)
            .map_err(|e| {
                UpdateError::Config(format!("invalid endpoint '{}': {}", self.endpoint, e))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.output_path, PathBuf::from("output.bin"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.software_types.len(), 4);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ServiceConfig::new("http://localhost:8080/updates")
            .with_client_id("test-client")
            .with_software_types(vec![SoftwareType::NacFirmware])
            .with_output_path("/tmp/nac.bin")
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.endpoint, "http://localhost:8080/updates");
        assert_eq!(config.client_id, "test-client");
        assert_eq!(config.software_types, vec![SoftwareType::NacFirmware]);
        assert_eq!(config.output_path, PathBuf::from("/tmp/nac.bin"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_query_url_carries_client_id() {
        let config = ServiceConfig::new("https://api.example.com/v1/getAvailableUpdate")
            .with_client_id("abc-123");
        assert_eq!(
            config.query_url().unwrap(),
            "https://api.example.com/v1/getAvailableUpdate?client_id=abc-123"
        );
    }

    #[test]
    fn test_query_url_rejects_garbage_endpoint() {
        let config = ServiceConfig::new("not a url");
        assert!(matches!(config.query_url(), Err(UpdateError::Config(_))));
    }

    #[test]
    fn test_from_config_file_overrides() {
        let mut file = ConfigFile::default();
        file.api.client_id = Some("from-file".to_string());
        file.download.output = Some(PathBuf::from("/data/update.bin"));

        let config = ServiceConfig::from_config_file(&file);
        assert_eq!(config.client_id, "from-file");
        assert_eq!(config.output_path, PathBuf::from("/data/update.bin"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }
}
