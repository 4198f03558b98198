//! INI configuration file.
//!
//! ```ini
//! [api]
//! endpoint = https://api.example.com/v1/getAvailableUpdate
//! client_id = 00000000-0000-0000-0000-000000000000
//! software_types = ovip-int-firmware-version, rcc-firmware, map-eur
//! timeout_secs = 30
//!
//! [download]
//! output = /data/update.bin
//! connect_timeout_secs = 30
//! ```
//!
//! Every key is optional; unset keys fall back to `ServiceConfig` defaults.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::query::SoftwareType;

/// Errors that can occur while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed as INI.
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// A key holds a value of the wrong shape.
    #[error("invalid value for {section}.{key}: '{value}'")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}

/// `[api]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiSection {
    pub endpoint: Option<String>,
    pub client_id: Option<String>,
    pub software_types: Option<Vec<SoftwareType>>,
    pub timeout_secs: Option<u64>,
}

/// `[download]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadSection {
    pub output: Option<PathBuf>,
    pub connect_timeout_secs: Option<u64>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub api: ApiSection,
    pub download: DownloadSection,
}

/// Default location of the configuration file.
///
/// `<config_dir>/vinupdate/config.ini`, or `./vinupdate.ini` when the
/// platform has no config directory.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("vinupdate").join("config.ini"))
        .unwrap_or_else(|| PathBuf::from("vinupdate.ini"))
}

impl ConfigFile {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Parse from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            source: ini::Error::Parse(e),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let get = |section: &str, key: &str| -> Option<String> {
            ini.section(Some(section))
                .and_then(|s| s.get(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let software_types = get("api", "software_types").map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(SoftwareType::from_id)
                .collect::<Vec<_>>()
        });

        Ok(Self {
            api: ApiSection {
                endpoint: get("api", "endpoint"),
                client_id: get("api", "client_id"),
                software_types,
                timeout_secs: parse_secs(get("api", "timeout_secs"), "api", "timeout_secs")?,
            },
            download: DownloadSection {
                output: get("download", "output").map(PathBuf::from),
                connect_timeout_secs: parse_secs(
                    get("download", "connect_timeout_secs"),
                    "download",
                    "connect_timeout_secs",
                )?,
            },
        })
    }
}

fn parse_secs(
    value: Option<String>,
    section: &'static str,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue { section, key, value: v })
        })
        .transpose()
}
