//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use tracing::warn;
use vinupdate::config::{config_file_path, ConfigFile, ServiceConfig};
use vinupdate::query::SoftwareType;

use crate::error::CliError;

/// Update category selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum SoftwareArg {
    /// NAC head-unit firmware
    Nac,
    /// RCC head-unit firmware
    Rcc,
    /// European GPS map
    Map,
    /// AIO head-unit firmware
    Aio,
}

impl From<SoftwareArg> for SoftwareType {
    fn from(arg: SoftwareArg) -> Self {
        match arg {
            SoftwareArg::Nac => SoftwareType::NacFirmware,
            SoftwareArg::Rcc => SoftwareType::RccFirmware,
            SoftwareArg::Map => SoftwareType::MapEur,
            SoftwareArg::Aio => SoftwareType::AioFirmware,
        }
    }
}

/// Settings given on the command line that override the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub client_id: Option<String>,
    pub timeout_secs: Option<u64>,
    pub output: Option<PathBuf>,
}

/// Load the config file.
///
/// An explicitly named file must load. The default file is optional: if it
/// is unreadable the defaults are used and a warning is logged.
pub fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile, CliError> {
    match explicit {
        Some(path) => Ok(ConfigFile::load_from(path)?),
        None => Ok(ConfigFile::load().unwrap_or_else(|e| {
            warn!(
                path = %config_file_path().display(),
                error = %e,
                "Ignoring unreadable config file"
            );
            ConfigFile::default()
        })),
    }
}

/// Resolve the service configuration: CLI flags, then config file, then
/// defaults.
pub fn resolve_config(
    file: &ConfigFile,
    overrides: ConfigOverrides,
) -> Result<ServiceConfig, CliError> {
    let mut config = ServiceConfig::from_config_file(file);

    if let Some(endpoint) = overrides.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(client_id) = overrides.client_id {
        config = config.with_client_id(client_id);
    }
    if let Some(secs) = overrides.timeout_secs {
        if secs == 0 {
            return Err(CliError::Config("--timeout must be at least 1 second".to_string()));
        }
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    if let Some(output) = overrides.output {
        config = config.with_output_path(output);
    }

    // Surface a malformed endpoint before any request is attempted.
    config.query_url()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vinupdate::config::{DEFAULT_ENDPOINT, DEFAULT_OUTPUT_PATH};

    #[test]
    fn test_software_arg_mapping() {
        assert_eq!(SoftwareType::from(SoftwareArg::Nac), SoftwareType::NacFirmware);
        assert_eq!(SoftwareType::from(SoftwareArg::Map), SoftwareType::MapEur);
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = resolve_config(&ConfigFile::default(), ConfigOverrides::default()).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn test_flags_override_file() {
        let file = ConfigFile::parse(
            "[api]\nendpoint = https://file.test/v1\nclient_id = from-file\n\n[download]\noutput = file.bin\n",
        )
        .unwrap();
        let overrides = ConfigOverrides {
            client_id: Some("from-flag".to_string()),
            output: Some(PathBuf::from("flag.bin")),
            ..Default::default()
        };

        let config = resolve_config(&file, overrides).unwrap();

        assert_eq!(config.endpoint, "https://file.test/v1");
        assert_eq!(config.client_id, "from-flag");
        assert_eq!(config.output_path, PathBuf::from("flag.bin"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let overrides = ConfigOverrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        let err = resolve_config(&ConfigFile::default(), overrides).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_malformed_endpoint_rejected() {
        let overrides = ConfigOverrides {
            endpoint: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(resolve_config(&ConfigFile::default(), overrides).is_err());
    }

    #[test]
    fn test_explicit_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = load_config_file(Some(&dir.path().join("absent.ini"))).unwrap();
        assert_eq!(file, ConfigFile::default());
    }
}
