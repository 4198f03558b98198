//! Presentation model for a query result.
//!
//! Turns an `UpdateQueryResult` into per-category rows with probed sizes
//! and decoded URLs. Rendering (colors, layout) is left to the caller.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::query::{SoftwareType, UpdateQueryResult};

/// One software category in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub software_type: SoftwareType,
    pub request_result: String,
    pub current_version: String,
    /// Version of the first update offered, if any.
    pub new_version: Option<String>,
    pub update_size: Option<u64>,
    pub update_url: Option<String>,
    pub license_size: Option<u64>,
    pub license_url: Option<String>,
}

impl ReportEntry {
    /// Whether the server offered an update for this category.
    pub fn has_update(&self) -> bool {
        self.new_version.is_some()
    }
}

/// Report over every category the server answered for.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub vin: String,
    pub request_result: String,
    pub installer_url: Option<String>,
    pub entries: Vec<ReportEntry>,
}

impl UpdateReport {
    /// Build a report.
    ///
    /// Entries follow the `requested` order; categories the server returned
    /// without being asked are appended in server order. `probe` is called
    /// with each update and license URL; when it yields nothing the size
    /// reported in the response body is used instead.
    pub fn build<F>(result: &UpdateQueryResult, requested: &[SoftwareType], mut probe: F) -> Self
    where
        F: FnMut(&str) -> Option<u64>,
    {
        let mut ordered: Vec<&SoftwareType> = requested
            .iter()
            .filter(|t| result.software(t).is_some())
            .collect();
        for status in &result.software {
            if !ordered.contains(&&status.software_type) {
                ordered.push(&status.software_type);
            }
        }

        let entries = ordered
            .into_iter()
            .filter_map(|t| result.software(t))
            .map(|status| {
                let update = status.latest_update();
                let update_url = update.map(|u| u.url.clone()).filter(|u| !u.is_empty());
                let license_url = update.and_then(|u| u.license_url.clone());

                ReportEntry {
                    software_type: status.software_type.clone(),
                    request_result: status.update_request_result.clone(),
                    current_version: status.current_software_version.clone(),
                    new_version: update.map(|u| u.version.clone()),
                    update_size: update_url
                        .as_deref()
                        .and_then(|url| probe(&resolve_url(url)))
                        .or_else(|| update.and_then(|u| u.reported_size)),
                    license_size: license_url
                        .as_deref()
                        .and_then(|url| probe(&resolve_url(url))),
                    update_url: update_url.as_deref().map(decode_url),
                    license_url: license_url.as_deref().map(decode_url),
                }
            })
            .collect();

        Self {
            vin: result.vin.clone(),
            request_result: result.request_result.clone(),
            installer_url: Some(&result.installer_url)
                .filter(|u| !u.is_empty())
                .map(|u| decode_url(u)),
            entries,
        }
    }

    /// Entry for a category.
    pub fn entry(&self, software_type: &SoftwareType) -> Option<&ReportEntry> {
        self.entries
            .iter()
            .find(|e| &e.software_type == software_type)
    }
}

/// Percent-decode a URL for display. Undecodable input is returned as-is.
pub fn decode_url(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// URL to use for network requests.
///
/// Some responses carry fully escaped URLs (`https%3A%2F%2F...`); those are
/// decoded, anything already absolute is used untouched.
pub fn resolve_url(raw: &str) -> String {
    if raw.contains("://") {
        raw.to_string()
    } else {
        decode_url(raw)
    }
}

/// Re-indent a JSON document with four spaces. Non-JSON input is returned
/// unchanged.
pub fn pretty_json(raw: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };

    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    if value.serialize(&mut serializer).is_err() {
        return raw.to_string();
    }
    String::from_utf8(out).unwrap_or_else(|_| raw.to_string())
}
