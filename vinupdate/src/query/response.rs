//! Response model for the update discovery endpoint.
//!
//! The server is not trusted to return categories in request order, so
//! entries are looked up by their `softwareType` rather than by position.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::request::SoftwareType;

/// One available update for a software category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    #[serde(rename = "updateId", default)]
    pub id: String,

    /// Size as reported by the server. Sent as a string or a number.
    #[serde(
        rename = "updateSize",
        default,
        deserialize_with = "deserialize_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub reported_size: Option<u64>,

    #[serde(rename = "updateVersion", default)]
    pub version: String,

    #[serde(rename = "updateDate", default)]
    pub date: String,

    #[serde(rename = "updateURL", default)]
    pub url: String,

    #[serde(
        rename = "licenseURL",
        default,
        deserialize_with = "deserialize_non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub license_url: Option<String>,
}

/// A software category with its installed version and available updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareStatus {
    pub software_type: SoftwareType,

    #[serde(default)]
    pub update_request_result: String,

    #[serde(default)]
    pub current_software_version: String,

    /// Available updates in server order. `null` is treated as empty.
    #[serde(rename = "update", default, deserialize_with = "deserialize_null_as_empty")]
    pub updates: Vec<UpdateDescriptor>,
}

impl SoftwareStatus {
    /// The first update offered for this category, if any.
    pub fn latest_update(&self) -> Option<&UpdateDescriptor> {
        self.updates.first()
    }
}

/// Top-level response of the update discovery endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateQueryResult {
    #[serde(rename = "requestResult", default)]
    pub request_result: String,

    #[serde(rename = "installerURL", default)]
    pub installer_url: String,

    #[serde(rename = "vin", default)]
    pub vin: String,

    #[serde(rename = "software", default, deserialize_with = "deserialize_null_as_empty")]
    pub software: Vec<SoftwareStatus>,
}

impl UpdateQueryResult {
    /// Look up the entry for a category.
    pub fn software(&self, software_type: &SoftwareType) -> Option<&SoftwareStatus> {
        self.software
            .iter()
            .find(|s| &s.software_type == software_type)
    }

    /// Latest update for a category, if the server offered one.
    pub fn latest_update(&self, software_type: &SoftwareType) -> Option<&UpdateDescriptor> {
        self.software(software_type)
            .and_then(SoftwareStatus::latest_update)
    }
}

fn deserialize_null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSize {
        Number(u64),
        Text(String),
    }

    match Option::<RawSize>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawSize::Number(n)) => Ok(Some(n)),
        Some(RawSize::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<u64>()
                    .map(Some)
                    .map_err(|_| de::Error::custom(format!("invalid updateSize '{}'", s)))
            }
        }
    }
}
