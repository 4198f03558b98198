//! Request types for the update discovery endpoint.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{UpdateError, UpdateResult};

/// Vehicle Identification Number, validated non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vin(String);

impl Vin {
    /// Parse a vehicle identifier. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> UpdateResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UpdateError::InvalidInput(
                "vehicle identifier must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Software category known to the update service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SoftwareType {
    /// Head-unit (NAC) firmware.
    NacFirmware,
    /// Radio/connectivity (RCC) firmware.
    RccFirmware,
    /// European navigation map.
    MapEur,
    /// All-in-one head-unit firmware.
    AioFirmware,
    /// A category this client has no label for, kept verbatim.
    Other(String),
}

impl SoftwareType {
    /// Categories requested by default, in request order.
    pub fn default_request_set() -> Vec<Self> {
        vec![
            Self::NacFirmware,
            Self::RccFirmware,
            Self::MapEur,
            Self::AioFirmware,
        ]
    }

    /// Parse a wire identifier.
    pub fn from_id(id: &str) -> Self {
        match id {
            "ovip-int-firmware-version" => Self::NacFirmware,
            "rcc-firmware" => Self::RccFirmware,
            "map-eur" => Self::MapEur,
            "aio-firmware" => Self::AioFirmware,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire identifier sent to and returned by the service.
    pub fn id(&self) -> &str {
        match self {
            Self::NacFirmware => "ovip-int-firmware-version",
            Self::RccFirmware => "rcc-firmware",
            Self::MapEur => "map-eur",
            Self::AioFirmware => "aio-firmware",
            Self::Other(id) => id,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Self::NacFirmware => "NAC Firmware",
            Self::RccFirmware => "RCC Firmware",
            Self::MapEur => "GPS Map",
            Self::AioFirmware => "AIO Firmware",
            Self::Other(id) => id,
        }
    }
}

impl fmt::Display for SoftwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SoftwareType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for SoftwareType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Ok(Self::from_id(&id))
    }
}

/// One entry of the `softwareTypes` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareRequest {
    pub software_type: SoftwareType,
}

/// Request body for the update discovery endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableUpdateRequest {
    pub vin: String,
    pub software_types: Vec<SoftwareRequest>,
}

impl AvailableUpdateRequest {
    /// Build a request for the given vehicle and categories.
    pub fn new(vin: &Vin, software_types: &[SoftwareType]) -> UpdateResult<Self> {
        if software_types.is_empty() {
            return Err(UpdateError::InvalidInput(
                "at least one software type must be requested".to_string(),
            ));
        }

        Ok(Self {
            vin: vin.as_str().to_string(),
            software_types: software_types
                .iter()
                .cloned()
                .map(|software_type| SoftwareRequest { software_type })
                .collect(),
        })
    }

    /// Serialize to the JSON payload sent on the wire.
    pub fn to_payload(&self) -> UpdateResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| UpdateError::InvalidInput(format!("unencodable request: {}", e)))
    }
}
