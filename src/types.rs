use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Capability tag reported by the hub for each attached device.
/// Unknown tags are preserved verbatim so future device lines still
/// round-trip through the cache and the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceType {
    ChlorSync,
    Other(String),
}

impl DeviceType {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceType::ChlorSync => "chlorSync",
            DeviceType::Other(tag) => tag,
        }
    }
}

impl From<&str> for DeviceType {
    fn from(tag: &str) -> Self {
        match tag {
            "chlorSync" => DeviceType::ChlorSync,
            other => DeviceType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeviceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(DeviceType::from(tag.as_str()))
    }
}

/// One device record as reported by a hub. Telemetry fields are optional;
/// which ones are populated depends on the device type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub hub_id: String,
    pub device_index: u32,
    pub device_type: DeviceType,
    pub device_name: String,
    #[serde(default)]
    pub salt_level: Option<u32>,
    #[serde(default)]
    pub water_temp: Option<f64>,
    #[serde(default)]
    pub flow_rate: Option<f64>,
    #[serde(default)]
    pub chlor_output: Option<u8>,
}

impl Device {
    /// Composite key uniquely identifying one physical device in the fleet.
    pub fn device_id(&self) -> String {
        format!("{}-{}", self.hub_id, self.device_index)
    }
}

/// The full set of device records returned by one fetch. Iteration order is
/// the fetch's own order and is not guaranteed stable across fetches.
pub type Snapshot = Vec<Device>;
