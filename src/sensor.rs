use std::sync::Arc;

use crate::coordinator::Coordinator;
use crate::entity::{DeviceInfo, EntityBase};
use crate::types::{Device, DeviceType};

/// Describes one read-only sensor projected from a device record. The
/// accessor is pure; dispatch is resolved once at discovery, not per read.
pub struct SensorDescription {
    pub key: &'static str,
    pub unit: Option<&'static str>,
    pub icon: Option<&'static str>,
    pub value_fn: fn(&Device) -> Option<f64>,
}

static CHLOR_SYNC_SENSORS: [SensorDescription; 3] = [
    SensorDescription {
        key: "salt_level",
        unit: Some("ppm"),
        icon: None,
        value_fn: |device| device.salt_level.map(|v| v as f64),
    },
    SensorDescription {
        key: "water_temp",
        unit: Some("\u{00b0}C"),
        icon: None,
        value_fn: |device| device.water_temp,
    },
    SensorDescription {
        key: "flow_rate",
        unit: None,
        icon: Some("mdi:water-sync"),
        value_fn: |device| device.flow_rate,
    },
];

pub(crate) fn descriptions(device_type: &DeviceType) -> &'static [SensorDescription] {
    match device_type {
        DeviceType::ChlorSync => &CHLOR_SYNC_SENSORS,
        DeviceType::Other(_) => &[],
    }
}

pub struct SensorEntity {
    base: EntityBase,
    description: &'static SensorDescription,
}

impl SensorEntity {
    pub fn unique_id(&self) -> &str {
        &self.base.unique_id
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.base.device_info
    }

    pub fn key(&self) -> &'static str {
        self.description.key
    }

    pub fn unit(&self) -> Option<&'static str> {
        self.description.unit
    }

    pub fn icon(&self) -> Option<&'static str> {
        self.description.icon
    }

    /// Pure projection over the currently cached device; `None` when the
    /// device is absent from the cache.
    pub fn value(&self) -> Option<f64> {
        self.base
            .device()
            .and_then(|device| (self.description.value_fn)(&device))
    }
}

/// One entity per (device, description) pair for every capable device in
/// the current cache.
pub fn discover(coordinator: &Arc<Coordinator>) -> Vec<SensorEntity> {
    let mut entities = Vec::new();
    for device in coordinator.get_devices(None) {
        for description in descriptions(&device.device_type) {
            entities.push(SensorEntity {
                base: EntityBase::new(coordinator.clone(), &device, description.key),
                description,
            });
        }
    }
    entities
}
