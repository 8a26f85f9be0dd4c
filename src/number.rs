use std::sync::Arc;

use crate::coordinator::Coordinator;
use crate::entity::{DeviceInfo, EntityBase, StateChangedCallback};
use crate::types::{Device, DeviceType};
use crate::{Error, Result};

/// Describes one writable numeric control. Reads go through the pure
/// accessor; writes go through the coordinator's mutation pathway.
pub struct NumberDescription {
    pub key: &'static str,
    pub unit: Option<&'static str>,
    pub icon: Option<&'static str>,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value_fn: fn(&Device) -> Option<f64>,
}

static CHLOR_OUTPUT: NumberDescription = NumberDescription {
    key: "chlor_output",
    unit: Some("%"),
    icon: Some("mdi:waves-arrow-up"),
    min: 0.0,
    max: 100.0,
    step: 1.0,
    value_fn: |device| device.chlor_output.map(f64::from),
};

pub(crate) fn descriptions(device_type: &DeviceType) -> &'static [NumberDescription] {
    match device_type {
        DeviceType::ChlorSync => std::slice::from_ref(&CHLOR_OUTPUT),
        DeviceType::Other(_) => &[],
    }
}

pub struct NumberEntity {
    base: EntityBase,
    description: &'static NumberDescription,
    on_state_changed: Option<StateChangedCallback>,
}

impl NumberEntity {
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

    pub fn min(&self) -> f64 {
        self.description.min
    }

    pub fn max(&self) -> f64 {
        self.description.max
    }

    pub fn step(&self) -> f64 {
        self.description.step
    }

    pub fn value(&self) -> Option<f64> {
        self.base
            .device()
            .and_then(|device| (self.description.value_fn)(&device))
    }

    /// Forward the requested value through the coordinator, then signal the
    /// host that this entity should re-render. Write-path errors propagate
    /// unsuppressed.
    pub async fn set_value(&self, value: f64) -> Result<()> {
        if value < self.description.min || value > self.description.max {
            return Err(Error::InvalidOutput {
                value,
                min: self.description.min,
                max: self.description.max,
            });
        }

        let device = self
            .base
            .device()
            .ok_or_else(|| Error::UnknownDevice(self.base.device_id.clone()))?;

        self.base
            .coordinator
            .change_chlor_output(&device, value.round() as u8)
            .await?;

        if let Some(cb) = &self.on_state_changed {
            cb(&self.base.unique_id);
        }
        Ok(())
    }
}

/// One entity per (device, description) pair for every capable device in
/// the current cache.
pub fn discover(
    coordinator: &Arc<Coordinator>,
    on_state_changed: Option<StateChangedCallback>,
) -> Vec<NumberEntity> {
    let mut entities = Vec::new();
    for device in coordinator.get_devices(None) {
        for description in descriptions(&device.device_type) {
            entities.push(NumberEntity {
                base: EntityBase::new(coordinator.clone(), &device, description.key),
                description,
                on_state_changed: on_state_changed.clone(),
            });
        }
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chlor_output_bounds() {
        let table = descriptions(&DeviceType::ChlorSync);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].key, "chlor_output");
        assert_eq!(table[0].min, 0.0);
        assert_eq!(table[0].max, 100.0);
        assert_eq!(table[0].step, 1.0);
    }

    #[test]
    fn unknown_type_has_no_number_descriptions() {
        let ty = DeviceType::Other("heatPump".to_string());
        assert!(descriptions(&ty).is_empty());
    }

    #[test]
    fn accessor_projects_output_percentage() {
        let device = Device {
            hub_id: "hub1".to_string(),
            device_index: 0,
            device_type: DeviceType::ChlorSync,
            device_name: "ChlorSync".to_string(),
            salt_level: None,
            water_temp: None,
            flow_rate: None,
            chlor_output: Some(75),
        };
        assert_eq!((CHLOR_OUTPUT.value_fn)(&device), Some(75.0));
    }
}
