use std::sync::Arc;

use crate::coordinator::Coordinator;
use crate::types::Device;

pub const MAKER: &str = "AutoPilot";

/// Invoked with an entity's unique id after a successful control write, so
/// the host framework can re-render that entity.
pub type StateChangedCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Registry info for the physical device backing an entity. Built once at
/// discovery from the cached record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub identifier: String,
    pub manufacturer: &'static str,
    pub model: String,
    pub name: String,
}

/// Shared by sensor and number entities: the coordinator handle, the bound
/// composite key and the derived ids. Entities hold no other state; every
/// value is re-derived from the coordinator's current cache.
pub(crate) struct EntityBase {
    pub(crate) coordinator: Arc<Coordinator>,
    pub(crate) device_id: String,
    pub(crate) unique_id: String,
    pub(crate) device_info: DeviceInfo,
}

impl EntityBase {
    pub(crate) fn new(coordinator: Arc<Coordinator>, device: &Device, key: &str) -> Self {
        let device_id = device.device_id();
        Self {
            unique_id: format!("{device_id}-{key}"),
            device_info: DeviceInfo {
                identifier: device_id.clone(),
                manufacturer: MAKER,
                model: device.device_name.clone(),
                name: device.device_name.clone(),
            },
            device_id,
            coordinator,
        }
    }

    pub(crate) fn device(&self) -> Option<Device> {
        self.coordinator.get_device(&self.device_id)
    }
}
