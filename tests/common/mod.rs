#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use poolsync::{Device, DeviceClient, DeviceType, Error, Result, Snapshot};

/// Scripted device client: queued auth/fetch results, recorded writes.
/// Shared through an `Arc` so tests can keep scripting and inspecting it
/// after the coordinator takes ownership.
#[derive(Default)]
pub struct MockClient {
    auth: Mutex<VecDeque<Result<bool>>>,
    fetches: Mutex<VecDeque<Result<Snapshot>>>,
    write_errors: Mutex<VecDeque<Error>>,
    fetch_calls: AtomicUsize,
    writes: Mutex<Vec<(String, u8)>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_auth(&self, result: Result<bool>) {
        self.auth.lock().unwrap().push_back(result);
    }

    pub fn queue_fetch(&self, result: Result<Snapshot>) {
        self.fetches.lock().unwrap().push_back(result);
    }

    pub fn queue_write_error(&self, err: Error) {
        self.write_errors.lock().unwrap().push_back(err);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<(String, u8)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceClient for MockClient {
    async fn is_authenticated(&self) -> Result<bool> {
        self.auth.lock().unwrap().pop_front().unwrap_or(Ok(true))
    }

    async fn fetch_all_devices(&self) -> Result<Snapshot> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::client("fetch queue empty")))
    }

    async fn write_attribute(&self, device: &Device, value: u8) -> Result<()> {
        if let Some(err) = self.write_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.writes.lock().unwrap().push((device.device_id(), value));
        Ok(())
    }
}

pub fn chlor_device(hub: &str, index: u32) -> Device {
    Device {
        hub_id: hub.to_string(),
        device_index: index,
        device_type: DeviceType::ChlorSync,
        device_name: "ChlorSync SWG".to_string(),
        salt_level: Some(3200),
        water_temp: Some(26.5),
        flow_rate: Some(42.0),
        chlor_output: Some(50),
    }
}

pub fn other_device(hub: &str, index: u32) -> Device {
    Device {
        hub_id: hub.to_string(),
        device_index: index,
        device_type: DeviceType::Other("heatPump".to_string()),
        device_name: "Heat Pump".to_string(),
        salt_level: None,
        water_temp: Some(27.0),
        flow_rate: None,
        chlor_output: None,
    }
}
