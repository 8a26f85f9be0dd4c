use std::sync::{Mutex, RwLock};
use std::time::Duration;

use tracing::{debug, error};

use crate::client::DeviceClient;
use crate::diff::diff_snapshots;
use crate::logger::{ActivityLogMode, ActivityLogger};
use crate::types::{Device, DeviceType, Snapshot};
use crate::{Error, Result};

/// Fixed polling cadence. Mutation-triggered refreshes do not reset it.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(30);

type SnapshotCallback = Box<dyn Fn(&[Device]) + Send + Sync>;

pub struct CoordinatorBuilder {
    client: Box<dyn DeviceClient>,
    update_interval: Duration,
    snapshot_callbacks: Vec<SnapshotCallback>,
    log_mode: Option<ActivityLogMode>,
    log_path: Option<String>,
}

impl CoordinatorBuilder {
    pub fn new(client: impl DeviceClient + 'static) -> Self {
        Self {
            client: Box::new(client),
            update_interval: UPDATE_INTERVAL,
            snapshot_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    pub fn update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Called with the new snapshot after every successful refresh.
    pub fn on_snapshot(mut self, f: impl Fn(&[Device]) + Send + Sync + 'static) -> Self {
        self.snapshot_callbacks.push(Box::new(f));
        self
    }

    pub fn activity_log(mut self, mode: ActivityLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Coordinator> {
        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(Mutex::new(ActivityLogger::new(mode, &path)?)),
            _ => None,
        };

        Ok(Coordinator {
            client: self.client,
            devices: RwLock::new(Vec::new()),
            update_interval: self.update_interval,
            snapshot_callbacks: self.snapshot_callbacks,
            logger,
        })
    }
}

/// Owns the most recent successful snapshot and serializes all reads and
/// writes through it. The cache is replaced wholesale on success and left
/// untouched on failure; readers never observe a partial update.
pub struct Coordinator {
    client: Box<dyn DeviceClient>,
    devices: RwLock<Snapshot>,
    update_interval: Duration,
    snapshot_callbacks: Vec<SnapshotCallback>,
    logger: Option<Mutex<ActivityLogger>>,
}

impl Coordinator {
    pub fn builder(client: impl DeviceClient + 'static) -> CoordinatorBuilder {
        CoordinatorBuilder::new(client)
    }

    /// Fetch a fresh snapshot and replace the cache. The old/new diff is
    /// computed for observability only. On failure the cache keeps the
    /// last-known-good snapshot and the error is returned to the scheduler;
    /// retry policy belongs to the caller.
    pub async fn refresh(&self) -> Result<Snapshot> {
        let fetched = match self.client.fetch_all_devices().await {
            Ok(devices) => devices,
            Err(err) => {
                error!(error = %err, "device fetch failed, keeping last snapshot");
                return Err(err);
            }
        };

        let changes = {
            let previous = self.devices.read().expect("devices lock poisoned");
            diff_snapshots(&previous, &fetched)
        };
        if changes.is_empty() {
            debug!("devices updated: no changes");
        } else {
            for change in &changes {
                debug!(%change, "device state changed");
            }
        }

        if let Some(logger) = &self.logger {
            logger
                .lock()
                .expect("logger lock poisoned")
                .log_refresh(&fetched);
        }

        *self.devices.write().expect("devices lock poisoned") = fetched.clone();

        for cb in &self.snapshot_callbacks {
            cb(&fetched);
        }

        Ok(fetched)
    }

    /// First cached device whose composite key matches, if any.
    pub fn get_device(&self, device_id: &str) -> Option<Device> {
        self.devices
            .read()
            .expect("devices lock poisoned")
            .iter()
            .find(|d| d.device_id() == device_id)
            .cloned()
    }

    /// All cached devices, or only those of the given type. Order is the
    /// last fetch's own order.
    pub fn get_devices(&self, device_type: Option<&DeviceType>) -> Vec<Device> {
        self.devices
            .read()
            .expect("devices lock poisoned")
            .iter()
            .filter(|d| device_type.is_none_or(|t| &d.device_type == t))
            .cloned()
            .collect()
    }

    /// Write a new chlorinator output, then perform exactly one refresh.
    /// A write error propagates before the refresh runs; the refresh result
    /// is authoritative over whatever the write echoed.
    pub async fn change_chlor_output(&self, device: &Device, output: u8) -> Result<()> {
        if let Some(logger) = &self.logger {
            logger
                .lock()
                .expect("logger lock poisoned")
                .log_write(&device.device_id(), "chlor_output", output);
        }

        self.client.write_attribute(device, output).await?;
        self.refresh().await?;
        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    pub(crate) async fn verify_auth(&self) -> Result<()> {
        if self.client.is_authenticated().await? {
            Ok(())
        } else {
            Err(Error::AuthFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NullClient;

    #[async_trait]
    impl DeviceClient for NullClient {
        async fn is_authenticated(&self) -> Result<bool> {
            Ok(true)
        }

        async fn fetch_all_devices(&self) -> Result<Snapshot> {
            Ok(Vec::new())
        }

        async fn write_attribute(&self, _device: &Device, _value: u8) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn builder_defaults() {
        let coordinator = Coordinator::builder(NullClient).build().unwrap();
        assert_eq!(coordinator.update_interval(), UPDATE_INTERVAL);
    }

    #[test]
    fn empty_cache_before_first_refresh() {
        let coordinator = Coordinator::builder(NullClient).build().unwrap();
        assert!(coordinator.get_devices(None).is_empty());
        assert!(coordinator.get_device("hub1-0").is_none());
    }
}
