use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::client::DeviceClient;
use crate::coordinator::{Coordinator, CoordinatorBuilder};
use crate::entity::StateChangedCallback;
use crate::logger::ActivityLogMode;
use crate::number::{self, NumberEntity};
use crate::sensor::{self, SensorEntity};
use crate::types::Device;
use crate::Result;

pub struct IntegrationBuilder {
    coordinator: CoordinatorBuilder,
    on_state_changed: Option<StateChangedCallback>,
}

impl IntegrationBuilder {
    pub fn new(client: impl DeviceClient + 'static) -> Self {
        Self {
            coordinator: CoordinatorBuilder::new(client),
            on_state_changed: None,
        }
    }

    pub fn update_interval(mut self, interval: Duration) -> Self {
        self.coordinator = self.coordinator.update_interval(interval);
        self
    }

    pub fn on_snapshot(mut self, f: impl Fn(&[Device]) + Send + Sync + 'static) -> Self {
        self.coordinator = self.coordinator.on_snapshot(f);
        self
    }

    pub fn activity_log(mut self, mode: ActivityLogMode, path: impl Into<String>) -> Self {
        self.coordinator = self.coordinator.activity_log(mode, path);
        self
    }

    pub fn on_state_changed(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_state_changed = Some(Arc::new(f));
        self
    }

    /// Completes only after the credentials check and the first refresh
    /// succeed. Rejected credentials abort with `Error::AuthFailed`; a
    /// failed check or failed first refresh propagates the transient error
    /// so the caller can retry setup later.
    pub async fn setup(self) -> Result<Integration> {
        let coordinator = Arc::new(self.coordinator.build()?);

        coordinator.verify_auth().await?;
        coordinator.refresh().await?;

        let sensors = sensor::discover(&coordinator);
        let numbers = number::discover(&coordinator, self.on_state_changed);

        let poll_task = tokio::spawn(poll_loop(coordinator.clone()));

        Ok(Integration {
            coordinator,
            sensors,
            numbers,
            poll_task,
        })
    }
}

async fn poll_loop(coordinator: Arc<Coordinator>) {
    let mut ticker = tokio::time::interval(coordinator.update_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the interval fires immediately; setup already did the first refresh
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if let Err(err) = coordinator.refresh().await {
            warn!(error = %err, "update failed, retrying at next interval");
        }
    }
}

/// One live integration instance: the coordinator, its discovered entities
/// and the background poll task.
pub struct Integration {
    coordinator: Arc<Coordinator>,
    sensors: Vec<SensorEntity>,
    numbers: Vec<NumberEntity>,
    poll_task: JoinHandle<()>,
}

impl std::fmt::Debug for Integration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integration")
            .field("sensors", &self.sensors.len())
            .field("numbers", &self.numbers.len())
            .finish_non_exhaustive()
    }
}

impl Integration {
    pub fn builder(client: impl DeviceClient + 'static) -> IntegrationBuilder {
        IntegrationBuilder::new(client)
    }

    pub fn coordinator(&self) -> Arc<Coordinator> {
        self.coordinator.clone()
    }

    pub fn sensors(&self) -> &[SensorEntity] {
        &self.sensors
    }

    pub fn numbers(&self) -> &[NumberEntity] {
        &self.numbers
    }

    /// Stops the polling task. Entities keep serving the last snapshot.
    pub fn shutdown(self) {
        self.poll_task.abort();
    }
}
