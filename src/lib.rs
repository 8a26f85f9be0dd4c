mod client;
mod coordinator;
mod diff;
mod entity;
mod error;
mod logger;
mod number;
mod sensor;
mod setup;
mod types;

pub use client::DeviceClient;
pub use coordinator::{Coordinator, CoordinatorBuilder, UPDATE_INTERVAL};
pub use entity::{DeviceInfo, StateChangedCallback, MAKER};
pub use error::{Error, Result};
pub use logger::ActivityLogMode;
pub use number::{NumberDescription, NumberEntity};
pub use sensor::{SensorDescription, SensorEntity};
pub use setup::{Integration, IntegrationBuilder};
pub use types::{Device, DeviceType, Snapshot};
