use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use poolsync::{Device, DeviceClient, DeviceType, Integration, Result, Snapshot};

/// Stand-in for the vendor cloud: one hub with a single ChlorSync unit
/// whose telemetry drifts a little on every fetch.
struct SimulatedHub {
    tick: Mutex<u32>,
    chlor_output: Mutex<u8>,
}

#[async_trait]
impl DeviceClient for SimulatedHub {
    async fn is_authenticated(&self) -> Result<bool> {
        Ok(true)
    }

    async fn fetch_all_devices(&self) -> Result<Snapshot> {
        let mut tick = self.tick.lock().expect("tick lock poisoned");
        *tick += 1;
        let phase = (*tick % 8) as f64;
        let output = *self.chlor_output.lock().expect("output lock poisoned");

        Ok(vec![Device {
            hub_id: "hub1".to_string(),
            device_index: 0,
            device_type: DeviceType::ChlorSync,
            device_name: "ChlorSync SWG".to_string(),
            salt_level: Some(3200 + (*tick % 3) * 25),
            water_temp: Some(26.0 + phase * 0.25),
            flow_rate: Some(42.0),
            chlor_output: Some(output),
        }])
    }

    async fn write_attribute(&self, _device: &Device, value: u8) -> Result<()> {
        *self.chlor_output.lock().expect("output lock poisoned") = value;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let hub = SimulatedHub {
        tick: Mutex::new(0),
        chlor_output: Mutex::new(50),
    };

    let integration = Integration::builder(hub)
        .update_interval(Duration::from_secs(5))
        .on_snapshot(|devices| {
            for device in devices {
                println!(
                    "[{}] salt: {:?} ppm | water: {:?} \u{00b0}C | flow: {:?} | output: {:?} %",
                    device.device_name,
                    device.salt_level,
                    device.water_temp,
                    device.flow_rate,
                    device.chlor_output,
                );
            }
        })
        .on_state_changed(|unique_id| {
            println!("state changed: {unique_id}");
        })
        .setup()
        .await?;

    println!("Integration up. Sensors:");
    for sensor in integration.sensors() {
        println!(
            "  {} = {:?} {}",
            sensor.unique_id(),
            sensor.value(),
            sensor.unit().unwrap_or(""),
        );
    }

    for num in integration.numbers() {
        println!("Raising {} to 75%", num.unique_id());
        num.set_value(75.0).await?;
    }

    tokio::time::sleep(Duration::from_secs(20)).await;
    integration.shutdown();
    Ok(())
}
