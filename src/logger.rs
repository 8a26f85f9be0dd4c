use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::diff::diff_value;
use crate::types::Device;

pub enum ActivityLogMode {
    Full,
    Diffed,
}

pub(crate) struct ActivityLogger {
    mode: ActivityLogMode,
    file: File,
    previous_state: Option<Value>,
}

impl ActivityLogger {
    pub fn new(mode: ActivityLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            mode,
            file,
            previous_state: None,
        })
    }

    pub fn log_refresh(&mut self, devices: &[Device]) {
        let body = snapshot_value(devices);

        match self.mode {
            ActivityLogMode::Full => {
                let entry = json!({
                    "ts": Utc::now().to_rfc3339(),
                    "dir": "refresh",
                    "body": body,
                });
                self.write_line(&entry);
            }
            ActivityLogMode::Diffed => match self.previous_state.take() {
                None => {
                    let entry = json!({
                        "ts": Utc::now().to_rfc3339(),
                        "dir": "refresh",
                        "full": true,
                        "body": body,
                    });
                    self.write_line(&entry);
                    self.previous_state = Some(body);
                }
                Some(prev) => {
                    let mut changes = Vec::new();
                    diff_value(&prev, &body, "", &mut changes);

                    let change_entries: Vec<Value> = changes
                        .iter()
                        .map(|(path, old, new)| json!({ "path": path, "old": old, "new": new }))
                        .collect();

                    let entry = json!({
                        "ts": Utc::now().to_rfc3339(),
                        "dir": "refresh",
                        "changes": change_entries,
                    });
                    self.write_line(&entry);
                    self.previous_state = Some(body);
                }
            },
        }
    }

    pub fn log_write(&mut self, device_id: &str, attribute: &str, value: u8) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "write",
            "device": device_id,
            "attribute": attribute,
            "value": value,
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}

// Keyed by composite id so diff paths read "hub1-0.salt_level".
fn snapshot_value(devices: &[Device]) -> Value {
    let mut map = Map::new();
    for device in devices {
        map.insert(
            device.device_id(),
            serde_json::to_value(device).unwrap_or(Value::Null),
        );
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceType;
    use std::io::Read;
    use tempfile::NamedTempFile;

    fn chlor_device(salt: u32) -> Device {
        Device {
            hub_id: "hub1".to_string(),
            device_index: 0,
            device_type: DeviceType::ChlorSync,
            device_name: "ChlorSync".to_string(),
            salt_level: Some(salt),
            water_temp: Some(26.5),
            flow_rate: Some(42.0),
            chlor_output: Some(50),
        }
    }

    fn read_lines(path: &str) -> Vec<Value> {
        let mut contents = String::new();
        std::fs::File::open(path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn full_mode_logs_whole_snapshot() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = ActivityLogger::new(ActivityLogMode::Full, path).unwrap();
        logger.log_refresh(&[chlor_device(3200)]);

        let lines = read_lines(path);
        assert_eq!(lines[0]["dir"], "refresh");
        assert_eq!(lines[0]["body"]["hub1-0"]["salt_level"], 3200);
        assert!(lines[0]["ts"].as_str().is_some());
    }

    #[test]
    fn diffed_mode_logs_full_first_then_changes() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = ActivityLogger::new(ActivityLogMode::Diffed, path).unwrap();

        logger.log_refresh(&[chlor_device(3200)]);
        logger.log_refresh(&[chlor_device(3250)]);

        let lines = read_lines(path);
        assert_eq!(lines[0]["full"], true);
        assert!(lines[0]["body"].is_object());
        let changes = lines[1]["changes"].as_array().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0]["path"], "hub1-0.salt_level");
        assert_eq!(changes[0]["old"], 3200);
        assert_eq!(changes[0]["new"], 3250);
    }

    #[test]
    fn diffed_mode_no_changes_logs_empty_array() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = ActivityLogger::new(ActivityLogMode::Diffed, path).unwrap();

        logger.log_refresh(&[chlor_device(3200)]);
        logger.log_refresh(&[chlor_device(3200)]);

        let lines = read_lines(path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["changes"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn write_entry_captures_device_and_value() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = ActivityLogger::new(ActivityLogMode::Full, path).unwrap();
        logger.log_write("hub1-0", "chlor_output", 75);

        let lines = read_lines(path);
        assert_eq!(lines[0]["dir"], "write");
        assert_eq!(lines[0]["device"], "hub1-0");
        assert_eq!(lines[0]["attribute"], "chlor_output");
        assert_eq!(lines[0]["value"], 75);
    }
}
