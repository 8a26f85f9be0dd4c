use std::fmt;

use serde_json::{Map, Value};

use crate::types::Device;

/// One observed difference between two snapshots. Only ever logged;
/// entity rendering always re-reads the current cache.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Change {
    Added { device_id: String },
    Removed { device_id: String },
    Updated { device_id: String, field: String, old: Value, new: Value },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Added { device_id } => write!(f, "{device_id}: added"),
            Change::Removed { device_id } => write!(f, "{device_id}: removed"),
            Change::Updated { device_id, field, old, new } => {
                write!(f, "{device_id}: {field} {old} -> {new}")
            }
        }
    }
}

/// Diff two snapshots, matching devices by composite key. Field-level
/// changes walk the serialized record trees so every telemetry field is
/// covered without per-field code.
pub(crate) fn diff_snapshots(previous: &[Device], current: &[Device]) -> Vec<Change> {
    let mut changes = Vec::new();

    for device in current {
        let device_id = device.device_id();
        match previous.iter().find(|p| p.device_id() == device_id) {
            None => changes.push(Change::Added { device_id }),
            Some(prev) => {
                let mut fields = Vec::new();
                diff_value(&record_value(prev), &record_value(device), "", &mut fields);
                for (field, old, new) in fields {
                    changes.push(Change::Updated {
                        device_id: device_id.clone(),
                        field,
                        old,
                        new,
                    });
                }
            }
        }
    }

    for prev in previous {
        let device_id = prev.device_id();
        if !current.iter().any(|d| d.device_id() == device_id) {
            changes.push(Change::Removed { device_id });
        }
    }

    changes
}

pub(crate) fn diff_value(
    previous: &Value,
    current: &Value,
    path_prefix: &str,
    changes: &mut Vec<(String, Value, Value)>,
) {
    match (previous, current) {
        (Value::Object(prev_map), Value::Object(curr_map)) => {
            for (key, curr_val) in curr_map {
                let path = join_path(path_prefix, key);
                match prev_map.get(key) {
                    Some(prev_val) => diff_value(prev_val, curr_val, &path, changes),
                    None => {
                        if curr_val.is_object() {
                            diff_value(&Value::Object(Map::new()), curr_val, &path, changes);
                        } else {
                            changes.push((path, Value::Null, curr_val.clone()));
                        }
                    }
                }
            }
            for (key, prev_val) in prev_map {
                if !curr_map.contains_key(key) {
                    changes.push((join_path(path_prefix, key), prev_val.clone(), Value::Null));
                }
            }
        }
        (prev, curr) if prev != curr => {
            changes.push((path_prefix.to_string(), prev.clone(), curr.clone()));
        }
        _ => {}
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn record_value(device: &Device) -> Value {
    serde_json::to_value(device).unwrap_or(Value::Null)
}
