//! # Controller tuning
//!
//! The flight controller's gains are uploaded from the ground once the
//! connection is up, so every flight starts from a known tuning whatever is
//! left in the firmware from the previous session. The [TuningTable] holds
//! the full set as `"group.name"` → [Value](crate::Value) entries;
//! [Controller::upload_tuning()](crate::Controller::upload_tuning) pushes it
//! on the parameter uplink.

use crate::Value;
use std::collections::BTreeMap;

/// Parameter receiving the sequencer's altitude-target offset, pushed once
/// per polling tick while the overlay is engaged.
pub const ALT_TARGET_PARAM: &str = "altHold.targetOffset";

/// A named parameter write for the uplink.
///
/// The transport on the other side of the uplink delivers these to the
/// flight controller. Delivery is fire-and-forget from the sender's point of
/// view.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRequest {
    /// Parameter name, `"group.name"`.
    pub name: String,
    /// Value to write.
    pub value: Value,
}

impl ParamRequest {
    /// Create a request from a name and anything convertible to a [Value].
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        ParamRequest {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The string form accepted by the parameter sink.
    pub fn wire_value(&self) -> String {
        self.value.to_string()
    }
}

/// # Tuning table
///
/// Ordered name → value table of controller gains. `Default` carries the
/// stock set; hosts tweak individual entries with [set](TuningTable::set)
/// before uploading.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningTable {
    entries: BTreeMap<String, Value>,
}

impl TuningTable {
    /// Create a table with no entries.
    pub fn empty() -> Self {
        TuningTable {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Value of an entry, if present.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.get(name).copied()
    }

    /// Iterate the entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the names of all the entries.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl Default for TuningTable {
    /// The stock gain set, matching the firmware defaults from pid.h plus
    /// the altitude-hold tuning used for scripted flights.
    fn default() -> Self {
        let mut table = TuningTable::empty();

        table.set("pid_rate.pitch_kp", 70.0f32);
        table.set("pid_rate.pitch_kd", 0.0f32);
        table.set("pid_rate.pitch_ki", 0.0f32);
        table.set("pid_rate.roll_kp", 70.0f32);
        table.set("pid_rate.roll_kd", 0.0f32);
        table.set("pid_rate.roll_ki", 0.0f32);
        table.set("pid_rate.yaw_kp", 50.0f32);
        table.set("pid_rate.yaw_kd", 0.0f32);
        table.set("pid_rate.yaw_ki", 25.0f32);

        table.set("pid_attitude.pitch_kp", 3.5f32);
        table.set("pid_attitude.pitch_kd", 0.0f32);
        table.set("pid_attitude.pitch_ki", 6.0f32);
        table.set("pid_attitude.roll_kp", 3.5f32);
        table.set("pid_attitude.roll_kd", 0.0f32);
        table.set("pid_attitude.roll_ki", 6.0f32);
        table.set("pid_attitude.yaw_kp", 0.0f32);
        table.set("pid_attitude.yaw_kd", 0.0f32);
        table.set("pid_attitude.yaw_ki", 0.0f32);

        table.set("sensorfusion6.kp", 0.8f32);
        table.set("sensorfusion6.ki", 0.002f32);
        table.set("imu_acc_lpf.factor", 32u8);

        table.set("altHold.kp", 0.05f32);
        table.set("altHold.ki", 0.08f32);
        table.set("altHold.kd", 0.01f32);
        table.set("altHold.hoverKp", 0.5f32);
        table.set("altHold.hoverKi", 0.1f32);
        table.set("altHold.hoverKd", 0.01f32);
        table.set("altHold.altEstKp1", 0.8f32);
        table.set("altHold.altEstKp2", 1.0f32);
        table.set("altHold.altEstKi", 0.001f32);

        table
    }
}
