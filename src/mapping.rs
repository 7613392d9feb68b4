//! # Input mapping
//!
//! Joystick events arrive keyed by device-specific axis and button indices.
//! An [InputMap] resolves those indices to semantic [InputKey]s, each with a
//! scale that sets direction and magnitude. Events whose index is not in the
//! map are ignored by the caller, no record is kept of them.
//!
//! Maps can be built programmatically or loaded from the JSON documents the
//! PC client writes, which look like:
//!
//! ```json
//! {
//!   "inputconfig": {
//!     "inputdevice": {
//!       "updateperiod": 10,
//!       "name": "PS3_Mode_1",
//!       "axis": [
//!         { "scale": -1.0, "type": "Input.AXIS", "name": "pitch", "key": "pitch", "id": 3 },
//!         { "scale": 1.0, "type": "Input.BUTTON", "name": "exit", "key": "exit", "id": 15 }
//!       ]
//!     }
//!   }
//! }
//! ```

use crate::Result;
use serde::Deserialize;
use std::collections::HashMap;

/// Semantic input keys the mapping can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Roll axis.
    Roll,
    /// Pitch axis.
    Pitch,
    /// Yaw axis.
    Yaw,
    /// Thrust axis.
    Thrust,
    /// One-shot pitch trim.
    PitchCal,
    /// One-shot roll trim.
    RollCal,
    /// Emergency stop toggle button.
    Estop,
    /// Toggles the scripted autopilot overlay.
    Exit,
    /// Altitude hold toggle button.
    AltHold,
}

impl InputKey {
    /// Resolve a key name as used in the client config documents.
    pub fn from_name(name: &str) -> Option<InputKey> {
        match name {
            "roll" => Some(InputKey::Roll),
            "pitch" => Some(InputKey::Pitch),
            "yaw" => Some(InputKey::Yaw),
            "thrust" => Some(InputKey::Thrust),
            "pitchcal" => Some(InputKey::PitchCal),
            "rollcal" => Some(InputKey::RollCal),
            "estop" => Some(InputKey::Estop),
            "exit" => Some(InputKey::Exit),
            "althold" => Some(InputKey::AltHold),
            _ => None,
        }
    }
}

/// Mapping of one device axis to a semantic key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMapping {
    /// Semantic key receiving the axis value.
    pub key: InputKey,
    /// Multiplier applied to the raw `[-1, 1]` axis value.
    pub scale: f32,
}

/// Mapping of one device button to a semantic key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonMapping {
    /// Semantic key triggered by the button.
    pub key: InputKey,
    /// Value written by trim buttons; toggle buttons ignore it.
    pub scale: f32,
}

/// # Input map
///
/// Resolves device-specific axis/button indices to [semantic keys](InputKey).
/// Lookups for unmapped indices return `None`.
#[derive(Debug, Clone, Default)]
pub struct InputMap {
    axes: HashMap<u32, AxisMapping>,
    buttons: HashMap<u32, ButtonMapping>,
}

// On-disk document shape. Unknown fields (name, updateperiod, ...) are
// accepted and ignored.
#[derive(Deserialize)]
struct ConfigDocument {
    inputconfig: InputConfig,
}

#[derive(Deserialize)]
struct InputConfig {
    inputdevice: InputDeviceConfig,
}

#[derive(Deserialize)]
struct InputDeviceConfig {
    #[serde(default)]
    axis: Vec<MappingEntry>,
}

#[derive(Deserialize)]
struct MappingEntry {
    #[serde(rename = "type")]
    kind: String,
    key: String,
    id: u32,
    #[serde(default = "default_scale")]
    scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

const AXIS_KIND: &str = "Input.AXIS";
const BUTTON_KIND: &str = "Input.BUTTON";

impl InputMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Default::default()
    }

    /// Map a device axis to a semantic key.
    pub fn map_axis(&mut self, axis: u32, key: InputKey, scale: f32) {
        self.axes.insert(axis, AxisMapping { key, scale });
    }

    /// Map a device button to a semantic key.
    pub fn map_button(&mut self, button: u32, key: InputKey, scale: f32) {
        self.buttons.insert(button, ButtonMapping { key, scale });
    }

    /// Look up the mapping for an axis index.
    pub fn axis(&self, axis: u32) -> Option<AxisMapping> {
        self.axes.get(&axis).copied()
    }

    /// Look up the mapping for a button index.
    pub fn button(&self, button: u32) -> Option<ButtonMapping> {
        self.buttons.get(&button).copied()
    }

    /// True if no axis or button is mapped.
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty() && self.buttons.is_empty()
    }

    /// Load a map from a client input-config JSON document.
    ///
    /// A document that does not parse is a
    /// [ConfigError](crate::Error::ConfigError). Entries with an unknown
    /// `key` or `type` are skipped, a partially usable document still loads.
    pub fn from_json_str(document: &str) -> Result<Self> {
        let document: ConfigDocument = serde_json::from_str(document)?;

        let mut map = InputMap::new();
        for entry in document.inputconfig.inputdevice.axis {
            let key = match InputKey::from_name(&entry.key) {
                Some(key) => key,
                None => {
                    log::debug!("ignoring unknown input key '{}'", entry.key);
                    continue;
                }
            };
            match entry.kind.as_str() {
                AXIS_KIND => map.map_axis(entry.id, key, entry.scale),
                BUTTON_KIND => map.map_button(entry.id, key, entry.scale),
                other => log::debug!("ignoring unknown mapping type '{}'", other),
            }
        }

        Ok(map)
    }
}
