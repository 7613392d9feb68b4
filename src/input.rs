//! # Input events and devices
//!
//! The joystick itself is an external collaborator: device discovery and raw
//! event capture happen behind the [InputBackend] trait and reach this crate
//! as discrete [InputEvent]s keyed by device-specific axis/button indices.
//! The [controller](crate::Controller) resolves those indices to semantic
//! keys through an [InputMap](crate::mapping::InputMap) and merges the values
//! into an [InputState] record once per polling cycle.

use crate::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// An input device as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Backend-specific device index, valid for [InputBackend::open()].
    pub id: usize,
    /// Human readable device name.
    pub name: String,
}

/// A discrete event read from the opened input device.
///
/// Axis values are in the range `[-1, 1]` before mapping; the mapping scale
/// sets direction and magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// An axis moved to a new position.
    AxisMoved {
        /// Device-specific axis index.
        axis: u32,
        /// Axis position in `[-1, 1]`.
        value: f32,
    },
    /// A button was pressed.
    ButtonPressed {
        /// Device-specific button index.
        button: u32,
    },
    /// A button was released.
    ButtonReleased {
        /// Device-specific button index.
        button: u32,
    },
}

/// # Input backend
///
/// Seam to the external joystick API. Implementations wrap whatever input
/// library the host uses and translate its events into [InputEvent]s.
///
/// `events()` drains everything received since the previous call and may
/// return an empty vector; it must not block waiting for new events, the
/// polling cadence is owned by the caller.
#[async_trait]
pub trait InputBackend: Send {
    /// List all the available devices.
    fn devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Open the device with the given id. Subsequent `events()` calls read
    /// from it.
    fn open(&mut self, device_id: usize) -> Result<()>;

    /// Drain the events received since the last call.
    async fn events(&mut self) -> Result<Vec<InputEvent>>;
}

/// Merged operator input state, the value produced by one polling cycle.
///
/// The trim fields are one-shot: they are zeroed at the start of every cycle
/// and only carry the value of a trim event received during that cycle.
///
/// Whether the scripted overlay is engaged is not part of this record, it is
/// a [mode](crate::Mode) owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    /// Roll command, `[-1, 1]`.
    pub roll: f32,
    /// Pitch command, `[-1, 1]`.
    pub pitch: f32,
    /// Yaw command, `[-1, 1]`.
    pub yaw: f32,
    /// Thrust command, `[-1, 1]`.
    pub thrust: f32,
    /// One-shot roll trim step.
    pub roll_cal: f32,
    /// One-shot pitch trim step.
    pub pitch_cal: f32,
    /// Emergency stop toggle.
    pub estop: bool,
    /// Altitude hold toggle.
    pub alt_hold: bool,
}

/// Raw axis and button values read without mapping.
///
/// Used by configuration wizards to let the user identify which physical
/// axis or button they are moving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSample {
    /// Last seen position per axis index.
    pub axes: BTreeMap<u32, f32>,
    /// Pressed state per button index.
    pub buttons: BTreeMap<u32, bool>,
}
