//! # Crazyflie autopilot client
//!
//! This crate is a ground-side joystick frontend for the Crazyflie with a
//! scripted autopilot overlay: a mapped button engages a timer-driven
//! takeoff → hover → land → repeat cycle that takes over thrust, yaw and
//! altitude hold while roll and pitch stay with the operator.
//!
//! The crate is organized around one [Controller] and a few support modules:
//!
//! | Module | Role |
//! |--------|------|
//! | [sequencer] | Timer-driven flight-phase sequencer, the scripted cycle |
//! | [input] | Input events, device enumeration and the backend seam |
//! | [mapping] | Device axis/button index → semantic key resolution |
//! | [tuning] | Controller gain table and parameter uplink requests |
//!
//! The joystick API and the parameter transport are external: the joystick
//! is wrapped in an [input::InputBackend] implementation, and parameter
//! writes leave the crate on a `flume` channel of
//! [tuning::ParamRequest]s that the host's transport layer delivers to the
//! flight controller.
//!
//! ## Usage
//!
//! The basic procedure is:
//!  - Wrap the host's joystick library in an [input::InputBackend]
//!  - Build an [mapping::InputMap], programmatically or from a client
//!    input-config JSON document
//!  - Create a [Controller] with a [sequencer::FlightPlan] and the parameter
//!    uplink channel
//!  - Upload the tuning table once the flight controller connection is up
//!  - Poll [Controller::read_input()] and turn the returned states into
//!    setpoints, or let [Controller::run()] own the cadence
//!
//! ``` no_run
//! use crazyflie_autopilot::input::{DeviceInfo, InputBackend, InputEvent};
//! use crazyflie_autopilot::mapping::{InputKey, InputMap};
//! use crazyflie_autopilot::sequencer::FlightPlan;
//! use crazyflie_autopilot::Controller;
//!
//! # struct Gamepad;
//! # #[async_trait::async_trait]
//! # impl InputBackend for Gamepad {
//! #     fn devices(&self) -> crazyflie_autopilot::Result<Vec<DeviceInfo>> { Ok(vec![]) }
//! #     fn open(&mut self, _device_id: usize) -> crazyflie_autopilot::Result<()> { Ok(()) }
//! #     async fn events(&mut self) -> crazyflie_autopilot::Result<Vec<InputEvent>> { Ok(vec![]) }
//! # }
//! # async fn fly() -> Result<(), crazyflie_autopilot::Error> {
//! let mut map = InputMap::new();
//! map.map_axis(2, InputKey::Roll, 1.0);
//! map.map_axis(3, InputKey::Pitch, -1.0);
//! map.map_axis(1, InputKey::Thrust, -1.0);
//! map.map_button(15, InputKey::Exit, 1.0);
//!
//! let (param_uplink, param_requests) = flume::unbounded();
//! let mut controller =
//!     Controller::new(Box::new(Gamepad), map, FlightPlan::default(), param_uplink);
//!
//! controller.upload_tuning().await?;
//! loop {
//!     let state = controller.read_input().await?;
//!     // Forward `state` to the setpoint sender and drain `param_requests`
//!     // into the parameter transport.
//!     # let _ = (&state, &param_requests);
//! }
//! # }
//! ```

#![warn(missing_docs)]

mod controller;
mod error;
mod value;

pub mod input;
pub mod mapping;
pub mod sequencer;
pub mod tuning;

pub use crate::controller::{Command, Controller, FlightEvent, Mode};
pub use crate::error::{Error, Result};
pub use crate::value::{Value, ValueType};

use async_executors::{LocalSpawnHandle, Timer};

/// Async executor trait
///
/// This trait is implemented in the `async_executors` crate for common async
/// executors. The [Controller::run()] polling service spawns its task
/// through it.
pub trait Executor: LocalSpawnHandle<()> + Timer + 'static {}

// Until trait alias makes it in stable rust, we need an empty implementation
// for this trait ...
impl<U> Executor for U where U: LocalSpawnHandle<()> + Timer + 'static {}
