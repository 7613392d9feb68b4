use crate::input::{DeviceInfo, InputBackend, InputEvent, InputState, RawSample};
use crate::mapping::{InputKey, InputMap};
use crate::sequencer::{FlightPlan, Phase, Sequencer};
use crate::tuning::{ParamRequest, TuningTable, ALT_TARGET_PARAM};
use crate::{Error, Executor, Result};
use async_executors::{JoinHandle, LocalSpawnHandleExt, TimerExt};
use flume as channel;
use std::time::{Duration, Instant};

// Ring size of the flight-event broadcast. Listeners that lag further than
// this lose the oldest events.
const EVENT_BACKLOG: usize = 64;

/// Whether the scripted overlay is driving thrust, yaw and altitude hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Operator input passes through unmodified.
    Manual,
    /// The sequencer overlays thrust/yaw/altitude-hold each tick.
    Auto,
}

/// Notifications broadcast by the controller.
///
/// Subscribe with [Controller::watch_events()]. Delivery is best effort:
/// events are dropped rather than ever stalling the input loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightEvent {
    /// The overlay was engaged.
    Engaged,
    /// The overlay was disengaged, operator input passes through again.
    Disengaged,
    /// The sequencer entered a new phase.
    PhaseEntered(Phase),
    /// The emergency stop toggle changed.
    EmergencyStop(bool),
    /// The altitude hold toggle changed.
    AltHold(bool),
}

/// Commands accepted by the [polling service](Controller::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Engage the scripted overlay.
    Engage,
    /// Disengage the scripted overlay.
    Disengage,
    /// Upload the tuning table to the flight controller.
    UploadTuning,
    /// End the polling service.
    Stop,
}

/// # Input controller
///
/// Reads the joystick through an [InputBackend], resolves events with an
/// [InputMap] and merges them into an [InputState] once per polling cycle.
/// While engaged, a [Sequencer] overlays the scripted flight onto the merged
/// state and the altitude-target offset is pushed on the parameter uplink
/// every tick.
///
/// The controller assumes a single polling loop. Either the host calls
/// [read_input()](Controller::read_input) at its own cadence, or it hands the
/// controller to [run()](Controller::run) and consumes the state channel.
pub struct Controller {
    backend: Box<dyn InputBackend>,
    map: InputMap,
    state: InputState,
    sequencer: Sequencer,
    mode: Mode,
    tuning: TuningTable,
    uplink: channel::Sender<ParamRequest>,
    event_tx: async_broadcast::Sender<FlightEvent>,
    event_rx: async_broadcast::Receiver<FlightEvent>,
    epoch: Instant,
    last_phase: Option<Phase>,
}

impl Controller {
    /// Create a controller.
    ///
    /// `uplink` is the channel to the external parameter transport; the
    /// receiving side delivers [ParamRequest]s to the flight controller. The
    /// tuning table starts from [TuningTable::default()].
    pub fn new(
        backend: Box<dyn InputBackend>,
        map: InputMap,
        plan: FlightPlan,
        uplink: channel::Sender<ParamRequest>,
    ) -> Self {
        let (event_tx, event_rx) = async_broadcast::broadcast(EVENT_BACKLOG);

        Controller {
            backend,
            map,
            state: InputState::default(),
            sequencer: Sequencer::new(plan),
            mode: Mode::Manual,
            tuning: TuningTable::default(),
            uplink,
            event_tx,
            event_rx,
            epoch: Instant::now(),
            last_phase: None,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The state produced by the last polling cycle.
    pub fn state(&self) -> InputState {
        self.state
    }

    /// The tuning table uploaded by [upload_tuning()](Controller::upload_tuning).
    pub fn tuning(&self) -> &TuningTable {
        &self.tuning
    }

    /// Mutable access to the tuning table, to tweak gains before uploading.
    pub fn tuning_mut(&mut self) -> &mut TuningTable {
        &mut self.tuning
    }

    /// Subscribe to [FlightEvent]s. Each receiver sees every event broadcast
    /// after it subscribed, up to the backlog size.
    pub fn watch_events(&self) -> async_broadcast::Receiver<FlightEvent> {
        self.event_rx.clone()
    }

    /// List all the available input devices.
    pub fn devices(&self) -> Result<Vec<DeviceInfo>> {
        self.backend.devices()
    }

    /// Open the input device to read from.
    pub fn open_device(&mut self, device_id: usize) -> Result<()> {
        self.backend.open(device_id)
    }

    /// Engage the scripted overlay.
    ///
    /// The sequencer rewinds to a fresh cycle, so every engagement replays
    /// the same flight from pre-takeoff. Engaging while engaged is a no-op.
    pub fn engage(&mut self) {
        if self.mode == Mode::Auto {
            return;
        }
        self.mode = Mode::Auto;
        self.sequencer.reset();
        self.last_phase = None;
        log::info!("autopilot engaged");
        self.notify(FlightEvent::Engaged);
    }

    /// Disengage the scripted overlay and return control to the operator.
    ///
    /// The sequencer is reset and the overlay-driven outputs are zeroed:
    /// thrust and yaw return to zero and altitude hold is cleared, so the
    /// next cycle's state carries raw operator input only. Disengaging while
    /// disengaged is a no-op.
    pub fn disengage(&mut self) {
        if self.mode == Mode::Manual {
            return;
        }
        self.mode = Mode::Manual;
        self.sequencer.reset();
        self.state.thrust = 0.0;
        self.state.yaw = 0.0;
        self.state.alt_hold = false;
        self.last_phase = None;
        log::info!("autopilot disengaged");
        self.notify(FlightEvent::Disengaged);
    }

    /// Upload the whole tuning table to the flight controller.
    ///
    /// The host calls this once the connection is up. Entries are pushed in
    /// name order; a closed uplink is [Error::Disconnected].
    pub async fn upload_tuning(&self) -> Result<()> {
        for (name, value) in self.tuning.iter() {
            self.uplink
                .send_async(ParamRequest::new(name, value))
                .await
                .map_err(|_| Error::Disconnected)?;
        }
        log::info!("uploaded {} controller parameters", self.tuning.len());
        Ok(())
    }

    /// Run one polling cycle and return the merged input state.
    ///
    /// Drains the backend's pending events, zeroes the one-shot trim fields,
    /// merges mapped events into the state and, while engaged, applies the
    /// sequencer overlay. Events with unmapped indices are ignored.
    pub async fn read_input(&mut self) -> Result<InputState> {
        let events = self.backend.events().await?;

        // Trim is one-shot, it must not survive the read cycle.
        self.state.pitch_cal = 0.0;
        self.state.roll_cal = 0.0;

        for event in events {
            self.apply(event);
        }

        if self.mode == Mode::Auto {
            self.overlay();
        }

        Ok(self.state)
    }

    /// Read raw values without mapping, for configuration wizards.
    pub async fn read_raw(&mut self) -> Result<RawSample> {
        let mut sample = RawSample::default();

        for event in self.backend.events().await? {
            match event {
                InputEvent::AxisMoved { axis, value } => {
                    sample.axes.insert(axis, value);
                }
                InputEvent::ButtonPressed { button } => {
                    sample.buttons.insert(button, true);
                }
                InputEvent::ButtonReleased { button } => {
                    sample.buttons.insert(button, false);
                }
            }
        }

        Ok(sample)
    }

    /// Start the polling service.
    ///
    /// Spawns a local task that runs one [read_input()](Controller::read_input)
    /// cycle every `period` and forwards the merged state on the returned
    /// channel; the host layer turns those states into setpoints. Commands
    /// arriving between polls are applied before the next cycle.
    ///
    /// The task ends on [Command::Stop], when the command channel closes or
    /// when the state receiver is dropped. Dropping the returned handle
    /// cancels the task.
    pub async fn run(
        mut self,
        executor: impl Executor + Clone,
        period: Duration,
        commands: channel::Receiver<Command>,
    ) -> Result<(JoinHandle<()>, channel::Receiver<InputState>)> {
        let (state_tx, state_rx) = channel::unbounded();
        let timer = executor.clone();

        let handle = executor.spawn_handle_local(async move {
            loop {
                match timer.timeout(period, commands.recv_async()).await {
                    Ok(Ok(Command::Engage)) => self.engage(),
                    Ok(Ok(Command::Disengage)) => self.disengage(),
                    Ok(Ok(Command::UploadTuning)) => {
                        if let Err(e) = self.upload_tuning().await {
                            log::warn!("tuning upload failed: {}", e);
                        }
                    }
                    Ok(Ok(Command::Stop)) => return,
                    Err(async_executors::TimeoutError) => (),
                    Ok(Err(channel::RecvError::Disconnected)) => return,
                }

                let state = match self.read_input().await {
                    Ok(state) => state,
                    Err(e) => {
                        log::warn!("input read failed: {}", e);
                        return;
                    }
                };

                if state_tx.send_async(state).await.is_err() {
                    return;
                }
            }
        })?;

        Ok((handle, state_rx))
    }

    fn toggle_autopilot(&mut self) {
        match self.mode {
            Mode::Manual => self.engage(),
            Mode::Auto => self.disengage(),
        }
    }

    fn notify(&mut self, event: FlightEvent) {
        if self.event_tx.try_broadcast(event).is_err() {
            // Ring full (or closed): drop the oldest so fresh events win.
            let _ = self.event_rx.try_recv();
            let _ = self.event_tx.try_broadcast(event);
        }
    }

    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::AxisMoved { axis, value } => {
                let mapping = match self.map.axis(axis) {
                    Some(mapping) => mapping,
                    // Axis not mapped, ignore.
                    None => return,
                };
                let value = value * mapping.scale;
                match mapping.key {
                    InputKey::Roll => self.state.roll = value,
                    InputKey::Pitch => self.state.pitch = value,
                    InputKey::Yaw => self.state.yaw = value,
                    InputKey::Thrust => self.state.thrust = value,
                    InputKey::PitchCal => self.state.pitch_cal = value,
                    InputKey::RollCal => self.state.roll_cal = value,
                    // Toggle keys carry no axis semantics.
                    InputKey::Estop | InputKey::Exit | InputKey::AltHold => (),
                }
            }
            InputEvent::ButtonPressed { button } => {
                let mapping = match self.map.button(button) {
                    Some(mapping) => mapping,
                    // Button not mapped, ignore.
                    None => return,
                };
                match mapping.key {
                    InputKey::Estop => {
                        self.state.estop = !self.state.estop;
                        log::info!("toggling estop {}", self.state.estop);
                        self.notify(FlightEvent::EmergencyStop(self.state.estop));
                    }
                    InputKey::Exit => self.toggle_autopilot(),
                    InputKey::AltHold => {
                        self.state.alt_hold = !self.state.alt_hold;
                        log::info!("toggling althold {}", self.state.alt_hold);
                        self.notify(FlightEvent::AltHold(self.state.alt_hold));
                    }
                    // Trim buttons write their scale as a one-shot step.
                    InputKey::PitchCal => self.state.pitch_cal = mapping.scale,
                    InputKey::RollCal => self.state.roll_cal = mapping.scale,
                    InputKey::Roll | InputKey::Pitch | InputKey::Yaw | InputKey::Thrust => (),
                }
            }
            // Releases carry no mapped semantics, only raw reading sees them.
            InputEvent::ButtonReleased { .. } => (),
        }
    }

    // One sequencer tick: override thrust, yaw and altitude hold from the
    // script. Roll and pitch stay with the operator.
    fn overlay(&mut self) {
        let now = self.epoch.elapsed().as_secs_f64();
        let output = self.sequencer.tick(now);
        let phase = self.sequencer.phase();

        if self.last_phase != Some(phase) {
            self.last_phase = Some(phase);
            log::debug!("entering {:?} at {:.1}s", phase, self.sequencer.elapsed());
            self.notify(FlightEvent::PhaseEntered(phase));
        }

        self.state.thrust = output.thrust;
        self.state.yaw = output.yaw;
        self.state.alt_hold = output.alt_hold;

        // Pushed every tick whether it changed or not; change detection is
        // the receiver's business. Delivery is fire-and-forget.
        let _ = self
            .uplink
            .try_send(ParamRequest::new(ALT_TARGET_PARAM, output.alt_offset));
    }
}
