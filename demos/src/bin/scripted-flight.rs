// Runs the autopilot overlay against a scripted joystick and prints one full
// flight cycle. No hardware needed: the parameter uplink is drained to the
// console instead of a radio transport.

use async_trait::async_trait;
use crazyflie_autopilot::input::{DeviceInfo, InputBackend, InputEvent};
use crazyflie_autopilot::mapping::{InputKey, InputMap};
use crazyflie_autopilot::sequencer::FlightPlan;
use crazyflie_autopilot::Controller;
use std::time::Duration;

struct ScriptedPad {
    first_poll: bool,
}

#[async_trait]
impl InputBackend for ScriptedPad {
    fn devices(&self) -> crazyflie_autopilot::Result<Vec<DeviceInfo>> {
        Ok(vec![DeviceInfo {
            id: 0,
            name: "scripted pad".to_owned(),
        }])
    }

    fn open(&mut self, _device_id: usize) -> crazyflie_autopilot::Result<()> {
        Ok(())
    }

    async fn events(&mut self) -> crazyflie_autopilot::Result<Vec<InputEvent>> {
        // A single exit press on the first poll engages the overlay.
        if self.first_poll {
            self.first_poll = false;
            Ok(vec![InputEvent::ButtonPressed { button: 0 }])
        } else {
            Ok(vec![])
        }
    }
}

#[async_std::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut map = InputMap::new();
    map.map_button(0, InputKey::Exit, 1.0);

    let (param_uplink, param_requests) = flume::unbounded();
    let plan = FlightPlan::default();
    let mut controller = Controller::new(
        Box::new(ScriptedPad { first_poll: true }),
        map,
        plan,
        param_uplink,
    );

    for device in controller.devices()? {
        println!("Input device {}: {}", device.id, device.name);
    }
    controller.open_device(0)?;

    controller.upload_tuning().await?;
    println!("Uploaded {} tuning parameters", param_requests.try_iter().count());

    let mut events = controller.watch_events();
    let period = Duration::from_millis(50);
    let ticks = ((plan.cycle_time() + plan.repeat_delay + 1.0) / period.as_secs_f64()) as u32;

    println!("Flying one scripted cycle ...");
    for _ in 0..ticks {
        let state = controller.read_input().await?;

        while let Ok(event) = events.try_recv() {
            println!(
                " > {:?}  (thrust {:+.1}, yaw {:+.1}, althold {})",
                event, state.thrust, state.yaw, state.alt_hold
            );
        }

        // The altitude-target pushes would go to the radio transport.
        let _ = param_requests.try_iter().count();

        async_std::task::sleep(period).await;
    }

    println!("Scripted flight demo complete.");
    Ok(())
}
