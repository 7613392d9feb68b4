// Loading and resolving input maps, including the client JSON documents.

use crazyflie_autopilot::mapping::{InputKey, InputMap};
use crazyflie_autopilot::Error;

const PS3_MAP: &str = r#"{
  "inputconfig": {
    "inputdevice": {
      "updateperiod": 10,
      "name": "PS3_Mode_1",
      "axis": [
        { "scale": 1.0, "type": "Input.AXIS", "name": "yaw", "key": "yaw", "id": 0 },
        { "scale": -1.0, "type": "Input.AXIS", "name": "thrust", "key": "thrust", "id": 1 },
        { "scale": 1.0, "type": "Input.AXIS", "name": "roll", "key": "roll", "id": 2 },
        { "scale": -1.0, "type": "Input.AXIS", "name": "pitch", "key": "pitch", "id": 3 },
        { "scale": 0.1, "type": "Input.BUTTON", "name": "pitchPos", "key": "pitchcal", "id": 4 },
        { "scale": 1.0, "type": "Input.BUTTON", "name": "althold", "key": "althold", "id": 10 },
        { "scale": 1.0, "type": "Input.BUTTON", "name": "estop", "key": "estop", "id": 14 },
        { "scale": 1.0, "type": "Input.BUTTON", "name": "exit", "key": "exit", "id": 15 }
      ]
    }
  }
}"#;

#[test]
fn client_documents_load() {
    let map = InputMap::from_json_str(PS3_MAP).unwrap();

    let thrust = map.axis(1).unwrap();
    assert_eq!(thrust.key, InputKey::Thrust);
    assert_eq!(thrust.scale, -1.0);

    let pitch = map.axis(3).unwrap();
    assert_eq!(pitch.key, InputKey::Pitch);
    assert_eq!(pitch.scale, -1.0);

    let exit = map.button(15).unwrap();
    assert_eq!(exit.key, InputKey::Exit);

    let trim = map.button(4).unwrap();
    assert_eq!(trim.key, InputKey::PitchCal);
    assert_eq!(trim.scale, 0.1);
}

#[test]
fn unmapped_indices_resolve_to_none() {
    let map = InputMap::from_json_str(PS3_MAP).unwrap();

    assert!(map.axis(7).is_none());
    assert!(map.button(42).is_none());
    // Axis and button index spaces are separate.
    assert!(map.button(1).is_none());
    assert!(map.axis(15).is_none());
}

#[test]
fn unknown_keys_and_types_are_skipped() {
    let document = r#"{
      "inputconfig": {
        "inputdevice": {
          "axis": [
            { "scale": 1.0, "type": "Input.AXIS", "key": "warp", "id": 0 },
            { "scale": 1.0, "type": "Input.HAT", "key": "yaw", "id": 1 },
            { "scale": 1.0, "type": "Input.AXIS", "key": "roll", "id": 2 }
          ]
        }
      }
    }"#;

    let map = InputMap::from_json_str(document).unwrap();
    assert!(map.axis(0).is_none());
    assert!(map.axis(1).is_none());
    assert_eq!(map.axis(2).unwrap().key, InputKey::Roll);
}

#[test]
fn malformed_documents_are_config_errors() {
    let result = InputMap::from_json_str("not json at all");
    assert!(matches!(result, Err(Error::ConfigError(_))));

    let result = InputMap::from_json_str(r#"{"inputconfig": {}}"#);
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn programmatic_maps_resolve() {
    let mut map = InputMap::new();
    assert!(map.is_empty());

    map.map_axis(0, InputKey::Roll, 1.0);
    map.map_button(3, InputKey::RollCal, -0.1);

    assert_eq!(map.axis(0).unwrap().key, InputKey::Roll);
    assert_eq!(map.button(3).unwrap().scale, -0.1);
    assert!(!map.is_empty());
}

#[test]
fn scale_defaults_to_one() {
    let document = r#"{
      "inputconfig": {
        "inputdevice": {
          "axis": [
            { "type": "Input.AXIS", "key": "yaw", "id": 0 }
          ]
        }
      }
    }"#;

    let map = InputMap::from_json_str(document).unwrap();
    assert_eq!(map.axis(0).unwrap().scale, 1.0);
}
