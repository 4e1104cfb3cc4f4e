// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::devices::DeviceRegistry;
use room_adapters::FakeBroker;
use room_core::{DevicesConfig, FakeClock, RegistrationPayload};
use serde_json::json;
use std::sync::Arc;

struct Rig {
    dispatcher: CommandDispatcher<FakeBroker, FakeClock>,
    broker: FakeBroker,
    bus: Arc<EventBus<FakeClock>>,
}

fn rig(outputs: DevicesConfig) -> Rig {
    let devices = Arc::new(DeviceRegistry::new());
    let registration: RegistrationPayload = serde_json::from_value(json!({
        "controller_id": "ctrl-001",
        "devices": [{
            "device_id": "crypt_door",
            "outputs": ["unlock", "lock"],
            "command_topic": "devices/ctrl-001/crypt_door/commands",
        }],
    }))
    .unwrap();
    devices.register_from_payload(&registration);

    let bus = Arc::new(EventBus::new(FakeClock::new()));
    let broker = FakeBroker::new();
    let dispatcher = CommandDispatcher::new(devices, Arc::clone(&bus), broker.clone(), outputs);
    Rig { dispatcher, broker, bus }
}

fn unlock_config(device_id: &str) -> room_scene::NodeConfig {
    json!({
        "action": "device.command",
        "params": {
            "device_id": device_id,
            "signal": "unlock",
            "payload": {"source": "puzzle_solved"},
        },
    })
    .as_object()
    .cloned()
    .unwrap()
}

#[tokio::test]
async fn publishes_one_validated_command() {
    let rig = rig(DevicesConfig::default());

    rig.dispatcher.execute("scarab_unlock", &unlock_config("crypt_door")).await.unwrap();

    let published = rig.broker.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, "devices/ctrl-001/crypt_door/commands");
    let body: serde_json::Value = serde_json::from_slice(&published[0].payload).unwrap();
    assert_eq!(body, json!({"signal": "unlock", "payload": {"source": "puzzle_solved"}}));
    assert!(rig.bus.event_names().is_empty());
}

#[tokio::test]
async fn unknown_device_emits_error_and_skips_publish() {
    let rig = rig(DevicesConfig::default());

    let result = rig.dispatcher.execute("scarab_unlock", &unlock_config("ghost_door")).await;

    assert!(matches!(result, Err(DispatchError::Device(DeviceError::UnknownDevice(_)))));
    assert!(rig.broker.published().is_empty());

    let events = rig.bus.snapshot();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "device.error");
    assert_eq!(events[0].str_field("node_id"), Some("scarab_unlock"));
    assert_eq!(events[0].str_field("device_id"), Some("ghost_door"));
    assert_eq!(events[0].str_field("signal"), Some("unlock"));
}

#[tokio::test]
async fn disallowed_signal_is_rejected_by_registry() {
    let rig = rig(DevicesConfig::default());
    let mut config = unlock_config("crypt_door");
    config.insert(
        "params".to_string(),
        json!({"device_id": "crypt_door", "signal": "self_destruct"}),
    );

    let result = rig.dispatcher.execute("scarab_unlock", &config).await;

    assert!(matches!(
        result,
        Err(DispatchError::Device(DeviceError::SignalNotAllowed { .. }))
    ));
    assert!(rig.broker.published().is_empty());
    assert_eq!(rig.bus.event_names(), vec!["device.error"]);
}

#[tokio::test]
async fn devices_config_is_a_second_line_of_defence() {
    // Registry allows unlock and lock; operator config narrows to lock only.
    let outputs: DevicesConfig = serde_json::from_value(json!({
        "devices": {"crypt_door": {"outputs": ["lock"]}},
    }))
    .unwrap();
    let rig = rig(outputs);

    let result = rig.dispatcher.execute("scarab_unlock", &unlock_config("crypt_door")).await;

    assert!(matches!(
        result,
        Err(DispatchError::Device(DeviceError::SignalNotAllowed { .. }))
    ));
    assert!(rig.broker.published().is_empty());
}

#[tokio::test]
async fn missing_params_are_reported() {
    let rig = rig(DevicesConfig::default());
    let config = json!({"action": "device.command"}).as_object().cloned().unwrap();

    let result = rig.dispatcher.execute("scarab_unlock", &config).await;

    assert!(matches!(result, Err(DispatchError::MissingParam("params"))));
    assert_eq!(rig.bus.event_names(), vec!["device.error"]);
}

#[tokio::test]
async fn other_action_kinds_are_noop_success() {
    let rig = rig(DevicesConfig::default());

    let config = json!({"action": "scene.cue"}).as_object().cloned().unwrap();
    rig.dispatcher.execute("cue_lights", &config).await.unwrap();

    let empty = room_scene::NodeConfig::new();
    rig.dispatcher.execute("no_action", &empty).await.unwrap();

    assert!(rig.broker.published().is_empty());
    assert!(rig.bus.event_names().is_empty());
}

#[tokio::test]
async fn broker_failure_emits_device_error_with_topic() {
    let rig = rig(DevicesConfig::default());
    rig.broker.set_fail(true);

    let result = rig.dispatcher.execute("scarab_unlock", &unlock_config("crypt_door")).await;

    assert!(matches!(result, Err(DispatchError::Broker(_))));
    let events = rig.bus.snapshot();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "device.error");
    assert_eq!(
        events[0].str_field("topic"),
        Some("devices/ctrl-001/crypt_door/commands")
    );
}
