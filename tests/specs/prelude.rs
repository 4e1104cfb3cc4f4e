// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared spec fixtures: the authored scene graph and a wired engine rig.

pub use room_adapters::FakeBroker;
pub use room_core::{fields, FakeClock, NodeState, Resolution};
pub use room_engine::{CommandDispatcher, DeviceRegistry, EventBus, SceneRuntime};
pub use std::sync::Arc;

/// Two scenes. `scene_intro` is the parallel-of-two intro; `scene_crypt`
/// resolves on a nested-field device match and fires an unlock action.
pub const SPEC_GRAPH: &str = r#"{
    "version": 1,
    "scenes": [
        {
            "id": "scene_intro", "name": "Intro", "entry": "start_parallel",
            "nodes": [
                {"id": "start_parallel", "type": "parallel",
                 "config": {"children": ["puzzle_scarab", "puzzle_tiles"]}},
                {"id": "puzzle_scarab", "type": "puzzle", "config": {"subgraph": "sg_scarab"}},
                {"id": "puzzle_tiles", "type": "puzzle", "config": {"subgraph": "sg_tiles"}},
                {"id": "scene_complete", "type": "terminal"}
            ],
            "edges": [
                {"from": "start_parallel", "to": "scene_complete",
                 "condition": "puzzle_scarab.resolved && puzzle_tiles.resolved"}
            ],
            "subgraphs": [
                {"id": "sg_scarab", "entry": "wait",
                 "nodes": [{"id": "wait", "type": "decision"},
                           {"id": "won", "type": "terminal"}],
                 "edges": [{"from": "wait", "to": "won",
                            "condition": "event == 'puzzle.solved' && puzzle_id == 'scarab'"}]},
                {"id": "sg_tiles", "entry": "wait",
                 "nodes": [{"id": "wait", "type": "decision"},
                           {"id": "won", "type": "terminal"}],
                 "edges": [{"from": "wait", "to": "won",
                            "condition": "event == 'puzzle.solved' && puzzle_id == 'tiles'"}]}
            ]
        },
        {
            "id": "scene_crypt", "name": "Crypt", "entry": "puzzle_door",
            "nodes": [
                {"id": "puzzle_door", "type": "puzzle", "config": {"subgraph": "sg_door"}},
                {"id": "scarab_unlock", "type": "action",
                 "config": {"action": "device.command",
                            "params": {"device_id": "crypt_door", "signal": "unlock",
                                       "payload": {"source": "puzzle_solved"}}}}
            ],
            "edges": [
                {"from": "puzzle_door", "to": "scarab_unlock",
                 "condition": "puzzle_door.resolved"}
            ],
            "subgraphs": [
                {"id": "sg_door", "entry": "wait_closed",
                 "nodes": [{"id": "wait_closed", "type": "decision"},
                           {"id": "won", "type": "terminal"}],
                 "edges": [{"from": "wait_closed", "to": "won",
                            "condition": "event == 'device.input' && logical_id == 'crypt_door' && payload.door_closed == 'true'"}]}
            ]
        }
    ]
}"#;

pub struct SpecRig {
    pub runtime: SceneRuntime<FakeClock>,
    pub bus: Arc<EventBus<FakeClock>>,
    pub broker: FakeBroker,
    pub devices: Arc<DeviceRegistry>,
}

/// Engine wired the way the daemon wires it, with the recording broker.
pub fn rig() -> SpecRig {
    let graph = Arc::new(room_scene::parse_scene_graph(SPEC_GRAPH).unwrap());
    let bus = Arc::new(EventBus::new(FakeClock::new()));
    let broker = FakeBroker::new();
    let devices = Arc::new(DeviceRegistry::new());
    let dispatcher = Arc::new(CommandDispatcher::new(
        Arc::clone(&devices),
        Arc::clone(&bus),
        broker.clone(),
        room_core::DevicesConfig::default(),
    ));
    let mut runtime = SceneRuntime::new(graph, Arc::clone(&bus));
    runtime.set_action_executor(dispatcher);
    SpecRig { runtime, bus, broker, devices }
}

/// Register `crypt_door` (outputs include `unlock`) under ctrl-001.
pub fn register_crypt_door(devices: &DeviceRegistry) {
    let payload: room_core::RegistrationPayload = serde_json::from_value(serde_json::json!({
        "controller_id": "ctrl-001",
        "devices": [{
            "device_id": "crypt_door",
            "device_type": "maglock",
            "outputs": ["unlock", "lock"],
            "command_topic": "devices/ctrl-001/crypt_door/commands",
        }],
    }))
    .unwrap();
    devices.register_from_payload(&payload);
}

/// Inject a `device.input` with the daemon's normalised field shape.
pub async fn inject_device_input(
    rig: &mut SpecRig,
    logical_id: &str,
    payload: serde_json::Value,
) {
    rig.runtime
        .inject_event(
            "device.input",
            fields! {
                "device_id" => logical_id,
                "logical_id" => logical_id,
                "payload" => payload,
            },
        )
        .await
        .unwrap();
}

/// Inject the canonical `puzzle.solved` trigger for a fixture puzzle.
pub async fn solve(rig: &mut SpecRig, puzzle_id: &str) {
    rig.runtime
        .inject_event("puzzle.solved", fields! {"puzzle_id" => puzzle_id})
        .await
        .unwrap();
}
