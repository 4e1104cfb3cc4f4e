// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action dispatch: solving the gating puzzle publishes exactly one
//! validated command; a failed dispatch never stalls the scene.

use crate::prelude::*;
use serde_json::json;

#[tokio::test]
async fn action_dispatch_produces_command() {
    let mut rig = rig();
    register_crypt_door(&rig.devices);
    rig.runtime.start_scene("scene_crypt").await.unwrap();

    inject_device_input(&mut rig, "crypt_door", json!({"door_closed": true})).await;

    assert_eq!(rig.runtime.node_state("scarab_unlock"), Some(NodeState::Completed));

    let published = rig.broker.published();
    assert_eq!(published.len(), 1, "exactly one publish");
    assert_eq!(published[0].topic, "devices/ctrl-001/crypt_door/commands");
    let body: serde_json::Value = serde_json::from_slice(&published[0].payload).unwrap();
    assert_eq!(body, json!({"signal": "unlock", "payload": {"source": "puzzle_solved"}}));

    let names = rig.bus.event_names();
    assert!(!names.contains(&"device.error".to_string()));
}

#[tokio::test]
async fn dispatch_failure_does_not_stall_flow() {
    // crypt_door is never registered.
    let mut rig = rig();
    rig.runtime.start_scene("scene_crypt").await.unwrap();

    inject_device_input(&mut rig, "crypt_door", json!({"door_closed": true})).await;

    // The puzzle still solved and the action node still completed.
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_door"), Some(Resolution::Solved));
    assert_eq!(rig.runtime.node_state("scarab_unlock"), Some(NodeState::Completed));

    assert!(rig.broker.published().is_empty());
    let events = rig.bus.snapshot();
    let error = events.iter().find(|e| e.name == "device.error").unwrap();
    assert_eq!(error.str_field("device_id"), Some("crypt_door"));
    assert_eq!(error.str_field("node_id"), Some("scarab_unlock"));
}
