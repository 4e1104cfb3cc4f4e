// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Nested-field device match: the decision condition indexes into the
//! event's payload map and only the exact device/field combination solves.

use crate::prelude::*;
use serde_json::json;

#[tokio::test]
async fn nested_field_device_match() {
    let mut rig = rig();
    rig.runtime.start_scene("scene_crypt").await.unwrap();

    // Wrong device: unresolved.
    inject_device_input(&mut rig, "other_device", json!({"door_closed": true})).await;
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_door"), Some(Resolution::Unresolved));

    // Right device, wrong payload value: unresolved.
    inject_device_input(&mut rig, "crypt_door", json!({"door_closed": false})).await;
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_door"), Some(Resolution::Unresolved));

    // Exact match resolves and emits puzzle.solved for the parent node.
    inject_device_input(&mut rig, "crypt_door", json!({"door_closed": true})).await;
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_door"), Some(Resolution::Solved));

    let events = rig.bus.snapshot();
    let solved = events.iter().find(|e| e.name == "puzzle.solved").unwrap();
    assert_eq!(solved.str_field("puzzle_id"), Some("puzzle_door"));
    assert_eq!(solved.str_field("subgraph_id"), Some("sg_door"));
}
