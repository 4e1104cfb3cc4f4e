// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Override dominates the join: an overridden puzzle satisfies
//! `.resolved` conditions exactly like a solved one.

use crate::prelude::*;

#[tokio::test]
async fn override_dominates_join() {
    let mut rig = rig();
    rig.runtime.start_scene("scene_intro").await.unwrap();

    solve(&mut rig, "tiles").await;
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Idle));
    rig.bus.clear();

    rig.runtime.override_node("puzzle_scarab").await.unwrap();

    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Overridden));
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Overridden));
    assert_eq!(rig.runtime.node_state("start_parallel"), Some(NodeState::Completed));
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Completed));

    // node.overridden, then puzzle.overridden, then the completion cascade.
    let names = rig.bus.event_names();
    assert_eq!(
        &names[..3],
        &["node.overridden".to_string(), "puzzle.overridden".to_string(), "node.completed".to_string()]
    );
    assert!(names.contains(&"scene.completed".to_string()));
}
