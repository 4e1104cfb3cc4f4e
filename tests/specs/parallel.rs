// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel-of-two happy path: both puzzles must resolve before the join
//! edge completes the scene.

use crate::prelude::*;

#[tokio::test]
async fn parallel_of_two_happy_path() {
    let mut rig = rig();
    rig.runtime.start_scene("scene_intro").await.unwrap();

    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Active));
    assert_eq!(rig.runtime.node_state("puzzle_tiles"), Some(NodeState::Active));
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Idle));

    solve(&mut rig, "scarab").await;
    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Completed));
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Idle));

    solve(&mut rig, "tiles").await;
    assert_eq!(rig.runtime.node_state("puzzle_tiles"), Some(NodeState::Completed));
    assert_eq!(rig.runtime.node_state("start_parallel"), Some(NodeState::Completed));
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Completed));

    let names = rig.bus.event_names();
    assert!(names.contains(&"scene.completed".to_string()));
    assert_eq!(names.iter().filter(|n| *n == "puzzle.solved").count(), 2);
}
