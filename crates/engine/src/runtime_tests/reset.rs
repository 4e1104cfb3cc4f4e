// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reset-node and reset-to-node (checkpoint rewind) tests.

use super::*;

#[tokio::test]
async fn reset_node_returns_a_puzzle_to_unresolved() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    solve(&mut rig, "scarab").await;
    rig.bus.clear();

    rig.runtime.reset_node("puzzle_scarab").await.unwrap();

    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Active));
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Unresolved));
    assert_eq!(rig.bus.event_names(), vec!["puzzle.reset", "node.reset"]);

    // The fresh runtime accepts a new solve.
    solve(&mut rig, "scarab").await;
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Solved));
}

#[tokio::test]
async fn reset_node_requires_known_node() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    assert_eq!(
        rig.runtime.reset_node("ghost").await,
        Err(RuntimeError::UnknownNode("ghost".to_string()))
    );
}

#[tokio::test]
async fn reset_to_node_rewinds_the_downstream_set() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    solve(&mut rig, "scarab").await;
    solve(&mut rig, "tiles").await;
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Completed));
    rig.bus.clear();

    rig.runtime.reset_to_node("start_parallel").await.unwrap();

    // Everything downstream of the parallel (its children and the terminal
    // edge target) went back to idle, then the target re-activated its tree.
    assert_eq!(rig.runtime.node_state("start_parallel"), Some(NodeState::Active));
    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Active));
    assert_eq!(rig.runtime.node_state("puzzle_tiles"), Some(NodeState::Active));
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Idle));
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Unresolved));
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_tiles"), Some(Resolution::Unresolved));

    // Fresh puzzle runtimes: the scene can be replayed to completion.
    solve(&mut rig, "scarab").await;
    solve(&mut rig, "tiles").await;
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Completed));
}

#[tokio::test]
async fn reset_to_node_emits_lifecycle_per_prior_state() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    solve(&mut rig, "scarab").await;
    solve(&mut rig, "tiles").await;
    rig.bus.clear();

    rig.runtime.reset_to_node("start_parallel").await.unwrap();

    assert_eq!(
        rig.bus.event_names(),
        vec![
            "node.reset",       // start_parallel
            "puzzle.reset",     // puzzle_scarab
            "node.reset",
            "puzzle.reset",     // puzzle_tiles
            "node.reset",
            "node.reset",       // scene_complete
            "node.started",     // start_parallel reactivation
            "node.started",     // puzzle_scarab
            "puzzle.activated",
            "node.started",     // puzzle_tiles
            "puzzle.activated",
        ]
    );
}

#[tokio::test]
async fn reset_to_node_stops_active_loops() {
    let mut rig = rig(UNLOCK_GRAPH);
    rig.runtime.start_scene("scene_crypt").await.unwrap();
    assert_eq!(rig.runtime.node_state("ambience"), Some(NodeState::Active));
    rig.bus.clear();

    rig.runtime.reset_to_node("ambience").await.unwrap();

    assert_eq!(
        rig.bus.event_names(),
        vec!["loop.stopped", "node.reset", "node.started", "loop.started"]
    );
    assert_eq!(rig.runtime.node_state("ambience"), Some(NodeState::Active));
}

#[tokio::test]
async fn reset_to_node_requires_active_game_and_known_node() {
    let mut rig = rig(INTRO_GRAPH);
    assert_eq!(rig.runtime.reset_to_node("start_parallel").await, Err(RuntimeError::NoActiveGame));

    rig.runtime.start_scene("scene_intro").await.unwrap();
    assert_eq!(
        rig.runtime.reset_to_node("ghost").await,
        Err(RuntimeError::UnknownNode("ghost".to_string()))
    );
}

#[tokio::test]
async fn reset_to_leaf_node_leaves_upstream_intact() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    solve(&mut rig, "scarab").await;

    rig.runtime.reset_to_node("puzzle_scarab").await.unwrap();

    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Active));
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Unresolved));
    // The parallel and the sibling puzzle were not downstream of the target.
    assert_eq!(rig.runtime.node_state("start_parallel"), Some(NodeState::Active));
    assert_eq!(rig.runtime.node_state("puzzle_tiles"), Some(NodeState::Active));
}
