// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator override tests: precedence, event order, join interaction.

use super::*;

#[tokio::test]
async fn override_dominates_the_parallel_join() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    solve(&mut rig, "tiles").await;
    rig.bus.clear();

    rig.runtime.override_node("puzzle_scarab").await.unwrap();

    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Overridden));
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Overridden));
    assert_eq!(rig.runtime.node_state("start_parallel"), Some(NodeState::Completed));
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Completed));

    assert_eq!(
        rig.bus.event_names(),
        vec![
            "node.overridden",
            "puzzle.overridden",
            "node.completed",  // puzzle_scarab (override completion)
            "node.completed",  // start_parallel join
            "node.started",    // scene_complete
            "node.completed",
            "scene.completed",
        ]
    );
}

#[tokio::test]
async fn overridden_puzzle_satisfies_resolved_conditions() {
    let mut rig = rig(UNLOCK_GRAPH);
    rig.runtime.start_scene("scene_crypt").await.unwrap();

    rig.runtime.override_node("puzzle_scarab").await.unwrap();

    // The puzzle_scarab.resolved edge fired without a solve.
    assert_eq!(rig.runtime.node_state("scarab_unlock"), Some(NodeState::Completed));
}

#[tokio::test]
async fn override_emits_puzzle_overridden_once() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    rig.bus.clear();

    rig.runtime.override_node("puzzle_scarab").await.unwrap();
    let result = rig.runtime.override_node("puzzle_scarab").await;

    assert_eq!(result, Err(RuntimeError::NodeAlreadyTerminal("puzzle_scarab".to_string())));
    let names = rig.bus.event_names();
    assert_eq!(names.iter().filter(|n| *n == "puzzle.overridden").count(), 1);
}

#[tokio::test]
async fn override_requires_an_existing_non_terminal_node() {
    let mut rig = rig(INTRO_GRAPH);
    assert_eq!(
        rig.runtime.override_node("puzzle_scarab").await,
        Err(RuntimeError::NoActiveGame)
    );

    rig.runtime.start_scene("scene_intro").await.unwrap();
    assert_eq!(
        rig.runtime.override_node("ghost").await,
        Err(RuntimeError::UnknownNode("ghost".to_string()))
    );

    solve(&mut rig, "scarab").await;
    assert_eq!(
        rig.runtime.override_node("puzzle_scarab").await,
        Err(RuntimeError::NodeAlreadyTerminal("puzzle_scarab".to_string()))
    );
}

#[tokio::test]
async fn override_of_an_idle_non_puzzle_node_completes_it() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    rig.bus.clear();

    // scene_complete is idle; an operator can force it.
    rig.runtime.override_node("scene_complete").await.unwrap();

    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Overridden));
    assert_eq!(rig.bus.event_names(), vec!["node.overridden", "node.completed"]);
}

#[tokio::test]
async fn overridden_puzzle_never_unresolves_by_events() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    rig.runtime.override_node("puzzle_scarab").await.unwrap();

    solve(&mut rig, "scarab").await;

    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Overridden));
    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Overridden));
}
