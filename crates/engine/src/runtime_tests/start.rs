// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scene start/stop lifecycle tests.

use super::*;

#[tokio::test]
async fn start_scene_initialises_and_activates_entry_tree() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();

    assert!(rig.runtime.is_game_active());
    assert_eq!(rig.runtime.active_scene_id(), Some("scene_intro"));
    assert_eq!(rig.runtime.node_state("start_parallel"), Some(NodeState::Active));
    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Active));
    assert_eq!(rig.runtime.node_state("puzzle_tiles"), Some(NodeState::Active));
    assert_eq!(rig.runtime.node_state("scene_complete"), Some(NodeState::Idle));
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Unresolved));

    assert_eq!(
        rig.bus.event_names(),
        vec![
            "scene.started",
            "node.started",   // start_parallel
            "node.started",   // puzzle_scarab
            "puzzle.activated",
            "node.started",   // puzzle_tiles
            "puzzle.activated",
        ]
    );
}

#[tokio::test]
async fn start_scene_rejects_unknown_scene() {
    let mut rig = rig(INTRO_GRAPH);
    let result = rig.runtime.start_scene("scene_ghost").await;
    assert_eq!(result, Err(RuntimeError::UnknownScene("scene_ghost".to_string())));
    assert!(!rig.runtime.is_game_active());
    assert!(rig.bus.snapshot().is_empty());
}

#[tokio::test]
async fn start_game_defaults_to_the_first_scene() {
    let mut rig = rig(TWO_SCENE_GRAPH);
    rig.runtime.start_game(None).await.unwrap();
    assert_eq!(rig.runtime.active_scene_id(), Some("scene_one"));

    rig.runtime.start_game(Some("scene_two")).await.unwrap();
    assert_eq!(rig.runtime.active_scene_id(), Some("scene_two"));
    assert_eq!(rig.runtime.node_state("two_wait"), Some(NodeState::Active));

    // The empty string also means "first".
    rig.runtime.start_game(Some("")).await.unwrap();
    assert_eq!(rig.runtime.active_scene_id(), Some("scene_one"));
}

#[tokio::test]
async fn terminal_entry_completes_the_scene_immediately() {
    let mut rig = rig(TWO_SCENE_GRAPH);
    rig.runtime.start_game(None).await.unwrap();

    assert_eq!(rig.runtime.node_state("one_end"), Some(NodeState::Completed));
    assert_eq!(
        rig.bus.event_names(),
        vec!["scene.started", "node.started", "node.completed", "scene.completed"]
    );
}

#[tokio::test]
async fn stop_game_emits_reset_and_clears_state() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    rig.bus.clear();

    rig.runtime.stop_game().unwrap();

    assert!(!rig.runtime.is_game_active());
    assert!(!rig.runtime.has_node("puzzle_scarab"));
    assert_eq!(rig.runtime.node_state("puzzle_scarab"), None);
    let events = rig.bus.snapshot();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "scene.reset");
    assert_eq!(events[0].str_field("scene_id"), Some("scene_intro"));
}

#[tokio::test]
async fn stop_game_requires_an_active_game() {
    let mut rig = rig(INTRO_GRAPH);
    assert_eq!(rig.runtime.stop_game(), Err(RuntimeError::NoActiveGame));
}

#[tokio::test]
async fn restart_resets_previous_progress() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();
    solve(&mut rig, "scarab").await;
    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Solved));

    rig.runtime.start_game(Some("scene_intro")).await.unwrap();

    assert_eq!(rig.runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Unresolved));
    assert_eq!(rig.runtime.node_state("puzzle_scarab"), Some(NodeState::Active));
}

#[tokio::test]
async fn node_statuses_snapshot_in_declaration_order() {
    let mut rig = rig(INTRO_GRAPH);
    rig.runtime.start_scene("scene_intro").await.unwrap();

    let statuses = rig.runtime.node_statuses();
    let ids: Vec<&str> = statuses.iter().map(|s| s.node_id.as_str()).collect();
    assert_eq!(ids, vec!["start_parallel", "puzzle_scarab", "puzzle_tiles", "scene_complete"]);

    let puzzle_statuses = rig.runtime.puzzle_statuses();
    let puzzles: Vec<&str> = puzzle_statuses.iter().map(|s| s.node_id.as_str()).collect();
    assert_eq!(puzzles, vec!["puzzle_scarab", "puzzle_tiles"]);
}
