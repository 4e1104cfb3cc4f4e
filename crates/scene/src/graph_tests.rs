// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn intro_scene() -> Scene {
    serde_json::from_value(json!({
        "id": "scene_intro",
        "name": "Intro",
        "entry": "start_parallel",
        "nodes": [
            {"id": "start_parallel", "type": "parallel",
             "config": {"children": ["puzzle_scarab", "puzzle_tiles"]}},
            {"id": "puzzle_scarab", "type": "puzzle", "config": {"subgraph": "sg_scarab"}},
            {"id": "puzzle_tiles", "type": "puzzle", "config": {"subgraph": "sg_tiles"}},
            {"id": "scarab_unlock", "type": "action",
             "config": {"action": "device.command",
                        "params": {"device_id": "crypt_door", "signal": "unlock"}}},
            {"id": "ambience", "type": "loop",
             "config": {"stop_condition": "puzzle_scarab.resolved"}},
            {"id": "scene_complete", "type": "terminal"},
        ],
        "edges": [
            {"from": "start_parallel", "to": "scarab_unlock",
             "condition": "puzzle_scarab.resolved"},
            {"from": "start_parallel", "to": "scene_complete",
             "condition": "puzzle_scarab.resolved && puzzle_tiles.resolved"},
        ],
        "subgraphs": [
            {"id": "sg_scarab", "entry": "wait", "nodes": [
                {"id": "wait", "type": "decision"},
                {"id": "solved", "type": "terminal"},
            ], "edges": [
                {"from": "wait", "to": "solved", "condition": "event == 'device.input'"},
            ]},
            {"id": "sg_tiles", "entry": "wait", "nodes": [
                {"id": "wait", "type": "decision"},
                {"id": "solved", "type": "terminal"},
            ], "edges": []},
        ],
    }))
    .unwrap()
}

#[test]
fn lookups_resolve_by_identifier() {
    let scene = intro_scene();
    assert_eq!(scene.node("puzzle_scarab").unwrap().kind, NodeType::Puzzle);
    assert!(scene.node("ghost").is_none());
    assert_eq!(scene.subgraph("sg_scarab").unwrap().entry, "wait");
    assert!(scene.subgraph("sg_ghost").is_none());
}

#[test]
fn edges_from_preserves_declaration_order() {
    let scene = intro_scene();
    let targets: Vec<&str> =
        scene.edges_from("start_parallel").map(|e| e.to.as_str()).collect();
    assert_eq!(targets, vec!["scarab_unlock", "scene_complete"]);
    assert_eq!(scene.edges_from("scene_complete").count(), 0);
}

#[test]
fn config_accessors_read_recognised_keys() {
    let scene = intro_scene();

    let parallel = scene.node("start_parallel").unwrap();
    assert_eq!(parallel.children(), vec!["puzzle_scarab", "puzzle_tiles"]);

    let puzzle = scene.node("puzzle_scarab").unwrap();
    assert_eq!(puzzle.subgraph_id(), Some("sg_scarab"));

    let action = scene.node("scarab_unlock").unwrap();
    assert_eq!(action.action(), Some("device.command"));
    let params = action.params().unwrap();
    assert_eq!(params.get("signal"), Some(&json!("unlock")));

    let ambience = scene.node("ambience").unwrap();
    assert_eq!(ambience.stop_condition(), Some("puzzle_scarab.resolved"));
}

#[test]
fn accessors_are_none_or_empty_when_unconfigured() {
    let scene = intro_scene();
    let terminal = scene.node("scene_complete").unwrap();
    assert!(terminal.children().is_empty());
    assert!(terminal.subgraph_id().is_none());
    assert!(terminal.action().is_none());
    assert!(terminal.params().is_none());
    assert!(terminal.stop_condition().is_none());
}

#[test]
fn node_type_uses_snake_case_wire_names() {
    assert_eq!(serde_json::to_string(&NodeType::Parallel).unwrap(), "\"parallel\"");
    assert_eq!(serde_json::from_str::<NodeType>("\"checkpoint\"").unwrap(), NodeType::Checkpoint);
    assert_eq!(NodeType::Loop.to_string(), "loop");
}

#[test]
fn subgraph_edges_from_filters_by_source() {
    let scene = intro_scene();
    let sg = scene.subgraph("sg_scarab").unwrap();
    let targets: Vec<&str> = sg.edges_from("wait").map(|e| e.to.as_str()).collect();
    assert_eq!(targets, vec!["solved"]);
}
