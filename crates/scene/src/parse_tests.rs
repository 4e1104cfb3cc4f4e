// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const MINIMAL_GRAPH: &str = r#"{
    "version": 1,
    "scenes": [
        {
            "id": "scene_intro",
            "name": "Intro",
            "entry": "start",
            "nodes": [
                {"id": "start", "type": "decision"},
                {"id": "end", "type": "terminal"}
            ],
            "edges": [
                {"from": "start", "to": "end", "condition": ""}
            ],
            "subgraphs": []
        }
    ]
}"#;

#[test]
fn parses_a_minimal_graph() {
    let graph = parse_scene_graph(MINIMAL_GRAPH).unwrap();
    assert_eq!(graph.version, 1);
    assert_eq!(graph.scenes.len(), 1);
    assert_eq!(graph.first_scene().unwrap().id, "scene_intro");
    assert_eq!(graph.scene("scene_intro").unwrap().entry, "start");
}

#[test]
fn rejects_other_versions() {
    let content = MINIMAL_GRAPH.replacen("\"version\": 1", "\"version\": 2", 1);
    match parse_scene_graph(&content) {
        Err(GraphError::Version(2)) => {}
        other => panic!("expected version error, got {other:?}"),
    }
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(parse_scene_graph("{not json"), Err(GraphError::Json(_))));
    assert!(matches!(parse_scene_graph("{}"), Err(GraphError::Json(_))));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenes.json");
    std::fs::write(&path, MINIMAL_GRAPH).unwrap();

    let graph = load_scene_graph(&path).unwrap();
    assert_eq!(graph.scenes.len(), 1);

    assert!(matches!(load_scene_graph(&dir.path().join("missing.json")), Err(GraphError::Io(_))));
}

#[test]
fn graph_hash_is_stable_and_content_sensitive() {
    let a = parse_scene_graph(MINIMAL_GRAPH).unwrap();
    let b = parse_scene_graph(MINIMAL_GRAPH).unwrap();
    assert_eq!(graph_hash(&a), graph_hash(&b));
    assert_eq!(graph_hash(&a).len(), 64);

    let renamed = MINIMAL_GRAPH.replacen("Intro", "Outro", 1);
    let c = parse_scene_graph(&renamed).unwrap();
    assert_ne!(graph_hash(&a), graph_hash(&c));
}
