// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::parse::{parse_scene_graph, GraphError};
use yare::parameterized;

/// Build a one-scene document around the given nodes/edges/subgraphs JSON.
fn doc(nodes: &str, edges: &str, subgraphs: &str) -> String {
    format!(
        r#"{{"version": 1, "scenes": [{{
            "id": "scene_test", "name": "", "entry": "start",
            "nodes": {nodes}, "edges": {edges}, "subgraphs": {subgraphs}
        }}]}}"#
    )
}

fn problem_of(content: &str) -> String {
    match parse_scene_graph(content) {
        Err(GraphError::Invalid { scene, problem }) => {
            assert_eq!(scene, "scene_test");
            problem
        }
        other => panic!("expected invalid-graph error, got {other:?}"),
    }
}

#[test]
fn accepts_a_well_formed_scene() {
    let content = doc(
        r#"[{"id": "start", "type": "parallel", "config": {"children": ["puzzle_a"]}},
            {"id": "puzzle_a", "type": "puzzle", "config": {"subgraph": "sg_a"}},
            {"id": "end", "type": "terminal"}]"#,
        r#"[{"from": "start", "to": "end", "condition": "puzzle_a.resolved"}]"#,
        r#"[{"id": "sg_a", "entry": "wait", "nodes": [
               {"id": "wait", "type": "decision"}, {"id": "won", "type": "terminal"}],
             "edges": [{"from": "wait", "to": "won", "condition": ""}]}]"#,
    );
    assert!(parse_scene_graph(&content).is_ok());
}

#[test]
fn rejects_missing_entry_node() {
    let content = doc(r#"[{"id": "other", "type": "terminal"}]"#, "[]", "[]");
    assert!(problem_of(&content).contains("entry node 'start'"));
}

#[test]
fn rejects_duplicate_node_ids() {
    let content = doc(
        r#"[{"id": "start", "type": "decision"}, {"id": "start", "type": "terminal"}]"#,
        "[]",
        "[]",
    );
    assert!(problem_of(&content).contains("duplicate node id 'start'"));
}

#[parameterized(
    bad_source = { r#"[{"from": "ghost", "to": "start", "condition": ""}]"# },
    bad_target = { r#"[{"from": "start", "to": "ghost", "condition": ""}]"# },
)]
fn rejects_dangling_edge_endpoints(edges: &str) {
    let content = doc(r#"[{"id": "start", "type": "decision"}]"#, edges, "[]");
    assert!(problem_of(&content).contains("undeclared node 'ghost'"));
}

#[test]
fn rejects_puzzle_without_subgraph() {
    let content = doc(r#"[{"id": "start", "type": "puzzle"}]"#, "[]", "[]");
    assert!(problem_of(&content).contains("no subgraph reference"));
}

#[test]
fn rejects_unknown_subgraph_reference() {
    let content = doc(
        r#"[{"id": "start", "type": "puzzle", "config": {"subgraph": "sg_ghost"}}]"#,
        "[]",
        "[]",
    );
    assert!(problem_of(&content).contains("unknown subgraph 'sg_ghost'"));
}

#[test]
fn rejects_undeclared_parallel_child() {
    let content = doc(
        r#"[{"id": "start", "type": "parallel", "config": {"children": ["ghost"]}}]"#,
        "[]",
        "[]",
    );
    assert!(problem_of(&content).contains("undeclared child 'ghost'"));
}

#[test]
fn rejects_subgraph_with_missing_entry() {
    let content = doc(
        r#"[{"id": "start", "type": "puzzle", "config": {"subgraph": "sg_a"}}]"#,
        "[]",
        r#"[{"id": "sg_a", "entry": "ghost", "nodes": [{"id": "wait", "type": "decision"}],
             "edges": []}]"#,
    );
    assert!(problem_of(&content).contains("entry node 'ghost'"));
}

#[test]
fn rejects_over_length_condition() {
    let condition = "x".repeat(room_core::MAX_CONDITION_LEN + 1);
    let content = doc(
        r#"[{"id": "start", "type": "decision"}, {"id": "end", "type": "terminal"}]"#,
        &format!(r#"[{{"from": "start", "to": "end", "condition": "{condition}"}}]"#),
        "[]",
    );
    assert!(problem_of(&content).contains("condition exceeds"));
}
