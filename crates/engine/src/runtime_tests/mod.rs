// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scene runtime tests: lifecycle, injection, overrides, resets.

mod inject;
mod overrides;
mod reset;
mod start;

use super::*;
use crate::bus::EventBus;
use room_core::FakeClock;
use room_scene::parse_scene_graph;
use std::sync::Arc;

/// Parallel of two puzzles joining into a terminal (the canonical intro
/// scene), plus an action fired by the scarab alone and an ambience loop.
pub(crate) const INTRO_GRAPH: &str = r#"{
    "version": 1,
    "scenes": [{
        "id": "scene_intro", "name": "Intro", "entry": "start_parallel",
        "nodes": [
            {"id": "start_parallel", "type": "parallel",
             "config": {"children": ["puzzle_scarab", "puzzle_tiles"]}},
            {"id": "puzzle_scarab", "type": "puzzle", "config": {"subgraph": "sg_scarab"}},
            {"id": "puzzle_tiles", "type": "puzzle", "config": {"subgraph": "sg_tiles"}},
            {"id": "scene_complete", "type": "terminal"}
        ],
        "edges": [
            {"from": "start_parallel", "to": "scene_complete",
             "condition": "puzzle_scarab.resolved && puzzle_tiles.resolved"}
        ],
        "subgraphs": [
            {"id": "sg_scarab", "entry": "wait",
             "nodes": [{"id": "wait", "type": "decision"}, {"id": "won", "type": "terminal"}],
             "edges": [{"from": "wait", "to": "won",
                        "condition": "event == 'puzzle.solved' && puzzle_id == 'scarab'"}]},
            {"id": "sg_tiles", "entry": "wait",
             "nodes": [{"id": "wait", "type": "decision"}, {"id": "won", "type": "terminal"}],
             "edges": [{"from": "wait", "to": "won",
                        "condition": "event == 'puzzle.solved' && puzzle_id == 'tiles'"}]}
        ]
    }]
}"#;

/// Puzzle gating an action node, with an ambience loop stopped by the
/// puzzle's resolution.
pub(crate) const UNLOCK_GRAPH: &str = r#"{
    "version": 1,
    "scenes": [{
        "id": "scene_crypt", "name": "Crypt", "entry": "start_parallel",
        "nodes": [
            {"id": "start_parallel", "type": "parallel",
             "config": {"children": ["puzzle_scarab", "ambience"]}},
            {"id": "puzzle_scarab", "type": "puzzle", "config": {"subgraph": "sg_scarab"}},
            {"id": "ambience", "type": "loop",
             "config": {"stop_condition": "puzzle_scarab.resolved"}},
            {"id": "scarab_unlock", "type": "action",
             "config": {"action": "device.command",
                        "params": {"device_id": "crypt_door", "signal": "unlock",
                                   "payload": {"source": "puzzle_solved"}}}}
        ],
        "edges": [
            {"from": "puzzle_scarab", "to": "scarab_unlock",
             "condition": "puzzle_scarab.resolved"}
        ],
        "subgraphs": [
            {"id": "sg_scarab", "entry": "wait",
             "nodes": [{"id": "wait", "type": "decision"}, {"id": "won", "type": "terminal"}],
             "edges": [{"from": "wait", "to": "won",
                        "condition": "event == 'puzzle.solved' && puzzle_id == 'scarab'"}]}
        ]
    }]
}"#;

/// Two scenes for start_game defaulting; the second is never the default.
pub(crate) const TWO_SCENE_GRAPH: &str = r#"{
    "version": 1,
    "scenes": [
        {"id": "scene_one", "name": "One", "entry": "one_end",
         "nodes": [{"id": "one_end", "type": "terminal"}], "edges": [], "subgraphs": []},
        {"id": "scene_two", "name": "Two", "entry": "two_wait",
         "nodes": [{"id": "two_wait", "type": "decision"}], "edges": [], "subgraphs": []}
    ]
}"#;

pub(crate) struct Rig {
    pub runtime: SceneRuntime<FakeClock>,
    pub bus: Arc<EventBus<FakeClock>>,
}

pub(crate) fn rig(graph_json: &str) -> Rig {
    let graph = Arc::new(parse_scene_graph(graph_json).unwrap());
    let bus = Arc::new(EventBus::new(FakeClock::new()));
    let runtime = SceneRuntime::new(graph, Arc::clone(&bus));
    Rig { runtime, bus }
}

/// Inject the canonical solve event for a puzzle fixture.
pub(crate) async fn solve(rig: &mut Rig, puzzle_id: &str) {
    rig.runtime
        .inject_event(names::PUZZLE_SOLVED, room_core::fields! {"puzzle_id" => puzzle_id})
        .await
        .unwrap();
}
