// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Load-time vetting of scene graphs.
//!
//! The runtime treats node, edge, and subgraph references as trusted and
//! silently stops a branch on a dangling lookup, so every invariant must be
//! enforced here: entry nodes exist, edge endpoints are declared, puzzle
//! subgraph references resolve within the same scene, parallel children are
//! declared nodes, and conditions fit the evaluator's length cap.

use crate::graph::{Edge, Node, NodeType, Scene, SceneGraph, Subgraph};
use crate::parse::GraphError;
use room_core::MAX_CONDITION_LEN;
use std::collections::HashSet;

pub(crate) fn vet(graph: &SceneGraph) -> Result<(), GraphError> {
    for scene in &graph.scenes {
        vet_scene(scene)?;
    }
    Ok(())
}

fn invalid(scene: &Scene, problem: String) -> GraphError {
    GraphError::Invalid { scene: scene.id.to_string(), problem }
}

fn vet_scene(scene: &Scene) -> Result<(), GraphError> {
    let node_ids = declared_ids(&scene.nodes)
        .map_err(|id| invalid(scene, format!("duplicate node id '{id}'")))?;

    if !node_ids.contains(scene.entry.as_str()) {
        return Err(invalid(scene, format!("entry node '{}' is not declared", scene.entry)));
    }

    vet_edges(scene, &scene.edges, &node_ids, "edge")?;

    for node in &scene.nodes {
        match node.kind {
            NodeType::Puzzle => {
                let Some(subgraph_id) = node.subgraph_id() else {
                    return Err(invalid(
                        scene,
                        format!("puzzle node '{}' has no subgraph reference", node.id),
                    ));
                };
                if scene.subgraph(subgraph_id).is_none() {
                    return Err(invalid(
                        scene,
                        format!("puzzle node '{}' references unknown subgraph '{subgraph_id}'", node.id),
                    ));
                }
            }
            NodeType::Parallel => {
                for child in node.children() {
                    if !node_ids.contains(child) {
                        return Err(invalid(
                            scene,
                            format!("parallel node '{}' lists undeclared child '{child}'", node.id),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    for subgraph in &scene.subgraphs {
        vet_subgraph(scene, subgraph)?;
    }

    Ok(())
}

fn vet_subgraph(scene: &Scene, subgraph: &Subgraph) -> Result<(), GraphError> {
    let node_ids = declared_ids(&subgraph.nodes).map_err(|id| {
        invalid(scene, format!("subgraph '{}': duplicate node id '{id}'", subgraph.id))
    })?;

    if !node_ids.contains(subgraph.entry.as_str()) {
        return Err(invalid(
            scene,
            format!("subgraph '{}': entry node '{}' is not declared", subgraph.id, subgraph.entry),
        ));
    }

    vet_edges(scene, &subgraph.edges, &node_ids, &format!("subgraph '{}' edge", subgraph.id))
}

fn vet_edges(
    scene: &Scene,
    edges: &[Edge],
    node_ids: &HashSet<&str>,
    what: &str,
) -> Result<(), GraphError> {
    for edge in edges {
        for endpoint in [&edge.from, &edge.to] {
            if !node_ids.contains(endpoint.as_str()) {
                return Err(invalid(
                    scene,
                    format!("{what} {} -> {} references undeclared node '{endpoint}'", edge.from, edge.to),
                ));
            }
        }
        if edge.condition.len() > MAX_CONDITION_LEN {
            return Err(invalid(
                scene,
                format!(
                    "{what} {} -> {} condition exceeds {MAX_CONDITION_LEN} bytes",
                    edge.from, edge.to
                ),
            ));
        }
    }
    Ok(())
}

/// Collect declared node ids, failing on the first duplicate.
fn declared_ids(nodes: &[Node]) -> Result<HashSet<&str>, &str> {
    let mut ids = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(node.id.as_str());
        }
    }
    Ok(ids)
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
