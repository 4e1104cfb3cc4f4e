// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scene-graph loading: JSON parse, version gate, load-time vetting.

use crate::graph::SceneGraph;
use crate::validate;
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;

/// The only accepted schema version.
pub const SUPPORTED_VERSION: u32 = 1;

/// Errors from scene-graph loading. These are the only fatal startup errors.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read scene graph: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scene graph JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported scene graph version {0} (expected {SUPPORTED_VERSION})")]
    Version(u32),
    #[error("scene '{scene}': {problem}")]
    Invalid { scene: String, problem: String },
}

/// Parse and vet a scene-graph document.
pub fn parse_scene_graph(content: &str) -> Result<SceneGraph, GraphError> {
    let graph: SceneGraph = serde_json::from_str(content)?;
    if graph.version != SUPPORTED_VERSION {
        return Err(GraphError::Version(graph.version));
    }
    validate::vet(&graph)?;
    Ok(graph)
}

/// Load a scene graph from a file path.
pub fn load_scene_graph(path: &Path) -> Result<SceneGraph, GraphError> {
    let content = std::fs::read_to_string(path)?;
    parse_scene_graph(&content)
}

/// Content hash of a graph, for startup logging and change detection.
pub fn graph_hash(graph: &SceneGraph) -> String {
    let canonical = serde_json::to_string(graph).unwrap_or_default();
    format!("{:x}", Sha256::digest(canonical.as_bytes()))
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
