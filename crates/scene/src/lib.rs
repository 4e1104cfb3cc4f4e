// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! room-scene: the data-authored scene-graph format.
//!
//! Scene graphs are JSON documents (schema version 1) describing scenes,
//! nodes, conditional edges, and embedded puzzle subgraphs. Graphs are
//! vetted at load so the runtime can treat every reference as trusted.

mod graph;
mod parse;
mod validate;

pub use graph::{Edge, Node, NodeConfig, NodeType, Scene, SceneGraph, Subgraph};
pub use parse::{graph_hash, load_scene_graph, parse_scene_graph, GraphError, SUPPORTED_VERSION};
