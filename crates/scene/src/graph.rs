// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scene-graph types. Immutable after load; cross-referenced by identifier.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Free-form node configuration mapping.
pub type NodeConfig = serde_json::Map<String, serde_json::Value>;

/// A loaded scene-graph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneGraph {
    pub version: u32,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl SceneGraph {
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn first_scene(&self) -> Option<&Scene> {
        self.scenes.first()
    }
}

/// A named container of nodes, edges, and subgraphs; the top-level unit of play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: SmolStr,
    #[serde(default)]
    pub name: String,
    pub entry: SmolStr,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub subgraphs: Vec<Subgraph>,
}

impl Scene {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn subgraph(&self, id: &str) -> Option<&Subgraph> {
        self.subgraphs.iter().find(|s| s.id == id)
    }

    /// Outgoing edges from `id` in declaration order.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.from == id)
    }
}

/// Node kinds. The second group is reserved: such nodes activate with no
/// additional side effect and stay active awaiting external input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Action,
    Puzzle,
    Decision,
    Parallel,
    Loop,
    Terminal,
    // -- reserved --
    Timer,
    Gate,
    Checkpoint,
    Operator,
    Random,
    Subgraph,
}

room_core::simple_display! {
    NodeType {
        Action => "action",
        Puzzle => "puzzle",
        Decision => "decision",
        Parallel => "parallel",
        Loop => "loop",
        Terminal => "terminal",
        Timer => "timer",
        Gate => "gate",
        Checkpoint => "checkpoint",
        Operator => "operator",
        Random => "random",
        Subgraph => "subgraph",
    }
}

/// A point in the scene graph with a type and free-form configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: SmolStr,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default)]
    pub config: NodeConfig,
}

impl Node {
    /// Ordered child node ids (`parallel` nodes).
    pub fn children(&self) -> Vec<&str> {
        self.config
            .get("children")
            .and_then(|v| v.as_array())
            .map(|list| list.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Referenced subgraph id (`puzzle` nodes).
    pub fn subgraph_id(&self) -> Option<&str> {
        self.config.get("subgraph").and_then(|v| v.as_str())
    }

    /// Stop condition string (`loop` nodes).
    pub fn stop_condition(&self) -> Option<&str> {
        self.config.get("stop_condition").and_then(|v| v.as_str())
    }

    /// Action kind (`action` nodes).
    pub fn action(&self) -> Option<&str> {
        self.config.get("action").and_then(|v| v.as_str())
    }

    /// Action parameter mapping (`action` nodes).
    pub fn params(&self) -> Option<&NodeConfig> {
        self.config.get("params").and_then(|v| v.as_object())
    }
}

/// Directed, conditional transition. An empty condition is always true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: SmolStr,
    pub to: SmolStr,
    #[serde(default)]
    pub condition: String,
}

/// A puzzle's internal directed graph, referenced by a puzzle node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subgraph {
    pub id: SmolStr,
    pub entry: SmolStr,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl Subgraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Outgoing edges from `id` in declaration order.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.from == id)
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
