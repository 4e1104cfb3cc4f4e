// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator resets: single-node reset and checkpoint rewind.

use super::{SceneRuntime, Step};
use crate::error::RuntimeError;
use crate::puzzle::PuzzleRuntime;
use room_core::registry::names;
use room_core::{fields, Clock, NodeState, Resolution};
use room_scene::{Node, NodeType};
use smol_str::SmolStr;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

impl<C: Clock> SceneRuntime<C> {
    /// Reset one node: puzzles drop their runtime and return to
    /// `unresolved` (emitting `puzzle.reset`), the node becomes `active`,
    /// and `node.reset` is emitted.
    pub async fn reset_node(&mut self, id: &str) -> Result<(), RuntimeError> {
        let graph = Arc::clone(&self.graph);
        let scene = self.require_scene(&graph)?;
        let node = scene.node(id).ok_or_else(|| RuntimeError::UnknownNode(id.to_string()))?;

        if node.kind == NodeType::Puzzle {
            self.reset_puzzle(node);
            // A fresh runtime replaces the dropped one so the node really is
            // live again, not a stale shell.
            if let Some(subgraph_id) = node.subgraph_id() {
                let mut runtime = PuzzleRuntime::new(
                    Arc::clone(&self.graph),
                    scene.id.clone(),
                    SmolStr::new(subgraph_id),
                    node.id.clone(),
                    Arc::clone(&self.bus),
                    self.executor.clone(),
                );
                runtime.start().await;
                let resolution = runtime.resolution();
                self.runtimes.insert(node.id.clone(), runtime);
                if resolution.is_resolved() {
                    self.puzzles.insert(node.id.clone(), resolution);
                }
            }
        }
        self.nodes.insert(node.id.clone(), NodeState::Active);
        self.bus.info(names::NODE_RESET, fields! {"node_id" => id});
        Ok(())
    }

    /// Checkpoint rewind: discover the downstream set by BFS over edges
    /// (parallels also contribute their children), reset every visited node
    /// to `idle` with the lifecycle events its prior state calls for, then
    /// re-activate the target.
    pub async fn reset_to_node(&mut self, id: &str) -> Result<(), RuntimeError> {
        let graph = Arc::clone(&self.graph);
        let scene = self.require_scene(&graph)?;
        if scene.node(id).is_none() {
            return Err(RuntimeError::UnknownNode(id.to_string()));
        }

        // BFS; visit order doubles as emission order.
        let mut visited: Vec<SmolStr> = Vec::new();
        let mut seen: HashSet<SmolStr> = HashSet::new();
        let mut frontier: VecDeque<SmolStr> = VecDeque::from([SmolStr::new(id)]);
        while let Some(current) = frontier.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            visited.push(current.clone());
            if let Some(node) = scene.node(&current) {
                if node.kind == NodeType::Parallel {
                    for child in node.children() {
                        frontier.push_back(SmolStr::new(child));
                    }
                }
            }
            for edge in scene.edges_from(&current) {
                frontier.push_back(edge.to.clone());
            }
        }

        for node_id in &visited {
            let Some(node) = scene.node(node_id) else { continue };
            let prior = self.state(node_id);
            if prior == NodeState::Idle {
                continue;
            }
            if node.kind == NodeType::Loop && prior == NodeState::Active {
                self.bus.info(names::LOOP_STOPPED, fields! {"node_id" => node_id.as_str()});
            }
            if node.kind == NodeType::Puzzle {
                self.reset_puzzle(node);
            }
            self.nodes.insert(node_id.clone(), NodeState::Idle);
            self.bus.info(names::NODE_RESET, fields! {"node_id" => node_id.as_str()});
        }

        self.process(vec![Step::Activate(SmolStr::new(id))]).await;
        Ok(())
    }

    /// Drop the puzzle runtime, clear the resolution, emit `puzzle.reset`.
    fn reset_puzzle(&mut self, node: &Node) {
        self.runtimes.remove(&node.id);
        self.puzzles.insert(node.id.clone(), Resolution::Unresolved);
        let mut fields = fields! {"node_id" => node.id.as_str()};
        if let Some(subgraph_id) = node.subgraph_id() {
            fields.insert("subgraph_id".to_string(), subgraph_id.into());
        }
        self.bus.info(names::PUZZLE_RESET, fields);
    }
}
