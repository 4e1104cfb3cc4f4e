// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One puzzle instance: the subgraph's internal state machine.
//!
//! Subgraph action nodes complete immediately and advance under a synthetic
//! `node.completed` event; decision nodes wait for an external event to
//! satisfy an outgoing edge; reaching a terminal resolves the puzzle. The
//! parent scene runtime owns these runtimes keyed by puzzle-node id and
//! destroys them on reset.

use crate::bus::EventBus;
use crate::dispatch::ActionExecutor;
use room_core::registry::names;
use room_core::{evaluate, fields, Clock, EvalContext, Event, Fields, Level, NodeState, Resolution, SystemClock};
use room_scene::{NodeType, SceneGraph, Subgraph};
use smol_str::SmolStr;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Runtime state for one activated puzzle node.
pub struct PuzzleRuntime<C: Clock = SystemClock> {
    graph: Arc<SceneGraph>,
    scene_id: SmolStr,
    subgraph_id: SmolStr,
    puzzle_node_id: SmolStr,
    bus: Arc<EventBus<C>>,
    executor: Option<Arc<dyn ActionExecutor>>,
    nodes: HashMap<SmolStr, NodeState>,
    resolution: Resolution,
}

impl<C: Clock> PuzzleRuntime<C> {
    pub fn new(
        graph: Arc<SceneGraph>,
        scene_id: SmolStr,
        subgraph_id: SmolStr,
        puzzle_node_id: SmolStr,
        bus: Arc<EventBus<C>>,
        executor: Option<Arc<dyn ActionExecutor>>,
    ) -> Self {
        Self {
            graph,
            scene_id,
            subgraph_id,
            puzzle_node_id,
            bus,
            executor,
            nodes: HashMap::new(),
            resolution: Resolution::Unresolved,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn subgraph_id(&self) -> &str {
        &self.subgraph_id
    }

    /// State of one subgraph node (`Idle` when never activated).
    pub fn node_state(&self, id: &str) -> NodeState {
        self.nodes.get(id).copied().unwrap_or_default()
    }

    /// Activate the subgraph's entry node.
    pub async fn start(&mut self) {
        let graph = Arc::clone(&self.graph);
        let Some(subgraph) = lookup(&graph, &self.scene_id, &self.subgraph_id) else {
            return;
        };
        let entry = subgraph.entry.clone();
        self.activate_from(subgraph, vec![entry]).await;
    }

    /// Drive active decisions under `event`, in declared edge order; the
    /// first satisfied edge completes the decision and activates its target.
    ///
    /// Returns true iff the resolution changed from `Unresolved`.
    pub async fn handle_event(&mut self, event: &Event) -> bool {
        if self.resolution.is_resolved() {
            return false;
        }
        let graph = Arc::clone(&self.graph);
        let Some(subgraph) = lookup(&graph, &self.scene_id, &self.subgraph_id) else {
            return false;
        };

        let empty = HashMap::new();
        let ctx = EvalContext { event: Some(event), puzzles: &empty };
        let mut targets = Vec::new();
        for node in &subgraph.nodes {
            if node.kind != NodeType::Decision || self.node_state(&node.id) != NodeState::Active {
                continue;
            }
            for edge in subgraph.edges_from(&node.id) {
                if evaluate(&edge.condition, &ctx) {
                    self.nodes.insert(node.id.clone(), NodeState::Completed);
                    targets.push(edge.to.clone());
                    break;
                }
            }
        }
        if targets.is_empty() {
            return false;
        }
        self.activate_from(subgraph, targets).await;
        self.resolution.is_resolved()
    }

    /// Operator override: resolve without a terminal. Emits
    /// `puzzle.overridden` once; later calls are no-ops.
    pub fn mark_overridden(&mut self) -> bool {
        if self.resolution != Resolution::Unresolved {
            return false;
        }
        self.resolution = Resolution::Overridden;
        self.bus.info(names::PUZZLE_OVERRIDDEN, self.scope_fields());
        true
    }

    /// Activate nodes breadth-first, chaining through actions and stopping
    /// at decisions; a terminal resolves the puzzle.
    async fn activate_from(&mut self, subgraph: &Subgraph, initial: Vec<SmolStr>) {
        let mut queue: VecDeque<SmolStr> = initial.into();
        while let Some(id) = queue.pop_front() {
            let Some(node) = subgraph.node(&id) else { continue };
            if self.node_state(&id) != NodeState::Idle {
                continue;
            }
            self.nodes.insert(node.id.clone(), NodeState::Active);
            match node.kind {
                NodeType::Action => {
                    if let Some(executor) = self.executor.clone() {
                        // Failures are already logged as device.error; they
                        // do not block the completed transition.
                        let _ = executor.execute(node.id.as_str(), &node.config).await;
                    }
                    self.nodes.insert(node.id.clone(), NodeState::Completed);
                    let synthetic = Event::new(
                        self.bus.now(),
                        Level::Info,
                        names::NODE_COMPLETED,
                        None,
                        fields! {"node_id" => node.id.as_str()},
                    );
                    let empty = HashMap::new();
                    let ctx = EvalContext { event: Some(&synthetic), puzzles: &empty };
                    for edge in subgraph.edges_from(&node.id) {
                        if evaluate(&edge.condition, &ctx) {
                            queue.push_back(edge.to.clone());
                        }
                    }
                }
                NodeType::Terminal => {
                    self.nodes.insert(node.id.clone(), NodeState::Completed);
                    if self.resolution == Resolution::Unresolved {
                        self.resolution = Resolution::Solved;
                        self.bus.info(names::PUZZLE_SOLVED, self.scope_fields());
                    }
                }
                // Decisions wait for an external event; anything else is
                // inert inside a subgraph.
                _ => {}
            }
        }
    }

    fn scope_fields(&self) -> Fields {
        fields! {
            "puzzle_id" => self.puzzle_node_id.as_str(),
            "node_id" => self.puzzle_node_id.as_str(),
            "subgraph_id" => self.subgraph_id.as_str(),
        }
    }
}

fn lookup<'g>(graph: &'g SceneGraph, scene_id: &str, subgraph_id: &str) -> Option<&'g Subgraph> {
    graph.scene(scene_id)?.subgraph(subgraph_id)
}

#[cfg(test)]
#[path = "puzzle_tests.rs"]
mod tests;
