// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scene runtime: top-level graph executor.
//!
//! Hosts a single active scene, owns every per-node status and puzzle
//! runtime, and translates external inputs (injected events, operator
//! overrides and resets) into state-machine progress. All mutation happens
//! on one logical execution context; callers serialise access.
//!
//! Internal progress is a drained step queue rather than recursion, so deep
//! graphs cannot overflow and the emitted event order is deterministic: all
//! events produced by one transition are on the bus before the triggering
//! call returns.

mod activate;
mod advance;
mod reset;

use crate::bus::EventBus;
use crate::dispatch::ActionExecutor;
use crate::error::RuntimeError;
use crate::puzzle::PuzzleRuntime;
use crate::restore::RestoredState;
use room_core::registry::names;
use room_core::{fields, Clock, Event, Fields, Level, NodeState, NodeStatus, PuzzleStatus, Resolution, SystemClock};
use room_scene::{NodeType, Scene, SceneGraph};
use smol_str::SmolStr;
use std::collections::HashMap;
use std::sync::Arc;

/// Unit of internal work processed by the step queue.
///
/// `AdvanceFrom` runs the join check and edge evaluation for a node whose
/// terminal state was set outside the normal completion path (override).
pub(crate) enum Step {
    Activate(SmolStr),
    Complete(SmolStr),
    AdvanceFrom(SmolStr),
}

/// Executor for one room's active scene.
pub struct SceneRuntime<C: Clock = SystemClock> {
    graph: Arc<SceneGraph>,
    bus: Arc<EventBus<C>>,
    executor: Option<Arc<dyn ActionExecutor>>,
    active_scene: Option<SmolStr>,
    nodes: HashMap<SmolStr, NodeState>,
    puzzles: HashMap<SmolStr, Resolution>,
    runtimes: HashMap<SmolStr, PuzzleRuntime<C>>,
}

impl<C: Clock> SceneRuntime<C> {
    pub fn new(graph: Arc<SceneGraph>, bus: Arc<EventBus<C>>) -> Self {
        Self {
            graph,
            bus,
            executor: None,
            active_scene: None,
            nodes: HashMap::new(),
            puzzles: HashMap::new(),
            runtimes: HashMap::new(),
        }
    }

    /// Bind the dispatcher for `action` nodes. Call before starting a scene.
    pub fn set_action_executor(&mut self, executor: Arc<dyn ActionExecutor>) {
        self.executor = Some(executor);
    }

    // -- observation ---------------------------------------------------------

    pub fn is_game_active(&self) -> bool {
        self.active_scene.is_some()
    }

    pub fn active_scene_id(&self) -> Option<&str> {
        self.active_scene.as_deref()
    }

    /// Whether `id` names a node in the active scene.
    pub fn has_node(&self, id: &str) -> bool {
        let graph = &self.graph;
        self.active_scene
            .as_deref()
            .and_then(|scene_id| graph.scene(scene_id))
            .is_some_and(|scene| scene.node(id).is_some())
    }

    pub fn node_state(&self, id: &str) -> Option<NodeState> {
        self.nodes.get(id).copied()
    }

    pub fn puzzle_resolution(&self, id: &str) -> Option<Resolution> {
        self.puzzles.get(id).copied()
    }

    /// Per-node states in scene declaration order.
    pub fn node_statuses(&self) -> Vec<NodeStatus> {
        let Some(scene) = self.active_scene.as_deref().and_then(|id| self.graph.scene(id)) else {
            return Vec::new();
        };
        scene
            .nodes
            .iter()
            .map(|node| NodeStatus { node_id: node.id.clone(), state: self.state(&node.id) })
            .collect()
    }

    /// Per-puzzle resolutions in scene declaration order.
    pub fn puzzle_statuses(&self) -> Vec<PuzzleStatus> {
        let Some(scene) = self.active_scene.as_deref().and_then(|id| self.graph.scene(id)) else {
            return Vec::new();
        };
        scene
            .nodes
            .iter()
            .filter(|node| node.kind == NodeType::Puzzle)
            .map(|node| PuzzleStatus {
                node_id: node.id.clone(),
                resolution: self.puzzles.get(&node.id).copied().unwrap_or_default(),
            })
            .collect()
    }

    // -- lifecycle -----------------------------------------------------------

    /// Set the active scene, initialise statuses, and activate the entry.
    pub async fn start_scene(&mut self, id: &str) -> Result<(), RuntimeError> {
        let graph = Arc::clone(&self.graph);
        let scene = graph.scene(id).ok_or_else(|| RuntimeError::UnknownScene(id.to_string()))?;
        self.clear_runtime_state();
        self.active_scene = Some(scene.id.clone());
        self.init_statuses(scene);
        self.bus.info(names::SCENE_STARTED, fields! {"scene_id" => scene.id.as_str()});
        let entry = scene.entry.clone();
        self.process(vec![Step::Activate(entry)]).await;
        Ok(())
    }

    /// Reset all runtime state, then start `id` (or the first scene).
    pub async fn start_game(&mut self, id: Option<&str>) -> Result<(), RuntimeError> {
        self.clear_runtime_state();
        let scene_id = match id {
            Some(id) if !id.is_empty() => SmolStr::new(id),
            _ => {
                let graph = Arc::clone(&self.graph);
                graph.first_scene().map(|s| s.id.clone()).ok_or(RuntimeError::EmptyGraph)?
            }
        };
        self.start_scene(&scene_id).await
    }

    /// Emit `scene.reset` and clear all runtime state.
    pub fn stop_game(&mut self) -> Result<(), RuntimeError> {
        let scene_id = self.active_scene.clone().ok_or(RuntimeError::NoActiveGame)?;
        self.bus.info(names::SCENE_RESET, fields! {"scene_id" => scene_id.as_str()});
        self.clear_runtime_state();
        Ok(())
    }

    // -- inputs --------------------------------------------------------------

    /// Route an external event to every puzzle runtime, complete any puzzle
    /// node whose runtime resolved, then run the global re-evaluator.
    pub async fn inject_event(&mut self, name: &str, fields: Fields) -> Result<(), RuntimeError> {
        if !self.is_game_active() {
            return Err(RuntimeError::NoActiveGame);
        }
        let event = Event::new(self.bus.now(), Level::Info, name, None, fields);

        // Scene declaration order keeps delivery deterministic.
        let puzzle_ids: Vec<SmolStr> = {
            let graph = &self.graph;
            let Some(scene) = self.active_scene.as_deref().and_then(|id| graph.scene(id)) else {
                return Ok(());
            };
            scene
                .nodes
                .iter()
                .filter(|n| n.kind == NodeType::Puzzle)
                .map(|n| n.id.clone())
                .collect()
        };

        let mut newly_resolved = Vec::new();
        for id in puzzle_ids {
            let Some(runtime) = self.runtimes.get_mut(&id) else { continue };
            if runtime.handle_event(&event).await {
                newly_resolved.push((id, runtime.resolution()));
            }
        }
        for (id, resolution) in newly_resolved {
            self.puzzles.insert(id.clone(), resolution);
            self.process(vec![Step::Complete(id)]).await;
        }

        self.reevaluate().await;
        Ok(())
    }

    /// Operator override: force the node into a resolved terminal state.
    ///
    /// Emits `node.overridden`, then (for puzzles) `puzzle.overridden`, then
    /// `node.completed`, and re-runs join and edge evaluation. The node's
    /// own state stays `Overridden`.
    pub async fn override_node(&mut self, id: &str) -> Result<(), RuntimeError> {
        let graph = Arc::clone(&self.graph);
        let scene = self.require_scene(&graph)?;
        let node =
            scene.node(id).ok_or_else(|| RuntimeError::UnknownNode(id.to_string()))?;
        if self.state(id).is_terminal() {
            return Err(RuntimeError::NodeAlreadyTerminal(id.to_string()));
        }

        self.nodes.insert(node.id.clone(), NodeState::Overridden);
        self.bus.info(names::NODE_OVERRIDDEN, fields! {"node_id" => id});

        if node.kind == NodeType::Puzzle {
            let emitted = match self.runtimes.get_mut(&node.id) {
                Some(runtime) => runtime.mark_overridden(),
                None => false,
            };
            let already = self.puzzles.get(&node.id).copied().unwrap_or_default().is_resolved();
            if !emitted && !already {
                let mut fields = fields! {"puzzle_id" => id, "node_id" => id};
                if let Some(subgraph_id) = node.subgraph_id() {
                    fields.insert("subgraph_id".to_string(), subgraph_id.into());
                }
                self.bus.info(names::PUZZLE_OVERRIDDEN, fields);
            }
            self.puzzles.insert(node.id.clone(), Resolution::Overridden);
        }

        self.bus.info(names::NODE_COMPLETED, fields! {"node_id" => id});
        self.process(vec![Step::AdvanceFrom(node.id.clone())]).await;
        Ok(())
    }

    // -- restore -------------------------------------------------------------

    /// Overlay a reduced restore state: defaults first, then restored puzzle
    /// resolutions mirrored to node states. Emits nothing and executes no
    /// actions; repeated application yields identical maps.
    pub fn apply_restored(&mut self, state: &RestoredState) -> Result<(), RuntimeError> {
        let graph = Arc::clone(&self.graph);
        let scene = graph
            .scene(&state.scene_id)
            .ok_or_else(|| RuntimeError::UnknownScene(state.scene_id.clone()))?;
        self.clear_runtime_state();
        self.active_scene = Some(scene.id.clone());
        self.init_statuses(scene);
        for (id, resolution) in &state.puzzle_states {
            if !self.puzzles.contains_key(id) {
                continue;
            }
            self.puzzles.insert(id.clone(), *resolution);
            match resolution {
                Resolution::Solved => {
                    self.nodes.insert(id.clone(), NodeState::Completed);
                }
                Resolution::Overridden => {
                    self.nodes.insert(id.clone(), NodeState::Overridden);
                }
                Resolution::Unresolved => {}
            }
        }
        Ok(())
    }

    // -- internals -----------------------------------------------------------

    pub(crate) fn state(&self, id: &str) -> NodeState {
        self.nodes.get(id).copied().unwrap_or_default()
    }

    fn require_scene<'g>(&self, graph: &'g SceneGraph) -> Result<&'g Scene, RuntimeError> {
        let id = self.active_scene.as_deref().ok_or(RuntimeError::NoActiveGame)?;
        graph.scene(id).ok_or_else(|| RuntimeError::UnknownScene(id.to_string()))
    }

    fn init_statuses(&mut self, scene: &Scene) {
        for node in &scene.nodes {
            self.nodes.insert(node.id.clone(), NodeState::Idle);
            if node.kind == NodeType::Puzzle {
                self.puzzles.insert(node.id.clone(), Resolution::Unresolved);
            }
        }
    }

    fn clear_runtime_state(&mut self) {
        self.active_scene = None;
        self.nodes.clear();
        self.puzzles.clear();
        self.runtimes.clear();
    }
}

#[cfg(test)]
#[path = "../runtime_tests/mod.rs"]
mod tests;
