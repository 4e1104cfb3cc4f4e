// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Joins, edge evaluation, and the global re-evaluator.

use super::{SceneRuntime, Step};
use room_core::registry::names;
use room_core::{evaluate, fields, Clock, EvalContext, NodeState};
use room_scene::{NodeType, Scene};
use smol_str::SmolStr;
use std::collections::VecDeque;
use std::sync::Arc;

/// Whether a source node counts as advancing for joins and edges. An
/// overridden node is as good as a completed one.
fn advances(state: NodeState) -> bool {
    matches!(state, NodeState::Completed | NodeState::Overridden)
}

impl<C: Clock> SceneRuntime<C> {
    /// Join check and outgoing-edge evaluation after `from` reached a
    /// resolved terminal state.
    pub(crate) fn advance_from(
        &mut self,
        scene: &Scene,
        from: &SmolStr,
        queue: &mut VecDeque<Step>,
    ) {
        // A parallel completes exactly when its last child advances.
        for node in &scene.nodes {
            if node.kind != NodeType::Parallel || self.state(&node.id) != NodeState::Active {
                continue;
            }
            let children = node.children();
            if !children.is_empty() && children.iter().all(|child| advances(self.state(child))) {
                queue.push_back(Step::Complete(node.id.clone()));
            }
        }

        // Outgoing edges in declaration order, under the puzzle-state map.
        for edge in scene.edges_from(from) {
            if self.state(&edge.to) == NodeState::Idle
                && evaluate(&edge.condition, &EvalContext { event: None, puzzles: &self.puzzles })
            {
                queue.push_back(Step::Activate(edge.to.clone()));
            }
        }
    }

    /// Global re-evaluation: stop loops whose condition now holds and fire
    /// every edge whose source advanced while its target stayed idle.
    ///
    /// Idempotent — the synchronisation point at which puzzle resolution
    /// observed by one component propagates to the rest of the scene.
    pub(crate) async fn reevaluate(&mut self) {
        let graph = Arc::clone(&self.graph);
        let Some(scene) = self.active_scene.clone().and_then(|id| graph.scene(&id)) else {
            return;
        };

        let mut steps = Vec::new();
        for node in &scene.nodes {
            if node.kind != NodeType::Loop || self.state(&node.id) != NodeState::Active {
                continue;
            }
            let Some(stop) = node.stop_condition() else { continue };
            if evaluate(stop, &EvalContext { event: None, puzzles: &self.puzzles }) {
                self.bus.info(names::LOOP_STOPPED, fields! {"node_id" => node.id.as_str()});
                steps.push(Step::Complete(node.id.clone()));
            }
        }
        for edge in &scene.edges {
            if advances(self.state(&edge.from))
                && self.state(&edge.to) == NodeState::Idle
                && evaluate(&edge.condition, &EvalContext { event: None, puzzles: &self.puzzles })
            {
                steps.push(Step::Activate(edge.to.clone()));
            }
        }
        if !steps.is_empty() {
            self.process(steps).await;
        }
    }
}
