// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The step queue: node activation and completion.

use super::{SceneRuntime, Step};
use crate::puzzle::PuzzleRuntime;
use room_core::registry::names;
use room_core::{fields, Clock, NodeState};
use room_scene::{NodeType, Scene};
use smol_str::SmolStr;
use std::collections::VecDeque;
use std::sync::Arc;

impl<C: Clock> SceneRuntime<C> {
    /// Drain the step queue. Activation and completion both check current
    /// state before acting, so re-processing a node is a no-op and repeated
    /// re-evaluation cannot duplicate lifecycle events.
    pub(crate) async fn process(&mut self, steps: Vec<Step>) {
        let graph = Arc::clone(&self.graph);
        let Some(scene) = self.active_scene.clone().and_then(|id| graph.scene(&id)) else {
            return;
        };
        let mut queue: VecDeque<Step> = steps.into();
        while let Some(step) = queue.pop_front() {
            match step {
                Step::Activate(id) => self.do_activate(scene, &id, &mut queue).await,
                Step::Complete(id) => {
                    if self.do_complete(scene, &id) {
                        self.advance_from(scene, &id, &mut queue);
                    }
                }
                Step::AdvanceFrom(id) => self.advance_from(scene, &id, &mut queue),
            }
        }
    }

    /// `idle → active`, then the per-type activation rule.
    async fn do_activate(&mut self, scene: &Scene, id: &SmolStr, queue: &mut VecDeque<Step>) {
        let Some(node) = scene.node(id) else { return };
        if self.state(id) != NodeState::Idle {
            return;
        }
        self.nodes.insert(node.id.clone(), NodeState::Active);
        self.bus.info(names::NODE_STARTED, fields! {"node_id" => id.as_str()});

        match node.kind {
            NodeType::Parallel => {
                for child in node.children() {
                    queue.push_back(Step::Activate(SmolStr::new(child)));
                }
            }
            NodeType::Puzzle => {
                // Vetted at load; a dangling reference stops the branch.
                let Some(subgraph_id) = node.subgraph_id() else { return };
                self.bus.info(
                    names::PUZZLE_ACTIVATED,
                    fields! {"node_id" => id.as_str(), "subgraph_id" => subgraph_id},
                );
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
                    queue.push_back(Step::Complete(node.id.clone()));
                }
            }
            NodeType::Action => {
                if let Some(executor) = self.executor.clone() {
                    // Dispatch failures already emitted device.error; the
                    // node completes regardless.
                    let _ = executor.execute(id.as_str(), &node.config).await;
                }
                queue.push_back(Step::Complete(node.id.clone()));
            }
            NodeType::Loop => {
                self.bus.info(names::LOOP_STARTED, fields! {"node_id" => id.as_str()});
            }
            NodeType::Terminal => {
                queue.push_back(Step::Complete(node.id.clone()));
            }
            // Decisions and reserved kinds stay active awaiting external input.
            _ => {}
        }
    }

    /// `active → completed`; false when the node is already terminal.
    fn do_complete(&mut self, scene: &Scene, id: &SmolStr) -> bool {
        let Some(node) = scene.node(id) else { return false };
        if self.state(id).is_terminal() {
            return false;
        }
        self.nodes.insert(node.id.clone(), NodeState::Completed);
        self.bus.info(names::NODE_COMPLETED, fields! {"node_id" => id.as_str()});
        if node.kind == NodeType::Terminal {
            self.bus.info(names::SCENE_COMPLETED, fields! {"scene_id" => scene.id.as_str()});
        }
        true
    }
}
