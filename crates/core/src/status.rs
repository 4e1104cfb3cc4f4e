// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observable node and puzzle statuses.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Lifecycle state of a scene or subgraph node.
///
/// Initial state is `Idle`; the entry node becomes `Active` on scene start.
/// Terminal transitions: `Active → Completed` (normal), `Active →
/// Overridden` (operator), `Active → Failed` (reserved). A node leaves a
/// terminal state only through an explicit reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Idle,
    Active,
    Completed,
    Failed,
    Overridden,
}

impl NodeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Overridden)
    }
}

crate::simple_display! {
    NodeState {
        Idle => "idle",
        Active => "active",
        Completed => "completed",
        Failed => "failed",
        Overridden => "overridden",
    }
}

/// Final disposition of a puzzle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    #[default]
    Unresolved,
    Solved,
    Overridden,
}

impl Resolution {
    /// Solved and overridden both count as resolved for edge conditions
    /// and parallel joins.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Solved | Self::Overridden)
    }
}

crate::simple_display! {
    Resolution {
        Unresolved => "unresolved",
        Solved => "solved",
        Overridden => "overridden",
    }
}

/// Snapshot entry for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub node_id: SmolStr,
    pub state: NodeState,
}

/// Snapshot entry for one puzzle node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleStatus {
    pub node_id: SmolStr,
    pub resolution: Resolution,
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
