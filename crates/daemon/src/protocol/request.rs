// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

fn default_recent() -> usize {
    64
}

fn default_query_limit() -> usize {
    256
}

/// Requests accepted by the room loop.
///
/// Serializes with `{"type": "scope:verb", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Start a game; empty/absent scene id means the first scene.
    #[serde(rename = "game:start")]
    StartGame {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scene_id: Option<String>,
    },

    /// Stop the running game. Requires an active game.
    #[serde(rename = "game:stop")]
    StopGame,

    /// Active-scene snapshot: node states and puzzle resolutions.
    #[serde(rename = "game:status")]
    Status,

    /// Force a node into a resolved terminal state.
    #[serde(rename = "node:override")]
    OverrideNode { node_id: String },

    /// Reset one node back to active.
    #[serde(rename = "node:reset")]
    ResetNode { node_id: String },

    /// Checkpoint rewind: reset the node and everything downstream of it.
    #[serde(rename = "node:reset_to")]
    ResetToNode { node_id: String },

    /// Most recent events from the in-memory ring, oldest-first.
    #[serde(rename = "events:recent")]
    RecentEvents {
        #[serde(default = "default_recent")]
        count: usize,
    },

    /// Durable log range query, newest-first.
    #[serde(rename = "events:query")]
    QueryLog {
        #[serde(default = "default_query_limit")]
        limit: usize,
    },
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
