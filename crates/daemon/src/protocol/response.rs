// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use room_core::{Event, NodeStatus, PuzzleStatus};
use room_storage::LogRow;
use serde::{Deserialize, Serialize};

/// Responses from the room loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    #[serde(rename = "ok")]
    Ok,

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "status")]
    Status {
        active: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scene_id: Option<String>,
        #[serde(default)]
        nodes: Vec<NodeStatus>,
        #[serde(default)]
        puzzles: Vec<PuzzleStatus>,
    },

    #[serde(rename = "events")]
    Events { events: Vec<Event> },

    #[serde(rename = "rows")]
    Rows { rows: Vec<LogRow> },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
