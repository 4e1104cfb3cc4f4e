// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cold-start restore: fold the durable log tail back into runtime state.
//!
//! The reduction reads a bounded newest-first tail, reverses it to
//! chronological order, and keeps only what a session needs to continue:
//! whether a session was active, which scene, and each puzzle's resolution.
//! Apply re-emits nothing and re-executes no actions; the single
//! `system.startup_restore` afterwards is the only trace.

use crate::bus::EventBus;
use crate::error::RuntimeError;
use crate::runtime::SceneRuntime;
use room_core::registry::names;
use room_core::{fields, Clock, Resolution};
use room_storage::LogRow;
use smol_str::SmolStr;
use std::collections::HashMap;

/// Log rows read on restore by default.
pub const DEFAULT_RESTORE_TAIL: usize = 1000;

/// Minimal state reconstructed from the event log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoredState {
    pub session_active: bool,
    pub scene_id: String,
    pub puzzle_states: HashMap<SmolStr, Resolution>,
}

/// Fold a newest-first log tail into a [`RestoredState`]; `None` when the
/// tail ends with no active session.
pub fn reduce(rows: &[LogRow]) -> Option<RestoredState> {
    let mut state = RestoredState::default();
    for row in rows.iter().rev() {
        match row.event.as_str() {
            names::SCENE_STARTED => {
                state.session_active = true;
                state.scene_id = row
                    .fields
                    .get("scene_id")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                state.puzzle_states.clear();
            }
            names::SCENE_RESET => {
                state.session_active = false;
                state.scene_id.clear();
                state.puzzle_states.clear();
            }
            names::PUZZLE_SOLVED => {
                if let Some(id) = subject_node(row, true) {
                    state.puzzle_states.insert(id, Resolution::Solved);
                }
            }
            names::PUZZLE_OVERRIDDEN | names::OPERATOR_OVERRIDE => {
                if let Some(id) = subject_node(row, false) {
                    state.puzzle_states.insert(id, Resolution::Overridden);
                }
            }
            names::PUZZLE_RESET | names::OPERATOR_RESET => {
                if let Some(id) = subject_node(row, false) {
                    state.puzzle_states.insert(id, Resolution::Unresolved);
                }
            }
            _ => {}
        }
    }
    state.session_active.then_some(state)
}

/// `node_id`, optionally falling back to `puzzle_id` (older solved rows).
fn subject_node(row: &LogRow, fall_back_to_puzzle_id: bool) -> Option<SmolStr> {
    let direct = row.fields.get("node_id").and_then(|v| v.as_str());
    let id = match direct {
        Some(id) => Some(id),
        None if fall_back_to_puzzle_id => row.fields.get("puzzle_id").and_then(|v| v.as_str()),
        None => None,
    };
    id.map(SmolStr::new)
}

/// Reduce the tail and apply it to the runtime. Returns whether a session
/// was restored; emits exactly one `system.startup_restore` when it was.
pub fn restore_from_log<C: Clock>(
    runtime: &mut SceneRuntime<C>,
    bus: &EventBus<C>,
    rows: &[LogRow],
    room_id: &str,
) -> Result<bool, RuntimeError> {
    let Some(state) = reduce(rows) else {
        return Ok(false);
    };
    runtime.apply_restored(&state)?;
    bus.info(
        names::SYSTEM_STARTUP_RESTORE,
        fields! {
            "restored" => rows.len() as u64,
            "room_id" => room_id,
        },
    );
    Ok(true)
}

#[cfg(test)]
#[path = "restore_tests.rs"]
mod tests;
