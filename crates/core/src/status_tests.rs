// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    idle = { NodeState::Idle, false },
    active = { NodeState::Active, false },
    completed = { NodeState::Completed, true },
    failed = { NodeState::Failed, true },
    overridden = { NodeState::Overridden, true },
)]
fn node_terminality(state: NodeState, terminal: bool) {
    assert_eq!(state.is_terminal(), terminal);
}

#[parameterized(
    unresolved = { Resolution::Unresolved, false },
    solved = { Resolution::Solved, true },
    overridden = { Resolution::Overridden, true },
)]
fn resolution_counts_override_as_resolved(resolution: Resolution, resolved: bool) {
    assert_eq!(resolution.is_resolved(), resolved);
}

#[test]
fn serde_uses_snake_case_wire_names() {
    assert_eq!(serde_json::to_string(&NodeState::Overridden).unwrap(), "\"overridden\"");
    assert_eq!(serde_json::from_str::<Resolution>("\"solved\"").unwrap(), Resolution::Solved);
}

#[test]
fn display_matches_wire_names() {
    assert_eq!(NodeState::Idle.to_string(), "idle");
    assert_eq!(Resolution::Unresolved.to_string(), "unresolved");
}

#[test]
fn defaults_are_the_initial_states() {
    assert_eq!(NodeState::default(), NodeState::Idle);
    assert_eq!(Resolution::default(), Resolution::Unresolved);
}
