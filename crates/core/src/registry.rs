// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closed registry of event names.
//!
//! Every emitted event name must appear here, case-sensitive. The set is a
//! closed enumeration: adding a name means editing this table, never
//! inventing one at an emit site. Unknown names are dropped by the bus.

/// Registered event names as constants for emit sites.
pub mod names {
    pub const NODE_STARTED: &str = "node.started";
    pub const NODE_COMPLETED: &str = "node.completed";
    pub const NODE_FAILED: &str = "node.failed";
    pub const NODE_RESET: &str = "node.reset";
    pub const NODE_OVERRIDDEN: &str = "node.overridden";

    pub const PUZZLE_ACTIVATED: &str = "puzzle.activated";
    pub const PUZZLE_SOLVED: &str = "puzzle.solved";
    pub const PUZZLE_FAILED: &str = "puzzle.failed";
    pub const PUZZLE_RESET: &str = "puzzle.reset";
    pub const PUZZLE_OVERRIDDEN: &str = "puzzle.overridden";

    pub const SCENE_STARTED: &str = "scene.started";
    pub const SCENE_COMPLETED: &str = "scene.completed";
    pub const SCENE_FAILED: &str = "scene.failed";
    pub const SCENE_RESET: &str = "scene.reset";

    pub const LOOP_STARTED: &str = "loop.started";
    pub const LOOP_TICK: &str = "loop.tick";
    pub const LOOP_STOPPED: &str = "loop.stopped";

    pub const TIMER_STARTED: &str = "timer.started";
    pub const TIMER_EXPIRED: &str = "timer.expired";
    pub const TIMER_CANCELLED: &str = "timer.cancelled";

    pub const OPERATOR_OVERRIDE: &str = "operator.override";
    pub const OPERATOR_RESET: &str = "operator.reset";
    pub const OPERATOR_JUMP: &str = "operator.jump";
    pub const OPERATOR_PAUSE: &str = "operator.pause";
    pub const OPERATOR_RESUME: &str = "operator.resume";

    pub const DEVICE_CONNECTED: &str = "device.connected";
    pub const DEVICE_DISCONNECTED: &str = "device.disconnected";
    pub const DEVICE_INPUT: &str = "device.input";
    pub const DEVICE_ERROR: &str = "device.error";

    pub const SYSTEM_STARTUP: &str = "system.startup";
    pub const SYSTEM_SHUTDOWN: &str = "system.shutdown";
    pub const SYSTEM_ERROR: &str = "system.error";
    pub const SYSTEM_STARTUP_RESTORE: &str = "system.startup_restore";
}

/// Sorted for binary search. Keep in lexicographic order.
static REGISTERED: [&str; 33] = [
    "device.connected",
    "device.disconnected",
    "device.error",
    "device.input",
    "loop.started",
    "loop.stopped",
    "loop.tick",
    "node.completed",
    "node.failed",
    "node.overridden",
    "node.reset",
    "node.started",
    "operator.jump",
    "operator.override",
    "operator.pause",
    "operator.reset",
    "operator.resume",
    "puzzle.activated",
    "puzzle.failed",
    "puzzle.overridden",
    "puzzle.reset",
    "puzzle.solved",
    "scene.completed",
    "scene.failed",
    "scene.reset",
    "scene.started",
    "system.error",
    "system.shutdown",
    "system.startup",
    "system.startup_restore",
    "timer.cancelled",
    "timer.expired",
    "timer.started",
];

/// Whether `name` is a registered event name. Case-sensitive.
pub fn is_registered(name: &str) -> bool {
    REGISTERED.binary_search(&name).is_ok()
}

/// All registered names, lexicographically ordered.
pub fn all() -> &'static [&'static str] {
    &REGISTERED
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
