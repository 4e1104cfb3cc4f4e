// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart restores an override: replaying the durable log rebuilds the
//! session without re-emitting or re-executing anything.

use crate::prelude::*;
use room_engine::restore::{restore_from_log, DEFAULT_RESTORE_TAIL};
use room_storage::EventLog;

#[tokio::test]
async fn restart_restores_override() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("events.log");
    let graph = Arc::new(room_scene::parse_scene_graph(SPEC_GRAPH).unwrap());

    // First life: start the intro and override the scarab puzzle.
    {
        let log = Arc::new(EventLog::open(&log_path, "room-1").unwrap());
        let bus = Arc::new(EventBus::with_projection(FakeClock::new(), log.clone()));
        let mut runtime = SceneRuntime::new(Arc::clone(&graph), Arc::clone(&bus));
        runtime.start_scene("scene_intro").await.unwrap();
        runtime.override_node("puzzle_scarab").await.unwrap();
        log.flush().unwrap();
    }

    // Second life: fresh runtime, replay the tail.
    let log = Arc::new(EventLog::open(&log_path, "room-1").unwrap());
    let tail = log.query(DEFAULT_RESTORE_TAIL).unwrap();
    let bus = Arc::new(EventBus::with_projection(FakeClock::new(), log.clone()));
    let mut runtime = SceneRuntime::new(Arc::clone(&graph), Arc::clone(&bus));

    let restored = restore_from_log(&mut runtime, &bus, &tail, "room-1").unwrap();
    assert!(restored);

    assert!(runtime.is_game_active());
    assert_eq!(runtime.active_scene_id(), Some("scene_intro"));
    assert_eq!(runtime.node_state("puzzle_scarab"), Some(NodeState::Overridden));
    assert_eq!(runtime.puzzle_resolution("puzzle_scarab"), Some(Resolution::Overridden));
    assert_eq!(runtime.puzzle_resolution("puzzle_tiles"), Some(Resolution::Unresolved));

    // Exactly one event came out of the restore, counting the rows read.
    let events = bus.snapshot();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "system.startup_restore");
    assert_eq!(events[0].fields.get("restored"), Some(&serde_json::json!(tail.len())));
    assert_eq!(events[0].str_field("room_id"), Some("room-1"));
}
