// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! room-engine: the scene-graph orchestrator and its event substrate.
//!
//! The [`runtime::SceneRuntime`] owns all per-node and per-puzzle state for
//! one active scene and is single-owner: callers serialise access (the
//! daemon funnels every input through one queue). Events flow through the
//! [`bus::EventBus`] to live subscribers and the durable projection; the
//! [`dispatch::CommandDispatcher`] turns action nodes into broker publishes;
//! the [`restore`] module folds the log tail back into runtime state.

pub mod bus;
pub mod devices;
pub mod dispatch;
mod error;
pub mod puzzle;
pub mod restore;
pub mod runtime;

pub use bus::{EventBus, Projection, ProjectionError, SubscriberHandle, Subscription};
pub use devices::{DeviceError, DeviceRegistry};
pub use dispatch::{ActionExecutor, CommandDispatcher, DispatchError};
pub use error::RuntimeError;
pub use puzzle::PuzzleRuntime;
pub use restore::{reduce, restore_from_log, RestoredState};
pub use runtime::SceneRuntime;
