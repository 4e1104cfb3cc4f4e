// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! room-daemon: one process, one room.
//!
//! The room loop owns the scene runtime and serialises every external input
//! — operator requests, broker messages, shutdown — through a single queue.
//! The HTTP/WebSocket surface is not part of this crate; it talks to the
//! loop through [`room::RoomHandle`] and the [`protocol`] types.

pub mod env;
pub mod protocol;
pub mod room;

pub use env::RoomEnv;
pub use protocol::{Request, Response};
pub use room::{Room, RoomHandle, RoomInput};
