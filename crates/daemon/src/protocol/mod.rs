// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator/game surface protocol.
//!
//! The external control surface (HTTP handlers, WebSocket sessions) turns
//! its requests into these types and sends them to the room loop; the loop
//! answers with [`Response`]. Wire format is JSON with a `type` tag.

mod request;
mod response;

pub use request::Request;
pub use response::Response;
