// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! room-adapters: the broker seam.
//!
//! The runtime only ever sees [`BrokerAdapter`] (outbound publish) and
//! [`BrokerMessage`] (inbound traffic); broker client internals stay behind
//! this boundary. The NATS implementation lives in [`nats`]; tests use the
//! recording [`FakeBroker`].

pub mod nats;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by broker adapters.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker connect failed: {0}")]
    Connect(String),
    #[error("broker not connected")]
    NotConnected,
    #[error("publish to '{topic}' failed: {reason}")]
    PublishFailed { topic: String, reason: String },
}

/// Outbound publish seam. Implementations must not retry indefinitely; the
/// dispatcher bounds each publish with its own timeout.
#[async_trait]
pub trait BrokerAdapter: Send + Sync + 'static {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BrokerError>;
}

/// One inbound broker message, already detached from client internals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBroker, PublishedMessage};
