// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording broker fake for tests.

use crate::{BrokerAdapter, BrokerError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// One recorded publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
struct FakeBrokerState {
    published: Vec<PublishedMessage>,
    fail: bool,
}

/// In-memory broker that records publishes and can be told to fail.
#[derive(Clone, Default)]
pub struct FakeBroker {
    state: Arc<Mutex<FakeBrokerState>>,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, in order.
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.state.lock().published.clone()
    }

    /// Make subsequent publishes fail (or succeed again).
    pub fn set_fail(&self, fail: bool) {
        self.state.lock().fail = fail;
    }
}

#[async_trait]
impl BrokerAdapter for FakeBroker {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BrokerError> {
        let mut state = self.state.lock();
        if state.fail {
            return Err(BrokerError::NotConnected);
        }
        state.published.push(PublishedMessage { topic: topic.to_string(), payload });
        Ok(())
    }
}
