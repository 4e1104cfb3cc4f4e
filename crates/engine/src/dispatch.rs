// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action dispatch: turn an `action` node's configuration into a validated
//! broker publish.
//!
//! The only action kind is `device.command`; any other value is a no-op
//! success. Every failure — missing params, validation, topic lookup,
//! encoding, connectivity, timeout — emits `device.error` and returns an
//! error the caller does not stall on: the node still completes and the
//! scene advances, with the event log recording what the orchestrator
//! intended.

use crate::bus::EventBus;
use crate::devices::{DeviceError, DeviceRegistry};
use async_trait::async_trait;
use room_adapters::{BrokerAdapter, BrokerError};
use room_core::registry::names;
use room_core::{fields, Clock, CommandBody, DevicesConfig, Level, SystemClock};
use room_scene::NodeConfig;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// The single recognised action kind.
pub const ACTION_DEVICE_COMMAND: &str = "device.command";

/// Bound on the broker publish inside scene activation.
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

/// Dispatch failures. Observed by tests; callers log-and-continue.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("missing action param: {0}")]
    MissingParam(&'static str),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("device '{0}' has no command topic")]
    NoCommandTopic(String),
    #[error("failed to encode command: {0}")]
    Encode(String),
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error("publish to '{0}' timed out")]
    Timeout(String),
}

/// Executor bound into the scene runtime for `action` nodes (and action
/// nodes inside puzzle subgraphs).
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, node_id: &str, config: &NodeConfig) -> Result<(), DispatchError>;
}

/// Dispatches `device.command` actions through the device registry and the
/// broker, with the operator's devices config as a second allow list.
pub struct CommandDispatcher<B, C: Clock = SystemClock> {
    devices: Arc<DeviceRegistry>,
    bus: Arc<EventBus<C>>,
    broker: B,
    outputs: DevicesConfig,
    timeout: Duration,
}

impl<B: BrokerAdapter, C: Clock> CommandDispatcher<B, C> {
    pub fn new(
        devices: Arc<DeviceRegistry>,
        bus: Arc<EventBus<C>>,
        broker: B,
        outputs: DevicesConfig,
    ) -> Self {
        Self { devices, bus, broker, outputs, timeout: PUBLISH_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn dispatch(&self, config: &NodeConfig) -> Result<String, DispatchError> {
        let params = config
            .get("params")
            .and_then(|v| v.as_object())
            .ok_or(DispatchError::MissingParam("params"))?;
        let device_id = required_str(params, "device_id")?;
        let signal = required_str(params, "signal")?;
        let payload = params.get("payload").cloned();

        self.devices.validate_command(device_id, signal)?;
        if !self.outputs.allows(device_id, signal) {
            return Err(DeviceError::SignalNotAllowed {
                device_id: device_id.to_string(),
                signal: signal.to_string(),
            }
            .into());
        }

        let topic = self.devices.command_topic(device_id);
        if topic.is_empty() {
            return Err(DispatchError::NoCommandTopic(device_id.to_string()));
        }

        let body = CommandBody { signal: signal.to_string(), payload };
        let encoded = serde_json::to_vec(&body).map_err(|e| DispatchError::Encode(e.to_string()))?;

        match tokio::time::timeout(self.timeout, self.broker.publish(&topic, encoded)).await {
            Ok(Ok(())) => Ok(topic),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(DispatchError::Timeout(topic)),
        }
    }

    fn emit_device_error(&self, node_id: &str, config: &NodeConfig, error: &DispatchError) {
        let mut fields = fields! {
            "node_id" => node_id,
            "error" => error.to_string(),
        };
        let params = config.get("params").and_then(|v| v.as_object());
        if let Some(device_id) = params.and_then(|p| p.get("device_id")).and_then(|v| v.as_str()) {
            fields.insert("device_id".to_string(), device_id.into());
            let topic = self.devices.command_topic(device_id);
            if !topic.is_empty() {
                fields.insert("topic".to_string(), topic.into());
            }
        }
        if let Some(signal) = params.and_then(|p| p.get("signal")).and_then(|v| v.as_str()) {
            fields.insert("signal".to_string(), signal.into());
        }
        self.bus.emit(Level::Error, names::DEVICE_ERROR, Some(&error.to_string()), fields);
    }
}

#[async_trait]
impl<B: BrokerAdapter, C: Clock> ActionExecutor for CommandDispatcher<B, C> {
    async fn execute(&self, node_id: &str, config: &NodeConfig) -> Result<(), DispatchError> {
        let Some(action) = config.get("action").and_then(|v| v.as_str()) else {
            return Ok(());
        };
        if action != ACTION_DEVICE_COMMAND {
            return Ok(());
        }
        match self.dispatch(config).await {
            Ok(topic) => {
                tracing::debug!(node_id, topic, "device command published");
                Ok(())
            }
            Err(error) => {
                self.emit_device_error(node_id, config, &error);
                Err(error)
            }
        }
    }
}

fn required_str<'a>(
    params: &'a NodeConfig,
    key: &'static str,
) -> Result<&'a str, DispatchError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(DispatchError::MissingParam(key))
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
