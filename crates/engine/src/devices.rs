// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Device registry: logical device id → controller, topics, allowed signals.
//!
//! Populated from controller registration payloads. Read-mostly; writers
//! (registration) exclude readers via the RwLock.

use parking_lot::RwLock;
use room_core::{DeviceRecord, RegistrationPayload};
use std::collections::HashMap;
use thiserror::Error;

/// Command validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("unknown device: {0}")]
    UnknownDevice(String),
    #[error("signal '{signal}' not allowed for device '{device_id}'")]
    SignalNotAllowed { device_id: String, signal: String },
}

/// Authoritative lookup for one room's devices.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<String, DeviceRecord>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one registration payload. Idempotent; the last writer wins per
    /// logical device. Returns the ids of the registered devices.
    pub fn register_from_payload(&self, payload: &RegistrationPayload) -> Vec<String> {
        let mut devices = self.devices.write();
        let mut registered = Vec::with_capacity(payload.devices.len());
        for device in &payload.devices {
            let record = DeviceRecord {
                device_id: device.device_id.clone(),
                controller_id: payload.controller_id.clone(),
                device_type: device.device_type.clone(),
                inputs: device.inputs.clone(),
                outputs: device.outputs.clone(),
                publish_topic: topic_or_default(
                    &device.publish_topic,
                    &payload.controller_id,
                    &device.device_id,
                    "events",
                ),
                command_topic: topic_or_default(
                    &device.command_topic,
                    &payload.controller_id,
                    &device.device_id,
                    "commands",
                ),
                capabilities: device.capabilities.clone(),
            };
            registered.push(device.device_id.clone());
            devices.insert(device.device_id.clone(), record);
        }
        registered
    }

    /// Drop every device owned by `controller_id`, returning the removed ids.
    pub fn remove_controller(&self, controller_id: &str) -> Vec<String> {
        let mut devices = self.devices.write();
        let removed: Vec<String> = devices
            .values()
            .filter(|d| d.controller_id == controller_id)
            .map(|d| d.device_id.clone())
            .collect();
        for id in &removed {
            devices.remove(id);
        }
        removed
    }

    pub fn get(&self, device_id: &str) -> Option<DeviceRecord> {
        self.devices.read().get(device_id).cloned()
    }

    /// Command topic for the device; empty when unknown.
    pub fn command_topic(&self, device_id: &str) -> String {
        self.devices
            .read()
            .get(device_id)
            .map(|d| d.command_topic.clone())
            .unwrap_or_default()
    }

    /// Whether `signal` may be sent to `device_id`.
    pub fn validate_command(&self, device_id: &str, signal: &str) -> Result<(), DeviceError> {
        let devices = self.devices.read();
        let record = devices
            .get(device_id)
            .ok_or_else(|| DeviceError::UnknownDevice(device_id.to_string()))?;
        if record.outputs.iter().any(|s| s == signal) {
            Ok(())
        } else {
            Err(DeviceError::SignalNotAllowed {
                device_id: device_id.to_string(),
                signal: signal.to_string(),
            })
        }
    }

    /// Reverse lookup for inbound routing: the device publishing on `topic`.
    pub fn device_for_topic(&self, topic: &str) -> Option<DeviceRecord> {
        self.devices.read().values().find(|d| d.publish_topic == topic).cloned()
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}

fn topic_or_default(declared: &str, controller_id: &str, device_id: &str, suffix: &str) -> String {
    if declared.is_empty() {
        format!("devices/{controller_id}/{device_id}/{suffix}")
    } else {
        declared.to_string()
    }
}

#[cfg(test)]
#[path = "devices_tests.rs"]
mod tests;
