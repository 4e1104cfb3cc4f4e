// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Device records and the broker-facing payload shapes around them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Authoritative record for one logical device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: String,
    pub controller_id: String,
    #[serde(default)]
    pub device_type: String,
    /// Input signal names the device may publish.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Output signal names the device accepts as commands.
    #[serde(default)]
    pub outputs: Vec<String>,
    pub publish_topic: String,
    pub command_topic: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Controller registration message body, consumed from the broker.
///
/// One controller announces all of its devices in a single payload.
/// Re-registration is idempotent; the last writer wins per logical device.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationPayload {
    pub controller_id: String,
    /// When false, the controller is announcing it is going away (LWT).
    #[serde(default = "default_online")]
    pub online: bool,
    #[serde(default)]
    pub devices: Vec<RegisteredDevice>,
}

fn default_online() -> bool {
    true
}

/// One device entry inside a registration payload.
///
/// Topics may be omitted; the registry derives the conventional
/// `devices/{controller}/{device}/...` pair in that case.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredDevice {
    pub device_id: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub publish_topic: String,
    #[serde(default)]
    pub command_topic: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Operator-authored allow list of output signals per device.
///
/// Second line of defence behind the registry's declared outputs: a device
/// absent from this config is unrestricted, a present device may only be
/// sent the signals listed here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevicesConfig {
    #[serde(default)]
    pub devices: HashMap<String, DeviceOutputs>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceOutputs {
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl DevicesConfig {
    pub fn allows(&self, device_id: &str, signal: &str) -> bool {
        match self.devices.get(device_id) {
            None => true,
            Some(device) => device.outputs.iter().any(|s| s == signal),
        }
    }
}

/// Outbound command body published to a device's command topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandBody {
    pub signal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
