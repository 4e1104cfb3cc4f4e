// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime events: dynamically named facts of state change.
//!
//! An event carries an RFC3339 timestamp with nanosecond precision, a
//! severity level, a dot-scoped name drawn from the closed registry, an
//! optional human message, and an opaque field bag. Events are immutable
//! once emitted; the field bag is untyped by design — consumers that need
//! specific fields index them by name (the condition evaluator, the restore
//! reduction).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Opaque key/value carrier for event payloads.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
    Debug,
}

crate::simple_display! {
    Level {
        Info => "info",
        Warn => "warn",
        Error => "error",
        Debug => "debug",
    }
}

/// A single emitted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(with = "ts_rfc3339")]
    pub ts: DateTime<Utc>,
    pub level: Level,
    pub name: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub fields: Fields,
}

impl Event {
    pub fn new(
        ts: DateTime<Utc>,
        level: Level,
        name: impl Into<SmolStr>,
        message: Option<String>,
        fields: Fields,
    ) -> Self {
        Self { ts, level, name: name.into(), message, fields }
    }

    /// Top-level field as a string slice.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    /// Field lookup by dot path (`payload.door_closed` indexes nested maps).
    ///
    /// A path without dots is a plain top-level lookup.
    pub fn field_path(&self, path: &str) -> Option<&serde_json::Value> {
        let mut parts = path.split('.');
        let mut value = self.fields.get(parts.next()?)?;
        for part in parts {
            value = value.as_object()?.get(part)?;
        }
        Some(value)
    }

    /// One-line summary for effect/bus logging.
    pub fn log_summary(&self) -> String {
        let scope: String = ["scene_id", "node_id", "device_id"]
            .iter()
            .filter_map(|k| self.str_field(k).map(|v| format!(" {k}={v}")))
            .collect();
        format!("{}{}", self.name, scope)
    }
}

/// RFC3339 serialization pinned to nanosecond precision.
mod ts_rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        ts.to_rfc3339_opts(SecondsFormat::Nanos, true).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
