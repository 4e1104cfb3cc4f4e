// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-derived daemon configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("ROOMD_SCENES is not set (path to the scene-graph JSON)")]
    MissingScenes,
}

/// One room's process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct RoomEnv {
    /// Logical room identity; stamped on every durable log row.
    pub room_id: String,
    /// State directory: lock file, event log, daemon log.
    pub state_dir: PathBuf,
    /// Scene-graph JSON path.
    pub scenes_path: PathBuf,
    /// Optional operator devices config (output allow list).
    pub devices_path: Option<PathBuf>,
    /// Broker URL.
    pub broker_url: String,
    /// Optional broker auth token.
    pub broker_token: Option<String>,
}

impl RoomEnv {
    /// Read configuration from the environment.
    ///
    /// `ROOMD_SCENES` is required; everything else has a default:
    /// `ROOM_ID` ("room"), `ROOMD_STATE_DIR` (the platform state dir, or
    /// `./state`), `ROOMD_BROKER_URL` (local NATS), `ROOMD_DEVICES` and
    /// `ROOMD_BROKER_TOKEN` (unset).
    pub fn from_env() -> Result<Self, EnvError> {
        let room_id = var("ROOM_ID").unwrap_or_else(|| "room".to_string());
        let scenes_path = var("ROOMD_SCENES").map(PathBuf::from).ok_or(EnvError::MissingScenes)?;
        let state_dir = var("ROOMD_STATE_DIR").map(PathBuf::from).unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("roomd")
                .join(&room_id)
        });
        Ok(Self {
            room_id,
            state_dir,
            scenes_path,
            devices_path: var("ROOMD_DEVICES").map(PathBuf::from),
            broker_url: var("ROOMD_BROKER_URL")
                .unwrap_or_else(|| "nats://127.0.0.1:4222".to_string()),
            broker_token: var("ROOMD_BROKER_TOKEN"),
        })
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
