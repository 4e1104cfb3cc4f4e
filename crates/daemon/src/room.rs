// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The room loop: single owner of the scene runtime.
//!
//! Every external input — operator request, broker message, shutdown — is
//! funnelled through one queue and handled on one task, so scene-state
//! mutation needs no lock and event ordering follows input ordering.
//! Operator commands additionally emit their `operator.*` event before the
//! core call, matching what the restore reduction expects to find in the
//! log.

use crate::protocol::{Request, Response};
use room_adapters::BrokerMessage;
use room_core::registry::names;
use room_core::{fields, Clock, Fields, RegistrationPayload};
use room_engine::{EventBus, DeviceRegistry, SceneRuntime};
use room_storage::EventLog;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Topic on which controllers announce themselves and their devices.
pub const REGISTRATION_TOPIC: &str = "devices/registration";

/// Queue depth for the room loop.
pub const ROOM_QUEUE_DEPTH: usize = 256;

/// One unit of input for the room loop.
pub enum RoomInput {
    Operator { request: Request, reply: oneshot::Sender<Response> },
    Broker(BrokerMessage),
    Shutdown,
}

/// Cheap handle for feeding the room loop.
#[derive(Clone)]
pub struct RoomHandle {
    tx: mpsc::Sender<RoomInput>,
}

impl RoomHandle {
    /// Send an operator request and await the loop's answer.
    pub async fn request(&self, request: Request) -> Response {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(RoomInput::Operator { request, reply }).await.is_err() {
            return Response::error("room loop is gone");
        }
        rx.await.unwrap_or_else(|_| Response::error("room loop dropped the request"))
    }

    /// Ask the loop to shut down; returns once the input is queued.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(RoomInput::Shutdown).await;
    }

    /// Sender for bridging tasks (broker forwarding, signal handlers).
    pub fn sender(&self) -> mpsc::Sender<RoomInput> {
        self.tx.clone()
    }
}

/// Build the loop's queue and its handle.
pub fn channel() -> (RoomHandle, mpsc::Receiver<RoomInput>) {
    let (tx, rx) = mpsc::channel(ROOM_QUEUE_DEPTH);
    (RoomHandle { tx }, rx)
}

/// Forward inbound broker traffic into the room queue.
pub fn forward_broker(
    mut broker_rx: mpsc::Receiver<BrokerMessage>,
    tx: mpsc::Sender<RoomInput>,
) {
    tokio::spawn(async move {
        while let Some(message) = broker_rx.recv().await {
            if tx.send(RoomInput::Broker(message)).await.is_err() {
                break;
            }
        }
    });
}

/// One room's wiring: runtime, bus, device registry, durable log.
pub struct Room<C: Clock> {
    runtime: SceneRuntime<C>,
    bus: Arc<EventBus<C>>,
    devices: Arc<DeviceRegistry>,
    log: Arc<EventLog>,
    room_id: String,
}

impl<C: Clock> Room<C> {
    pub fn new(
        runtime: SceneRuntime<C>,
        bus: Arc<EventBus<C>>,
        devices: Arc<DeviceRegistry>,
        log: Arc<EventLog>,
        room_id: impl Into<String>,
    ) -> Self {
        Self { runtime, bus, devices, log, room_id: room_id.into() }
    }

    /// Consume inputs until shutdown. Emits `system.shutdown` on the way out.
    pub async fn run(mut self, mut rx: mpsc::Receiver<RoomInput>) {
        while let Some(input) = rx.recv().await {
            match input {
                RoomInput::Operator { request, reply } => {
                    let response = self.handle_request(request).await;
                    let _ = reply.send(response);
                }
                RoomInput::Broker(message) => self.handle_broker(message).await,
                RoomInput::Shutdown => break,
            }
        }
        self.bus.info(names::SYSTEM_SHUTDOWN, fields! {"room_id" => self.room_id.as_str()});
        if let Err(e) = self.log.flush() {
            tracing::warn!(error = %e, "event log flush on shutdown failed");
        }
        tracing::info!(room_id = self.room_id, "room loop stopped");
    }

    /// Translate one operator/game request into core calls.
    pub async fn handle_request(&mut self, request: Request) -> Response {
        match request {
            Request::StartGame { scene_id } => {
                match self.runtime.start_game(scene_id.as_deref()).await {
                    Ok(()) => Response::Ok,
                    Err(e) => Response::error(e.to_string()),
                }
            }
            Request::StopGame => match self.runtime.stop_game() {
                Ok(()) => Response::Ok,
                Err(e) => Response::error(e.to_string()),
            },
            Request::Status => Response::Status {
                active: self.runtime.is_game_active(),
                scene_id: self.runtime.active_scene_id().map(String::from),
                nodes: self.runtime.node_statuses(),
                puzzles: self.runtime.puzzle_statuses(),
            },
            Request::OverrideNode { node_id } => {
                if !self.runtime.has_node(&node_id) {
                    return Response::error(format!("unknown node: {node_id}"));
                }
                self.bus.info(names::OPERATOR_OVERRIDE, fields! {"node_id" => node_id.as_str()});
                match self.runtime.override_node(&node_id).await {
                    Ok(()) => Response::Ok,
                    Err(e) => Response::error(e.to_string()),
                }
            }
            Request::ResetNode { node_id } => {
                if !self.runtime.has_node(&node_id) {
                    return Response::error(format!("unknown node: {node_id}"));
                }
                self.bus.info(names::OPERATOR_RESET, fields! {"node_id" => node_id.as_str()});
                match self.runtime.reset_node(&node_id).await {
                    Ok(()) => Response::Ok,
                    Err(e) => Response::error(e.to_string()),
                }
            }
            Request::ResetToNode { node_id } => {
                if !self.runtime.is_game_active() {
                    return Response::error("no active game");
                }
                if !self.runtime.has_node(&node_id) {
                    return Response::error(format!("unknown node: {node_id}"));
                }
                self.bus.info(names::OPERATOR_JUMP, fields! {"node_id" => node_id.as_str()});
                match self.runtime.reset_to_node(&node_id).await {
                    Ok(()) => Response::Ok,
                    Err(e) => Response::error(e.to_string()),
                }
            }
            Request::RecentEvents { count } => Response::Events { events: self.bus.recent(count) },
            Request::QueryLog { limit } => match self.log.query(limit) {
                Ok(rows) => Response::Rows { rows },
                Err(e) => Response::error(e.to_string()),
            },
        }
    }

    /// Normalise one broker message into registry updates or device input.
    pub async fn handle_broker(&mut self, message: BrokerMessage) {
        if message.topic == REGISTRATION_TOPIC {
            self.handle_registration(&message.payload);
            return;
        }
        let Some(record) = self.devices.device_for_topic(&message.topic) else {
            tracing::debug!(topic = message.topic, "broker message on unrouted topic");
            return;
        };

        let payload: serde_json::Value =
            serde_json::from_slice(&message.payload).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&message.payload).into_owned())
            });
        let fields: Fields = fields! {
            "device_id" => record.device_id.as_str(),
            "logical_id" => record.device_id.as_str(),
            "topic" => message.topic.as_str(),
            "payload" => payload,
        };
        self.bus.info(names::DEVICE_INPUT, fields.clone());
        if self.runtime.is_game_active() {
            if let Err(e) = self.runtime.inject_event(names::DEVICE_INPUT, fields).await {
                tracing::warn!(error = %e, "device input injection failed");
            }
        }
    }

    fn handle_registration(&mut self, payload: &[u8]) {
        let registration: RegistrationPayload = match serde_json::from_slice(payload) {
            Ok(registration) => registration,
            Err(e) => {
                tracing::warn!(error = %e, "malformed registration payload");
                room_engine::bus::emit_system_error(&self.bus, "registration", &e.to_string());
                return;
            }
        };

        if registration.online {
            for device_id in self.devices.register_from_payload(&registration) {
                let topic = self.devices.command_topic(&device_id);
                self.bus.info(
                    names::DEVICE_CONNECTED,
                    fields! {
                        "device_id" => device_id.as_str(),
                        "controller_id" => registration.controller_id.as_str(),
                        "topic" => topic,
                    },
                );
            }
        } else {
            for device_id in self.devices.remove_controller(&registration.controller_id) {
                self.bus.info(
                    names::DEVICE_DISCONNECTED,
                    fields! {
                        "device_id" => device_id.as_str(),
                        "controller_id" => registration.controller_id.as_str(),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "room_tests.rs"]
mod tests;
