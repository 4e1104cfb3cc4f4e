// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! NATS-backed broker adapter.
//!
//! Outbound: [`BrokerAdapter::publish`] straight onto the client. Inbound:
//! [`NatsBroker::subscribe_into`] pumps matching subjects into the room
//! loop's queue until shutdown.

use crate::{BrokerAdapter, BrokerError, BrokerMessage};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Connection settings for the room's broker.
#[derive(Debug, Clone)]
pub struct NatsConfig {
    pub url: String,
    pub token: Option<String>,
}

/// Thin wrapper over an `async_nats::Client`.
#[derive(Clone)]
pub struct NatsBroker {
    client: async_nats::Client,
}

impl NatsBroker {
    /// Connect to the NATS server and return a broker handle.
    pub async fn connect(config: &NatsConfig) -> Result<Self, BrokerError> {
        let mut opts = async_nats::ConnectOptions::new();
        if let Some(ref token) = config.token {
            opts = opts.token(token.clone());
        }
        opts = opts.retry_on_initial_connect();

        info!(url = %config.url, "connecting to broker");
        let client =
            opts.connect(&config.url).await.map_err(|e| BrokerError::Connect(e.to_string()))?;
        info!("broker connected");

        Ok(Self { client })
    }

    /// Subscribe to `subjects` and forward every message into `tx` until
    /// `shutdown` fires. Spawns one task per subject; a full queue drops the
    /// message with a warning rather than stalling the broker client.
    pub fn subscribe_into(
        &self,
        subjects: Vec<String>,
        tx: mpsc::Sender<BrokerMessage>,
        shutdown: CancellationToken,
    ) {
        for subject in subjects {
            let client = self.client.clone();
            let tx = tx.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                let mut sub = match client.subscribe(subject.clone()).await {
                    Ok(sub) => sub,
                    Err(e) => {
                        warn!(subject, error = %e, "broker subscribe failed");
                        return;
                    }
                };
                debug!(subject, "broker subscription active");
                loop {
                    tokio::select! {
                        msg = sub.next() => {
                            let Some(msg) = msg else { break };
                            let message = BrokerMessage {
                                topic: msg.subject.to_string(),
                                payload: msg.payload.to_vec(),
                            };
                            if tx.try_send(message).is_err() {
                                warn!(subject, "room queue full; dropping broker message");
                            }
                        }
                        _ = shutdown.cancelled() => break,
                    }
                }
                debug!(subject, "broker subscription closed");
            });
        }
    }
}

#[async_trait]
impl BrokerAdapter for NatsBroker {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BrokerError> {
        self.client
            .publish(topic.to_string(), payload.into())
            .await
            .map_err(|e| BrokerError::PublishFailed {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }
}
