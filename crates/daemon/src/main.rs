// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! roomd: the room daemon binary.
//!
//! Startup order matters: configuration, logging, the state-dir lock (one
//! process owns one room), scene graph (the only fatal load), durable log,
//! bus, broker, dispatcher, then restore and the room loop.

use room_adapters::nats::{NatsBroker, NatsConfig};
use room_core::registry::names;
use room_core::{fields, DevicesConfig, SystemClock};
use room_daemon::env::RoomEnv;
use room_daemon::room::{self, Room, ROOM_QUEUE_DEPTH};
use room_engine::restore::{restore_from_log, DEFAULT_RESTORE_TAIL};
use room_engine::{CommandDispatcher, DeviceRegistry, EventBus, SceneRuntime};
use room_storage::EventLog;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("roomd: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let env = RoomEnv::from_env()?;
    std::fs::create_dir_all(&env.state_dir)?;

    let file_appender = tracing_appender::rolling::never(&env.state_dir, "roomd.log");
    let (file_writer, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ROOMD_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(file_writer)
        .with_ansi(false)
        .init();

    // One roomd per room: hold an advisory lock on the state dir.
    let lock_path = env.state_dir.join("roomd.lock");
    let lock_file = std::fs::File::create(&lock_path)?;
    if fs2::FileExt::try_lock_exclusive(&lock_file).is_err() {
        return Err(format!("another roomd already owns {}", env.state_dir.display()).into());
    }

    let graph = Arc::new(room_scene::load_scene_graph(&env.scenes_path)?);
    tracing::info!(
        hash = %room_scene::graph_hash(&graph),
        scenes = graph.scenes.len(),
        path = %env.scenes_path.display(),
        "scene graph loaded"
    );

    let outputs: DevicesConfig = match &env.devices_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => DevicesConfig::default(),
    };

    let log = Arc::new(EventLog::open(&env.state_dir.join("events.log"), &env.room_id)?);
    let tail = log.query(DEFAULT_RESTORE_TAIL)?;
    let bus = Arc::new(EventBus::with_projection(SystemClock, log.clone()));
    let devices = Arc::new(DeviceRegistry::new());

    let broker = NatsBroker::connect(&NatsConfig {
        url: env.broker_url.clone(),
        token: env.broker_token.clone(),
    })
    .await?;
    let dispatcher = Arc::new(CommandDispatcher::new(
        Arc::clone(&devices),
        Arc::clone(&bus),
        broker.clone(),
        outputs,
    ));

    let mut runtime = SceneRuntime::new(Arc::clone(&graph), Arc::clone(&bus));
    runtime.set_action_executor(dispatcher);

    let boot_id = nanoid::nanoid!(8);
    bus.info(
        names::SYSTEM_STARTUP,
        fields! {"room_id" => env.room_id.as_str(), "boot_id" => boot_id.as_str()},
    );
    match restore_from_log(&mut runtime, &bus, &tail, &env.room_id) {
        Ok(true) => tracing::info!(rows = tail.len(), "session restored from event log"),
        Ok(false) => tracing::info!("no session to restore"),
        Err(e) => tracing::warn!(error = %e, "restore failed; starting cold"),
    }

    let (handle, room_rx) = room::channel();
    let shutdown = CancellationToken::new();

    // Device traffic uses MQTT-style slash topics, which NATS treats as
    // single tokens; a dedicated room broker makes the firehose subscription
    // the simple, correct choice.
    let (broker_tx, broker_rx) = mpsc::channel(ROOM_QUEUE_DEPTH);
    broker.subscribe_into(vec![">".to_string()], broker_tx, shutdown.clone());
    room::forward_broker(broker_rx, handle.sender());

    {
        let handle = handle.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("ctrl-c received; shutting down");
                shutdown.cancel();
                handle.shutdown().await;
            }
        });
    }

    let room = Room::new(runtime, Arc::clone(&bus), devices, log, &env.room_id);
    tracing::info!(room_id = %env.room_id, broker = %env.broker_url, "roomd running");
    room.run(room_rx).await;
    shutdown.cancel();
    drop(lock_file);
    Ok(())
}
