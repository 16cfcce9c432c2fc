//! Daemon module for the Pomonoise timer.
//!
//! This module contains the long-running process that keeps the countdown
//! advancing and the ambient sound playing while no interactive surface is
//! attached:
//! - `engine`: timer state machine and countdown ticker
//! - `runner`: background worker owning playback and the completion alert
//! - `ipc`: Unix socket server dispatching client commands

pub mod engine;
pub mod ipc;
pub mod runner;

pub use engine::{run_ticker, TimerEngine, TimerError};
pub use ipc::{default_socket_path, IpcServer, RequestHandler};
pub use runner::{BackgroundRunner, RunnerCommand};

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::UnixStream;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};

use crate::alert::{AlertSink, TerminalAlert};
use crate::sound::{try_create_player, AmbientPlayer, MockAmbientPlayer};
use crate::types::{IpcResponse, TimerState};

/// Runs the daemon until SIGINT.
///
/// Wires the engine, the ticker, the background runner and the IPC server
/// together. When no audio device is available the daemon still runs, with
/// playback silently disabled.
pub async fn run(socket_path: &Path) -> Result<()> {
    let (runner_tx, runner_rx) = mpsc::unbounded_channel();
    let engine = Arc::new(Mutex::new(TimerEngine::new(runner_tx)));

    let player: Arc<dyn AmbientPlayer> = match try_create_player() {
        Some(player) => player,
        None => Arc::new(MockAmbientPlayer::new()),
    };
    let alert: Arc<dyn AlertSink> = Arc::new(TerminalAlert::new());
    let runner = BackgroundRunner::new(runner_rx, player, alert);

    let server = IpcServer::new(socket_path)?;
    info!("IPCソケットで待機します: {:?}", server.socket_path());

    let ticker = tokio::spawn(run_ticker(engine.clone()));
    let runner_task = tokio::spawn(runner.run());
    let tracer = tokio::spawn(trace_state(engine.lock().await.subscribe()));

    let handler = RequestHandler::new(engine);

    loop {
        tokio::select! {
            accepted = server.accept() => {
                match accepted {
                    Ok(mut stream) => serve_connection(&handler, &mut stream).await,
                    Err(e) => warn!("接続の受け付けに失敗しました: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("シグナルを受信したため終了します");
                break;
            }
        }
    }

    // Dropping the last engine reference closes the runner channel; the
    // runner releases playback on its way out.
    ticker.abort();
    tracer.abort();
    drop(handler);
    let _ = runner_task.await;

    Ok(())
}

/// Serves a single client connection: one request, one response.
async fn serve_connection(handler: &RequestHandler, stream: &mut UnixStream) {
    let response = match IpcServer::receive_request(stream).await {
        Ok(request) => handler.handle(request).await,
        Err(e) => IpcResponse::error(format!("不正なリクエストです: {}", e)),
    };

    if let Err(e) = IpcServer::send_response(stream, &response).await {
        warn!("レスポンスの送信に失敗しました: {}", e);
    }
}

/// Logs state transitions observed on the snapshot stream.
async fn trace_state(mut rx: watch::Receiver<TimerState>) {
    let mut last = rx.borrow().clone();

    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();

        if state.is_running != last.is_running || state.mode != last.mode {
            debug!(
                running = state.is_running,
                mode = state.mode.as_str(),
                remaining = state.remaining_seconds,
                "状態が変化しました"
            );
        }

        last = state;
    }
}

// ============================================================================
// Tests
// ============================================================================
