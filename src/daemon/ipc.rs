//! IPC server for the Pomonoise daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for timer commands
//! - Dispatch into the shared TimerEngine

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};
use tracing::warn;

use crate::sound::SoundId;
use crate::types::{IpcRequest, IpcResponse, ResponseData};

use super::engine::TimerEngine;

// ============================================================================
// Constants
// ============================================================================

/// Socket path relative to the home directory
const SOCKET_RELATIVE_PATH: &str = ".pomonoise/pomonoise.sock";

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

/// Returns the default socket path under the user's home directory.
pub fn default_socket_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("ホームディレクトリを特定できません")?;
    Ok(home.join(SOCKET_RELATIVE_PATH))
}

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Socket binding error
    #[error("Failed to bind socket: {0}")]
    BindError(String),

    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Write error
    #[error("Failed to write response: {0}")]
    WriteError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        // Remove existing socket file if present
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Applies a read timeout to prevent blocking indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            anyhow::bail!("Connection closed by client");
        }

        let request: IpcRequest = serde_json::from_slice(&buffer[..n])
            .with_context(|| "Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        // Clean up socket file on drop
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by dispatching to the shared TimerEngine.
pub struct RequestHandler {
    /// Shared reference to the timer engine
    engine: Arc<Mutex<TimerEngine>>,
}

impl RequestHandler {
    /// Creates a new request handler with the given timer engine.
    pub fn new(engine: Arc<Mutex<TimerEngine>>) -> Self {
        Self { engine }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Start { sound } => self.handle_start(sound).await,
            IpcRequest::Stop => self.handle_stop().await,
            IpcRequest::Work => self.handle_switch_work().await,
            IpcRequest::Rest => self.handle_switch_rest().await,
            IpcRequest::Duration { minutes } => self.handle_duration(minutes).await,
            IpcRequest::WorkDuration { minutes } => self.handle_work_duration(minutes).await,
            IpcRequest::RestDuration { minutes } => self.handle_rest_duration(minutes).await,
            IpcRequest::Sound { name } => self.handle_sound(&name).await,
            IpcRequest::Infinite => self.handle_infinite().await,
            IpcRequest::Status => self.handle_status().await,
        }
    }

    /// Handles the start command.
    async fn handle_start(&self, sound: Option<String>) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        if let Some(name) = sound {
            engine.update_current_sound(resolve_sound(&name));
        }
        engine.start_timer();

        IpcResponse::success(
            "タイマーを開始しました",
            Some(ResponseData::from_timer_state(engine.state())),
        )
    }

    /// Handles the stop command.
    async fn handle_stop(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;
        engine.stop_timer();

        IpcResponse::success(
            "タイマーを停止しました",
            Some(ResponseData::from_timer_state(engine.state())),
        )
    }

    /// Handles the work mode switch.
    async fn handle_switch_work(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;
        engine.switch_to_work();

        IpcResponse::success(
            "作業モードを選択しました",
            Some(ResponseData::from_timer_state(engine.state())),
        )
    }

    /// Handles the rest mode switch.
    async fn handle_switch_rest(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;
        engine.switch_to_rest();

        IpcResponse::success(
            "休憩モードを選択しました",
            Some(ResponseData::from_timer_state(engine.state())),
        )
    }

    /// Handles a duration edit for the currently selected mode.
    async fn handle_duration(&self, minutes: u32) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.update_current_duration(minutes) {
            Ok(()) => IpcResponse::success(
                "時間を更新しました",
                Some(ResponseData::from_timer_state(engine.state())),
            ),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles a work duration edit.
    async fn handle_work_duration(&self, minutes: u32) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.update_work_duration(minutes) {
            Ok(()) => IpcResponse::success(
                "作業時間を更新しました",
                Some(ResponseData::from_timer_state(engine.state())),
            ),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles a rest duration edit.
    async fn handle_rest_duration(&self, minutes: u32) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.update_rest_duration(minutes) {
            Ok(()) => IpcResponse::success(
                "休憩時間を更新しました",
                Some(ResponseData::from_timer_state(engine.state())),
            ),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles a sound selection.
    async fn handle_sound(&self, name: &str) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        let sound = resolve_sound(name);
        engine.update_current_sound(sound);

        IpcResponse::success(
            format!("音声を '{}' にしました", sound.label()),
            Some(ResponseData::from_timer_state(engine.state())),
        )
    }

    /// Handles the infinite mode toggle.
    async fn handle_infinite(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;
        engine.toggle_infinite_mode();

        let message = if engine.state().infinite_mode {
            "無限ループ: オン"
        } else {
            "無限ループ: オフ"
        };
        IpcResponse::success(message, Some(ResponseData::from_timer_state(engine.state())))
    }

    /// Handles the status command.
    async fn handle_status(&self) -> IpcResponse {
        let engine = self.engine.lock().await;

        IpcResponse::success("", Some(ResponseData::from_timer_state(engine.state())))
    }
}

/// Resolves a catalog name, falling back to the default entry.
///
/// Unknown names arriving over the wire are recovered locally: playback
/// continues with the catalog default rather than failing the session.
fn resolve_sound(name: &str) -> SoundId {
    SoundId::from_name(name).unwrap_or_else(|| {
        let fallback = SoundId::default();
        warn!(
            "不明な音声 '{}' のためデフォルト '{}' にフォールバックします",
            name,
            fallback.name()
        );
        fallback
    })
}

// ============================================================================
// Tests
// ============================================================================
