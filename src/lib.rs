//! Pomonoise Timer Library
//!
//! This library provides the core functionality for the Pomonoise CLI.
//! It includes:
//! - Timer engine alternating work and rest intervals
//! - Background runner that keeps ambient playback alive
//! - IPC server/client for daemon-CLI communication
//! - CLI command parsing and display utilities
//! - The fixed ambient sound catalog and rodio playback
//! - Completion alert sink (pulse + transient notification)

pub mod alert;
pub mod cli;
pub mod daemon;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    IpcRequest, IpcResponse, ResponseData, TimerMode, TimerState, DEFAULT_REST_SECONDS,
    DEFAULT_WORK_SECONDS,
};

// Re-export daemon types
pub use daemon::{
    default_socket_path, run_ticker, BackgroundRunner, RequestHandler, RunnerCommand, TimerEngine,
    TimerError,
};

// Re-export sound types
pub use sound::{
    try_create_player, AmbientPlayer, MockAmbientPlayer, PlayerCall, RodioAmbientPlayer,
    SoundEntry, SoundError, SoundId, CATALOG,
};

// Re-export alert types
pub use alert::{AlertSink, MockAlert, TerminalAlert, PULSE_DURATION};
