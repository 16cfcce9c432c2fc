//! Core data types for the Pomonoise timer.
//!
//! This module defines the data structures used for:
//! - Timer state management (mode, countdown, configured durations)
//! - IPC request/response serialization

use serde::{Deserialize, Serialize};

use crate::sound::SoundId;

// ============================================================================
// TimerMode
// ============================================================================

/// Which interval type is currently selected or active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Focused work interval
    Work,
    /// Rest interval
    Rest,
}

impl TimerMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::Rest => "rest",
        }
    }

    /// Returns the mode the timer advances to when an interval completes.
    pub fn opposite(&self) -> Self {
        match self {
            TimerMode::Work => TimerMode::Rest,
            TimerMode::Rest => TimerMode::Work,
        }
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Work
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Default work interval length in seconds (25 minutes).
pub const DEFAULT_WORK_SECONDS: u32 = 25 * 60;

/// Default rest interval length in seconds (5 minutes).
pub const DEFAULT_REST_SECONDS: u32 = 5 * 60;

/// The single mutable entity of the timer.
///
/// Owned exclusively by the engine and observed read-only by clients as a
/// snapshot stream. While the timer is stopped, `remaining_seconds` always
/// equals the configured duration of the selected mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// True while a countdown is actively ticking
    pub is_running: bool,
    /// Currently selected/active interval type
    pub mode: TimerMode,
    /// Countdown value for the current interval, in seconds
    pub remaining_seconds: u32,
    /// Configured work interval length in seconds
    pub work_seconds: u32,
    /// Configured rest interval length in seconds
    pub rest_seconds: u32,
    /// Selected ambient track
    pub sound: SoundId,
    /// Infinite-cycle flag toggled by the user
    pub infinite_mode: bool,
}

impl TimerState {
    /// Creates a new stopped state with default durations.
    pub fn new() -> Self {
        Self {
            is_running: false,
            mode: TimerMode::Work,
            remaining_seconds: DEFAULT_WORK_SECONDS,
            work_seconds: DEFAULT_WORK_SECONDS,
            rest_seconds: DEFAULT_REST_SECONDS,
            sound: SoundId::default(),
            infinite_mode: false,
        }
    }

    /// Returns the configured duration of the given mode.
    pub fn duration_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_seconds,
            TimerMode::Rest => self.rest_seconds,
        }
    }

    /// Sets the configured duration of the given mode.
    pub fn set_duration(&mut self, mode: TimerMode, seconds: u32) {
        match mode {
            TimerMode::Work => self.work_seconds = seconds,
            TimerMode::Rest => self.rest_seconds = seconds,
        }
    }

    /// Selects a mode and resets the countdown to its configured duration.
    pub fn switch_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.remaining_seconds = self.duration_for(mode);
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the interval has completed (reached 0).
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum IpcRequest {
    /// Start the countdown in the currently selected mode
    Start {
        /// Ambient track to select before starting
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sound: Option<String>,
    },
    /// Stop the countdown and reset the current interval
    Stop,
    /// Select the work mode (stopped only)
    Work,
    /// Select the rest mode (stopped only)
    Rest,
    /// Set the duration of the currently selected mode
    Duration {
        /// New duration in minutes
        minutes: u32,
    },
    /// Set the work duration without touching the countdown
    WorkDuration {
        /// New duration in minutes
        minutes: u32,
    },
    /// Set the rest duration without touching the countdown
    RestDuration {
        /// New duration in minutes
        minutes: u32,
    },
    /// Select an ambient track
    Sound {
        /// Catalog name of the track
        name: String,
    },
    /// Toggle the infinite-cycle flag
    Infinite,
    /// Query the current state
    Status,
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    /// Whether the countdown is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    /// Current mode ("work" or "rest")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Remaining seconds of the current interval
    #[serde(rename = "remainingSeconds", skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Configured work duration in seconds
    #[serde(rename = "workSeconds", skip_serializing_if = "Option::is_none")]
    pub work_seconds: Option<u32>,
    /// Configured rest duration in seconds
    #[serde(rename = "restSeconds", skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    /// Selected ambient track name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Infinite-cycle flag
    #[serde(rename = "infiniteMode", skip_serializing_if = "Option::is_none")]
    pub infinite_mode: Option<bool>,
}

impl ResponseData {
    /// Creates response data from a timer state snapshot.
    pub fn from_timer_state(state: &TimerState) -> Self {
        Self {
            running: Some(state.is_running),
            mode: Some(state.mode.as_str().to_string()),
            remaining_seconds: Some(state.remaining_seconds),
            work_seconds: Some(state.work_seconds),
            rest_seconds: Some(state.rest_seconds),
            sound: Some(state.sound.name().to_string()),
            infinite_mode: Some(state.infinite_mode),
        }
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // TimerMode Tests
    // ------------------------------------------------------------------------

    mod timer_mode_tests {
        use super::*;

        #[test]
        fn test_default_is_work() {
            assert_eq!(TimerMode::default(), TimerMode::Work);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(TimerMode::Work.as_str(), "work");
            assert_eq!(TimerMode::Rest.as_str(), "rest");
        }

        #[test]
        fn test_opposite() {
            assert_eq!(TimerMode::Work.opposite(), TimerMode::Rest);
            assert_eq!(TimerMode::Rest.opposite(), TimerMode::Work);
        }

        #[test]
        fn test_serialize_deserialize() {
            let mode = TimerMode::Rest;
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, "\"rest\"");

            let deserialized: TimerMode = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, TimerMode::Rest);
        }
    }

    // ------------------------------------------------------------------------
    // TimerState Tests
    // ------------------------------------------------------------------------

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_new_state_defaults() {
            let state = TimerState::new();

            assert!(!state.is_running);
            assert_eq!(state.mode, TimerMode::Work);
            assert_eq!(state.remaining_seconds, 25 * 60);
            assert_eq!(state.work_seconds, 25 * 60);
            assert_eq!(state.rest_seconds, 5 * 60);
            assert_eq!(state.sound, SoundId::Rain);
            assert!(!state.infinite_mode);
        }

        #[test]
        fn test_duration_for() {
            let state = TimerState::new();
            assert_eq!(state.duration_for(TimerMode::Work), 25 * 60);
            assert_eq!(state.duration_for(TimerMode::Rest), 5 * 60);
        }

        #[test]
        fn test_set_duration() {
            let mut state = TimerState::new();

            state.set_duration(TimerMode::Work, 30 * 60);
            assert_eq!(state.work_seconds, 30 * 60);
            assert_eq!(state.rest_seconds, 5 * 60);

            state.set_duration(TimerMode::Rest, 10 * 60);
            assert_eq!(state.rest_seconds, 10 * 60);
        }

        #[test]
        fn test_switch_mode_resets_remaining() {
            let mut state = TimerState::new();
            state.remaining_seconds = 42;

            state.switch_mode(TimerMode::Rest);

            assert_eq!(state.mode, TimerMode::Rest);
            assert_eq!(state.remaining_seconds, 5 * 60);
        }

        #[test]
        fn test_tick() {
            let mut state = TimerState::new();
            state.remaining_seconds = 2;

            let completed = state.tick();
            assert!(!completed);
            assert_eq!(state.remaining_seconds, 1);

            let completed = state.tick();
            assert!(completed);
            assert_eq!(state.remaining_seconds, 0);
        }

        #[test]
        fn test_tick_at_zero_stays_at_zero() {
            let mut state = TimerState::new();
            state.remaining_seconds = 0;

            let completed = state.tick();
            assert!(completed);
            assert_eq!(state.remaining_seconds, 0);
        }

        #[test]
        fn test_serialize_deserialize() {
            let mut state = TimerState::new();
            state.is_running = true;
            state.mode = TimerMode::Rest;
            state.remaining_seconds = 123;
            state.sound = SoundId::Forest;

            let json = serde_json::to_string(&state).unwrap();
            let deserialized: TimerState = serde_json::from_str(&json).unwrap();

            assert_eq!(deserialized, state);
        }
    }

    // ------------------------------------------------------------------------
    // IPC Types Tests
    // ------------------------------------------------------------------------

    mod ipc_tests {
        use super::*;

        #[test]
        fn test_ipc_request_start_serialize() {
            let request = IpcRequest::Start {
                sound: Some("ocean".to_string()),
            };
            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains("\"command\":\"start\""));
            assert!(json.contains("\"sound\":\"ocean\""));
        }

        #[test]
        fn test_ipc_request_start_without_sound() {
            let json = r#"{"command":"start"}"#;
            let request: IpcRequest = serde_json::from_str(json).unwrap();
            assert!(matches!(request, IpcRequest::Start { sound: None }));
        }

        #[test]
        fn test_ipc_request_duration_deserialize() {
            let json = r#"{"command":"duration","minutes":30}"#;
            let request: IpcRequest = serde_json::from_str(json).unwrap();
            assert!(matches!(request, IpcRequest::Duration { minutes: 30 }));
        }

        #[test]
        fn test_ipc_request_mode_duration_commands() {
            let json = r#"{"command":"work-duration","minutes":45}"#;
            let request: IpcRequest = serde_json::from_str(json).unwrap();
            assert!(matches!(request, IpcRequest::WorkDuration { minutes: 45 }));

            let json = r#"{"command":"rest-duration","minutes":10}"#;
            let request: IpcRequest = serde_json::from_str(json).unwrap();
            assert!(matches!(request, IpcRequest::RestDuration { minutes: 10 }));
        }

        #[test]
        fn test_ipc_request_sound_deserialize() {
            let json = r#"{"command":"sound","name":"forest"}"#;
            let request: IpcRequest = serde_json::from_str(json).unwrap();
            match request {
                IpcRequest::Sound { name } => assert_eq!(name, "forest"),
                _ => panic!("Expected Sound request"),
            }
        }

        #[test]
        fn test_ipc_request_simple_commands() {
            let commands = vec![
                (r#"{"command":"stop"}"#, "stop"),
                (r#"{"command":"work"}"#, "work"),
                (r#"{"command":"rest"}"#, "rest"),
                (r#"{"command":"infinite"}"#, "infinite"),
                (r#"{"command":"status"}"#, "status"),
            ];

            for (json, expected) in commands {
                let request: IpcRequest = serde_json::from_str(json).unwrap();
                match (&request, expected) {
                    (IpcRequest::Stop, "stop") => {}
                    (IpcRequest::Work, "work") => {}
                    (IpcRequest::Rest, "rest") => {}
                    (IpcRequest::Infinite, "infinite") => {}
                    (IpcRequest::Status, "status") => {}
                    _ => panic!("Unexpected request type for {}", json),
                }
            }
        }

        #[test]
        fn test_ipc_request_non_numeric_minutes_rejected() {
            let json = r#"{"command":"duration","minutes":"abc"}"#;
            let result: Result<IpcRequest, _> = serde_json::from_str(json);
            assert!(result.is_err());
        }

        #[test]
        fn test_response_data_from_timer_state() {
            let mut state = TimerState::new();
            state.is_running = true;
            state.remaining_seconds = 1200;
            state.sound = SoundId::Ocean;

            let data = ResponseData::from_timer_state(&state);

            assert_eq!(data.running, Some(true));
            assert_eq!(data.mode, Some("work".to_string()));
            assert_eq!(data.remaining_seconds, Some(1200));
            assert_eq!(data.work_seconds, Some(25 * 60));
            assert_eq!(data.rest_seconds, Some(5 * 60));
            assert_eq!(data.sound, Some("ocean".to_string()));
            assert_eq!(data.infinite_mode, Some(false));
        }

        #[test]
        fn test_ipc_response_success() {
            let response = IpcResponse::success(
                "Timer started",
                Some(ResponseData::from_timer_state(&TimerState::new())),
            );

            assert_eq!(response.status, "success");
            assert_eq!(response.message, "Timer started");
            assert!(response.data.is_some());
        }

        #[test]
        fn test_ipc_response_error() {
            let response = IpcResponse::error("invalid duration");

            assert_eq!(response.status, "error");
            assert_eq!(response.message, "invalid duration");
            assert!(response.data.is_none());
        }

        #[test]
        fn test_ipc_response_serialize_skips_none() {
            let response = IpcResponse::success("OK", None);
            let json = serde_json::to_string(&response).unwrap();
            assert!(!json.contains("data"));
        }

        #[test]
        fn test_ipc_response_camel_case_fields() {
            let response = IpcResponse::success(
                "OK",
                Some(ResponseData::from_timer_state(&TimerState::new())),
            );
            let json = serde_json::to_string(&response).unwrap();
            assert!(json.contains("\"remainingSeconds\":1500"));
            assert!(json.contains("\"workSeconds\":1500"));
            assert!(json.contains("\"restSeconds\":300"));
            assert!(json.contains("\"infiniteMode\":false"));
        }
    }
}
