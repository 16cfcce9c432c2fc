//! Timer engine for the Pomonoise daemon.
//!
//! This module provides the core timer functionality:
//! - The two-state machine (stopped/running) parameterized by mode
//! - Countdown driven by a single long-lived ticker task
//! - Automatic work/rest alternation on interval completion
//! - A watch-channel snapshot stream for observers
//! - Fire-and-forget commands to the background runner

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::sound::SoundId;
use crate::types::{TimerMode, TimerState};

use super::runner::RunnerCommand;

// ============================================================================
// TimerError
// ============================================================================

/// Errors surfaced by engine operations.
///
/// Illegal mode switches and redundant starts are silent no-ops by design,
/// not errors; only a rejected duration edit is reported.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    /// Duration edit with a non-positive minute value.
    #[error("時間は1分以上で指定してください")]
    InvalidDuration,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// The sole authority over [`TimerState`].
///
/// All mutations go through the engine's operations; observers read the
/// state as a snapshot stream obtained from [`TimerEngine::subscribe`].
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Snapshot publisher for observers
    state_tx: watch::Sender<TimerState>,
    /// Command channel to the background runner
    runner_tx: mpsc::UnboundedSender<RunnerCommand>,
}

impl TimerEngine {
    /// Creates a new engine in the stopped state with default durations.
    pub fn new(runner_tx: mpsc::UnboundedSender<RunnerCommand>) -> Self {
        let state = TimerState::new();
        let (state_tx, _) = watch::channel(state.clone());
        Self {
            state,
            state_tx,
            runner_tx,
        }
    }

    /// Returns a new receiver of the state snapshot stream.
    ///
    /// The receiver sees the latest snapshot immediately and every published
    /// change afterwards; dropping and resubscribing restarts the stream at
    /// the current state.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state_tx.subscribe()
    }

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Starts the countdown in the currently selected mode.
    ///
    /// No-op while already running. Tells the background runner to begin
    /// keep-alive playback of the selected sound.
    pub fn start_timer(&mut self) {
        if self.state.is_running {
            return;
        }

        self.send_runner(RunnerCommand::Start {
            mode: self.state.mode,
            sound: self.state.sound,
        });
        self.state.is_running = true;

        info!("タイマーを開始しました: {}", self.state.mode.as_str());
        self.publish();
    }

    /// Stops the countdown, discarding partial progress.
    ///
    /// The countdown of the current mode is reset to its configured
    /// duration and the background runner is told to release playback.
    pub fn stop_timer(&mut self) {
        self.send_runner(RunnerCommand::Stop);
        self.state.is_running = false;
        self.state.remaining_seconds = self.state.duration_for(self.state.mode);

        info!("タイマーを停止しました");
        self.publish();
    }

    /// Selects the work mode. Silent no-op while running.
    pub fn switch_to_work(&mut self) {
        self.switch_mode(TimerMode::Work);
    }

    /// Selects the rest mode. Silent no-op while running.
    pub fn switch_to_rest(&mut self) {
        self.switch_mode(TimerMode::Rest);
    }

    fn switch_mode(&mut self, mode: TimerMode) {
        if self.state.is_running {
            return;
        }

        self.state.switch_mode(mode);
        self.publish();
    }

    /// Sets the duration of the currently selected mode.
    ///
    /// While stopped, the countdown is reset to the new value immediately;
    /// while running, the new duration takes effect on the next interval.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidDuration`] for a zero minute value; the
    /// state is left unchanged.
    pub fn update_current_duration(&mut self, minutes: u32) -> Result<(), TimerError> {
        let seconds = validate_minutes(minutes)?;

        self.state.set_duration(self.state.mode, seconds);
        if !self.state.is_running {
            self.state.remaining_seconds = seconds;
        }
        self.publish();
        Ok(())
    }

    /// Sets the work duration without touching the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidDuration`] for a zero minute value.
    pub fn update_work_duration(&mut self, minutes: u32) -> Result<(), TimerError> {
        let seconds = validate_minutes(minutes)?;
        self.state.set_duration(TimerMode::Work, seconds);
        self.publish();
        Ok(())
    }

    /// Sets the rest duration without touching the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidDuration`] for a zero minute value.
    pub fn update_rest_duration(&mut self, minutes: u32) -> Result<(), TimerError> {
        let seconds = validate_minutes(minutes)?;
        self.state.set_duration(TimerMode::Rest, seconds);
        self.publish();
        Ok(())
    }

    /// Selects an ambient track.
    ///
    /// While running, the background runner is told to switch playback in
    /// place; while stopped no message is sent, since nothing is playing.
    pub fn update_current_sound(&mut self, sound: SoundId) {
        self.state.sound = sound;
        if self.state.is_running {
            self.send_runner(RunnerCommand::UpdateSound { sound });
        }
        self.publish();
    }

    /// Flips the infinite-cycle flag.
    pub fn toggle_infinite_mode(&mut self) {
        self.state.infinite_mode = !self.state.infinite_mode;
        self.publish();
    }

    /// Advances the countdown by one second.
    ///
    /// Called once per second by the ticker loop. When the interval
    /// completes, the engine flips to the opposite mode and keeps running
    /// with that mode's configured duration; the session loops until
    /// [`TimerEngine::stop_timer`] is called. The background runner is not
    /// told about the flip, and the flip does not consult `infinite_mode`.
    pub fn tick_once(&mut self) {
        if !self.state.is_running {
            return;
        }

        if self.state.tick() {
            let next = self.state.mode.opposite();
            self.state.switch_mode(next);
            info!(
                "インターバル完了: {} に自動的に移行します ({}秒)",
                next.as_str(),
                self.state.remaining_seconds
            );
        }

        self.publish();
    }

    /// Publishes the current state to the snapshot stream.
    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }

    /// Sends a command to the background runner, fire-and-forget.
    fn send_runner(&self, command: RunnerCommand) {
        if self.runner_tx.send(command).is_err() {
            warn!("バックグラウンドランナーへの送信に失敗しました");
        }
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

fn validate_minutes(minutes: u32) -> Result<u32, TimerError> {
    if minutes == 0 {
        return Err(TimerError::InvalidDuration);
    }
    Ok(minutes.saturating_mul(60))
}

// ============================================================================
// Ticker loop
// ============================================================================

/// Runs the countdown for a shared engine.
///
/// One 1-second tick loop per engine; this is the only task that advances
/// the countdown, so there is never more than one decrementing task and a
/// stop observed under the lock drops all further ticks. Spawn it once when
/// the daemon starts.
pub async fn run_ticker(engine: Arc<Mutex<TimerEngine>>) {
    let period = Duration::from_secs(1);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        engine.lock().await.tick_once();
    }
}

// ============================================================================
// Tests
// ============================================================================
