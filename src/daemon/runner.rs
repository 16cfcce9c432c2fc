//! Background runner for the Pomonoise daemon.
//!
//! The runner is the long-lived worker that keeps ambient playback alive
//! while the countdown runs, independent of any interactive surface. It
//! consumes a closed set of commands from the engine over an unbounded
//! channel; sends are fire-and-forget and never awaited by the engine.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::alert::{AlertSink, PULSE_DURATION};
use crate::sound::{AmbientPlayer, SoundId};
use crate::types::TimerMode;

// ============================================================================
// RunnerCommand
// ============================================================================

/// Commands accepted by the background runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerCommand {
    /// Acquire the keep-alive and begin looped playback.
    Start {
        /// Interval type the session starts in
        mode: TimerMode,
        /// Ambient track to loop
        sound: SoundId,
    },
    /// Switch the looped track in place, keeping the keep-alive.
    UpdateSound {
        /// New ambient track
        sound: SoundId,
    },
    /// Release playback and the keep-alive.
    Stop,
    /// Fire the completion alert and release playback.
    ///
    /// The engine's auto-advancing completion transition never sends this;
    /// the session loops until an explicit stop. The path is kept for the
    /// alert contract and exercised by tests.
    SessionComplete,
}

// ============================================================================
// BackgroundRunner
// ============================================================================

/// Long-running worker that owns playback and the completion alert.
pub struct BackgroundRunner {
    /// Command receiver from the engine
    rx: mpsc::UnboundedReceiver<RunnerCommand>,
    /// Opaque playback capability
    player: Arc<dyn AmbientPlayer>,
    /// Completion alert sink
    alert: Arc<dyn AlertSink>,
    /// Whether the keep-alive is currently held
    keep_alive: bool,
}

impl BackgroundRunner {
    /// Creates a runner draining the given command channel.
    pub fn new(
        rx: mpsc::UnboundedReceiver<RunnerCommand>,
        player: Arc<dyn AmbientPlayer>,
        alert: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            rx,
            player,
            alert,
            keep_alive: false,
        }
    }

    /// Drains commands until the engine side is dropped.
    ///
    /// Spawn this as its own task; it releases playback before returning.
    pub async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }

        if self.keep_alive {
            self.release_keep_alive();
        }
        info!("バックグラウンドランナーを終了します");
    }

    /// Applies one command.
    fn handle(&mut self, command: RunnerCommand) {
        match command {
            RunnerCommand::Start { mode, sound } => {
                self.acquire_keep_alive(mode);
                self.play(sound);
            }
            RunnerCommand::UpdateSound { sound } => {
                // Track switch only; the keep-alive stays held.
                self.play(sound);
            }
            RunnerCommand::Stop => {
                self.release_keep_alive();
            }
            RunnerCommand::SessionComplete => {
                self.alert.pulse(PULSE_DURATION);
                self.alert
                    .notify("ポモドーロ", "セッションが完了しました");
                self.release_keep_alive();
            }
        }
    }

    fn acquire_keep_alive(&mut self, mode: TimerMode) {
        self.keep_alive = true;
        info!(
            "キープアライブを取得しました: {} セッション",
            mode.as_str()
        );
    }

    fn release_keep_alive(&mut self) {
        self.player.release();
        self.keep_alive = false;
        info!("再生を解放してキープアライブを手放しました");
    }

    fn play(&self, sound: SoundId) {
        if let Err(e) = self.player.play_looped(sound) {
            warn!("'{}' を再生できません: {}", sound, e);
        }
    }

    /// Returns true while the keep-alive is held (for testing).
    #[cfg(test)]
    pub(crate) fn holds_keep_alive(&self) -> bool {
        self.keep_alive
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::alert::MockAlert;
    use crate::sound::{MockAmbientPlayer, PlayerCall};

    fn create_runner() -> (
        BackgroundRunner,
        mpsc::UnboundedSender<RunnerCommand>,
        Arc<MockAmbientPlayer>,
        Arc<MockAlert>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let player = Arc::new(MockAmbientPlayer::new());
        let alert = Arc::new(MockAlert::new());
        let runner = BackgroundRunner::new(rx, player.clone(), alert.clone());
        (runner, tx, player, alert)
    }

    // ------------------------------------------------------------------------
    // Command handling
    // ------------------------------------------------------------------------

    mod command_tests {
        use super::*;

        #[test]
        fn test_start_acquires_keep_alive_and_plays_looped() {
            let (mut runner, _tx, player, _alert) = create_runner();

            runner.handle(RunnerCommand::Start {
                mode: TimerMode::Work,
                sound: SoundId::Rain,
            });

            assert!(runner.holds_keep_alive());
            assert_eq!(player.calls(), vec![PlayerCall::PlayLooped(SoundId::Rain)]);
        }

        #[test]
        fn test_update_sound_switches_in_place() {
            let (mut runner, _tx, player, _alert) = create_runner();

            runner.handle(RunnerCommand::Start {
                mode: TimerMode::Work,
                sound: SoundId::Rain,
            });
            runner.handle(RunnerCommand::UpdateSound {
                sound: SoundId::Ocean,
            });

            assert!(runner.holds_keep_alive(), "track switch must keep the keep-alive");
            assert_eq!(
                player.calls(),
                vec![
                    PlayerCall::PlayLooped(SoundId::Rain),
                    PlayerCall::PlayLooped(SoundId::Ocean),
                ]
            );
            assert_eq!(player.current(), Some(SoundId::Ocean));
        }

        #[test]
        fn test_stop_releases_playback_and_keep_alive() {
            let (mut runner, _tx, player, alert) = create_runner();

            runner.handle(RunnerCommand::Start {
                mode: TimerMode::Rest,
                sound: SoundId::Forest,
            });
            runner.handle(RunnerCommand::Stop);

            assert!(!runner.holds_keep_alive());
            assert_eq!(player.current(), None);
            assert!(alert.pulses().is_empty(), "a plain stop must not alert");
        }

        #[test]
        fn test_session_complete_pulses_notifies_and_releases() {
            let (mut runner, _tx, player, alert) = create_runner();

            runner.handle(RunnerCommand::Start {
                mode: TimerMode::Work,
                sound: SoundId::Rain,
            });
            runner.handle(RunnerCommand::SessionComplete);

            assert_eq!(alert.pulses(), vec![PULSE_DURATION]);
            assert_eq!(alert.notices().len(), 1);
            assert_eq!(alert.notices()[0].0, "ポモドーロ");
            assert_eq!(player.current(), None);
            assert!(!runner.holds_keep_alive());
        }

        #[test]
        fn test_player_failure_is_absorbed() {
            let (mut runner, _tx, player, _alert) = create_runner();
            player.set_should_fail(true);

            runner.handle(RunnerCommand::Start {
                mode: TimerMode::Work,
                sound: SoundId::Rain,
            });

            // The runner stays alive and keeps the keep-alive.
            assert!(runner.holds_keep_alive());
        }
    }

    // ------------------------------------------------------------------------
    // Run loop
    // ------------------------------------------------------------------------

    mod run_loop_tests {
        use super::*;

        #[tokio::test]
        async fn test_run_drains_commands_in_order() {
            let (runner, tx, player, _alert) = create_runner();

            tx.send(RunnerCommand::Start {
                mode: TimerMode::Work,
                sound: SoundId::Rain,
            })
            .unwrap();
            tx.send(RunnerCommand::UpdateSound {
                sound: SoundId::BrownNoise,
            })
            .unwrap();
            tx.send(RunnerCommand::Stop).unwrap();
            drop(tx);

            runner.run().await;

            assert_eq!(
                player.calls(),
                vec![
                    PlayerCall::PlayLooped(SoundId::Rain),
                    PlayerCall::PlayLooped(SoundId::BrownNoise),
                    PlayerCall::Release,
                ]
            );
        }

        #[tokio::test]
        async fn test_run_releases_on_channel_close_while_playing() {
            let (runner, tx, player, _alert) = create_runner();

            tx.send(RunnerCommand::Start {
                mode: TimerMode::Work,
                sound: SoundId::Forest,
            })
            .unwrap();
            drop(tx);

            runner.run().await;

            assert_eq!(player.current(), None);
        }
    }
}
