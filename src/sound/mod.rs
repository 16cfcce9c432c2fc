//! Ambient sound playback for the Pomonoise timer.
//!
//! This module provides:
//!
//! - The fixed catalog of selectable ambient tracks
//! - Looping, non-blocking playback on a dedicated audio thread
//! - An embedded synthesized fallback loop per track
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  AmbientPlayer   │ ← capability seam (play/pause/release)
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundId /      │────▶│   Asset files    │
//! │   CATALOG        │     │ (~/.pomonoise/…) │
//! │                  │     ├──────────────────┤
//! │                  │────▶│  Embedded loop   │
//! └──────────────────┘     │   (fallback)     │
//!                          └──────────────────┘
//! ```

pub mod catalog;
mod embedded;
mod error;
mod player;

pub use catalog::{SoundEntry, SoundId, CATALOG};
pub use embedded::EmbeddedLoop;
pub use error::SoundError;
pub use player::RodioAmbientPlayer;

use std::sync::Arc;

use tracing::warn;

// ============================================================================
// AmbientPlayer
// ============================================================================

/// The opaque playback capability used by the background runner.
///
/// Implementations load a track by identifier, play it looped, and can
/// pause or release it. Decoding and output are entirely the
/// implementation's concern.
pub trait AmbientPlayer: Send + Sync {
    /// Starts looped playback of the given track, replacing any current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the playback backend is gone.
    fn play_looped(&self, sound: SoundId) -> Result<(), SoundError>;

    /// Pauses playback without releasing the loaded track.
    fn pause(&self);

    /// Releases playback resources.
    fn release(&self);

    /// Returns the track currently loaded, if any.
    fn current(&self) -> Option<SoundId>;
}

impl AmbientPlayer for RodioAmbientPlayer {
    fn play_looped(&self, sound: SoundId) -> Result<(), SoundError> {
        RodioAmbientPlayer::play_looped(self, sound)
    }

    fn pause(&self) {
        RodioAmbientPlayer::pause(self)
    }

    fn release(&self) {
        RodioAmbientPlayer::release(self)
    }

    fn current(&self) -> Option<SoundId> {
        RodioAmbientPlayer::current(self)
    }
}

/// Creates an ambient player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned
/// so the daemon can continue without playback.
#[must_use]
pub fn try_create_player() -> Option<Arc<RodioAmbientPlayer>> {
    match RodioAmbientPlayer::new() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("オーディオが利用できないため再生なしで続行します: {}", e);
            None
        }
    }
}

// ============================================================================
// MockAmbientPlayer
// ============================================================================

/// A call recorded by [`MockAmbientPlayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCall {
    /// `play_looped` with the given track
    PlayLooped(SoundId),
    /// `pause`
    Pause,
    /// `release`
    Release,
}

/// Mock ambient player for testing.
///
/// Records every call; playback is a no-op. Also used by the daemon as the
/// silent player when no audio device is available.
#[derive(Debug, Default)]
pub struct MockAmbientPlayer {
    calls: std::sync::Mutex<Vec<PlayerCall>>,
    current: std::sync::Mutex<Option<SoundId>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockAmbientPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, PlayerCall::PlayLooped(_)))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl AmbientPlayer for MockAmbientPlayer {
    fn play_looped(&self, sound: SoundId) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::StreamError("Mock failure".to_string()));
        }
        self.calls.lock().unwrap().push(PlayerCall::PlayLooped(sound));
        *self.current.lock().unwrap() = Some(sound);
        Ok(())
    }

    fn pause(&self) {
        self.calls.lock().unwrap().push(PlayerCall::Pause);
    }

    fn release(&self) {
        self.calls.lock().unwrap().push(PlayerCall::Release);
        *self.current.lock().unwrap() = None;
    }

    fn current(&self) -> Option<SoundId> {
        *self.current.lock().unwrap()
    }
}

// ============================================================================
// Tests
// ============================================================================
