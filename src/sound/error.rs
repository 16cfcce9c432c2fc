//! Sound system error types.
//!
//! All errors are locally absorbed by the playback layer; none are fatal to
//! the daemon. The variants exist for logging and for graceful degradation
//! when audio hardware is unavailable.

use thiserror::Error;

/// Errors that can occur in the ambient playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no output hardware).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Asset file was not found for a catalog entry.
    #[error("サウンドファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("サウンドファイルのデコードに失敗しました: {0}")]
    DecodeError(String),

    /// The audio output stream failed or the audio thread terminated.
    #[error("オーディオストリームのエラー: {0}")]
    StreamError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if playback should fall back to the embedded loop.
    #[must_use]
    pub fn should_fallback_to_embedded(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }
}
