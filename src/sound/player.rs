//! Ambient player implementation using rodio.
//!
//! rodio's `OutputStream` is tied to the thread that created it, so all
//! playback runs on a dedicated audio thread. The `RodioAmbientPlayer`
//! handle owns the command side of a crossbeam channel into that thread and
//! is itself `Send + Sync`, which lets the daemon share it across tasks.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::{debug, warn};

use super::catalog::SoundId;
use super::embedded::EmbeddedLoop;
use super::error::SoundError;

/// Per-user directory searched for ambient asset files.
const SOUNDS_DIR: &str = ".pomonoise/sounds";

/// Asset file extensions tried in order.
const ASSET_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

// ============================================================================
// Audio thread protocol
// ============================================================================

/// Commands sent from the handle to the audio thread.
enum PlayerOp {
    /// Replace the current track with a looped rendition of the given one
    Play(SoundId),
    /// Pause the current sink, keeping it loaded
    Pause,
    /// Drop the current sink, releasing playback resources
    Release,
    /// Terminate the audio thread
    Shutdown,
}

// ============================================================================
// RodioAmbientPlayer
// ============================================================================

/// Looping ambient player backed by a dedicated rodio thread.
pub struct RodioAmbientPlayer {
    /// Command channel into the audio thread
    ops: Sender<PlayerOp>,
    /// Track currently loaded, if any
    current: Mutex<Option<SoundId>>,
    /// Audio thread handle, joined on drop
    thread: Option<thread::JoinHandle<()>>,
}

impl RodioAmbientPlayer {
    /// Creates the player and spawns its audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// can be opened.
    pub fn new() -> Result<Self, SoundError> {
        let (ops_tx, ops_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);

        let thread = thread::Builder::new()
            .name("pomonoise-audio".to_string())
            .spawn(move || audio_thread(&ops_rx, &ready_tx))
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                ops: ops_tx,
                current: Mutex::new(None),
                thread: Some(thread),
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(SoundError::StreamError(
                "audio thread exited during startup".to_string(),
            )),
        }
    }

    /// Starts looped playback of the given track, replacing any current one.
    pub fn play_looped(&self, sound: SoundId) -> Result<(), SoundError> {
        self.ops
            .send(PlayerOp::Play(sound))
            .map_err(|_| SoundError::StreamError("audio thread terminated".to_string()))?;
        *self.current.lock().unwrap() = Some(sound);
        Ok(())
    }

    /// Pauses playback without releasing the loaded track.
    pub fn pause(&self) {
        if self.ops.send(PlayerOp::Pause).is_err() {
            warn!("オーディオスレッドが終了しているため一時停止できません");
        }
    }

    /// Releases playback resources.
    pub fn release(&self) {
        if self.ops.send(PlayerOp::Release).is_err() {
            warn!("オーディオスレッドが終了しているため解放できません");
        }
        *self.current.lock().unwrap() = None;
    }

    /// Returns the track currently loaded, if any.
    #[must_use]
    pub fn current(&self) -> Option<SoundId> {
        *self.current.lock().unwrap()
    }
}

impl Drop for RodioAmbientPlayer {
    fn drop(&mut self) {
        let _ = self.ops.send(PlayerOp::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl std::fmt::Debug for RodioAmbientPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAmbientPlayer")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Audio thread
// ============================================================================

/// Body of the dedicated audio thread.
///
/// The `OutputStream` lives here for the whole lifetime of the player; only
/// the sink is rebuilt when the track changes.
fn audio_thread(ops: &Receiver<PlayerOp>, ready: &Sender<Result<(), SoundError>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    let mut sink: Option<Sink> = None;

    while let Ok(op) = ops.recv() {
        match op {
            PlayerOp::Play(sound) => {
                if let Some(old) = sink.take() {
                    old.stop();
                }
                match Sink::try_new(&handle) {
                    Ok(new_sink) => {
                        append_looped(&new_sink, sound);
                        new_sink.play();
                        sink = Some(new_sink);
                    }
                    Err(e) => warn!("シンクを作成できません: {}", e),
                }
            }
            PlayerOp::Pause => {
                if let Some(sink) = &sink {
                    sink.pause();
                }
            }
            PlayerOp::Release => {
                if let Some(sink) = sink.take() {
                    sink.stop();
                }
            }
            PlayerOp::Shutdown => break,
        }
    }
}

/// Appends the looped rendition of a track to the sink.
///
/// Falls back to the embedded synthesized loop when the asset file is
/// missing or cannot be decoded.
fn append_looped(sink: &Sink, sound: SoundId) {
    match open_asset(sound) {
        Ok(decoder) => {
            debug!("アセットをループ再生します: {}", sound);
            sink.append(decoder.repeat_infinite());
        }
        Err(e) => {
            warn!("'{}' のアセットを再生できません ({})、埋め込みループにフォールバックします", sound, e);
            sink.append(EmbeddedLoop::new(sound));
        }
    }
}

/// Opens and decodes the asset file for a track.
fn open_asset(sound: SoundId) -> Result<Decoder<BufReader<File>>, SoundError> {
    let path = find_asset(sound)
        .ok_or_else(|| SoundError::FileNotFound(format!("{}.*", sound.asset())))?;

    let file = File::open(&path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}

/// Returns the first existing asset file for a track.
fn find_asset(sound: SoundId) -> Option<PathBuf> {
    let dir = sounds_dir()?;
    ASSET_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", sound.asset(), ext)))
        .find(|path| path.exists())
}

/// Returns the per-user ambient asset directory.
fn sounds_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(SOUNDS_DIR))
}
