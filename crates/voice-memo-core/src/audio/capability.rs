use crate::AudioResult;

use std::{fmt, path::Path, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a microphone permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// The user allowed microphone access.
    Granted,
    /// The user declined microphone access.
    Denied,
}

/// Quality presets for new captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturePreset {
    /// 44.1kHz mono, suited for music and general notes.
    #[default]
    HighQuality,
    /// 16kHz mono, suited for speech.
    LowQuality,
}

impl CapturePreset {
    /// Sample rate a finished take is stored at.
    pub fn sample_rate(self) -> u32 {
        match self {
            CapturePreset::HighQuality => 44_100,
            CapturePreset::LowQuality => 16_000,
        }
    }
}

/// Parameters for starting a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Output quality of the stored take.
    pub preset: CapturePreset,
    /// Longest take kept; audio beyond this is dropped.
    pub max_duration: Duration,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            preset: CapturePreset::default(),
            max_duration: Duration::from_secs(600),
        }
    }
}

/// Opaque identifier of a finished capture, used to load it again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri(String);

impl ResourceUri {
    /// Wrap a raw resource identifier.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Resource URI for a file on disk.
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a capture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureHandle(Uuid);

impl CaptureHandle {
    /// Create a fresh, unique handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier used in logs and errors.
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for CaptureHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a loaded sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(Uuid);

impl SoundHandle {
    /// Create a fresh, unique handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier used in logs and errors.
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for SoundHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform audio services used by the session manager.
///
/// Calls are awaited one at a time from a single task, so implementations
/// are not required to be `Send`.
#[async_trait(?Send)]
pub trait AudioCapability {
    /// Ask for microphone access.
    async fn request_permission(&mut self) -> AudioResult<Permission>;

    /// Begin capturing from the microphone.
    async fn start_capture(&mut self, options: &CaptureOptions) -> AudioResult<CaptureHandle>;

    /// Finish a capture and return where the take was stored.
    ///
    /// The capture is over whether or not this succeeds; a failed stop loses
    /// the take.
    async fn stop_capture(&mut self, handle: &CaptureHandle) -> AudioResult<ResourceUri>;

    /// Prepare a stored take for playback.
    async fn load_sound(&mut self, uri: &ResourceUri) -> AudioResult<SoundHandle>;

    /// Start playing a loaded sound.
    async fn play_sound(&mut self, sound: &SoundHandle) -> AudioResult<()>;

    /// Stop a sound and release it.
    async fn stop_sound(&mut self, sound: &SoundHandle) -> AudioResult<()>;

    /// Whether a started sound has played through to its end.
    ///
    /// Backends that cannot tell report `false`; the sound is then treated
    /// as playing until stopped.
    fn is_sound_finished(&self, _sound: &SoundHandle) -> bool {
        false
    }
}
