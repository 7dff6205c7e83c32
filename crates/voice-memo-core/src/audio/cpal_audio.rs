use crate::{
    AudioError, AudioResult,
    audio::{
        AudioCapability, AudioCapturer, CaptureHandle, CaptureOptions, Permission, PlayingSound,
        Resampler, ResourceUri, SoundHandle, SoundOutput, read_wav, write_wav,
    },
};

use std::{
    collections::HashMap,
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// [`AudioCapability`] backed by the default cpal input and output devices.
///
/// Takes are stored as WAV files in `recordings_dir`; their paths are the
/// resource URIs handed back to the session.
pub struct CpalAudio {
    recordings_dir: PathBuf,
    capturer: Option<AudioCapturer>,
    active_capture: Option<(CaptureHandle, CaptureOptions)>,
    output: Option<SoundOutput>,
    /// Loaded sounds, already resampled to the output device rate.
    sounds: HashMap<SoundHandle, Arc<Vec<f32>>>,
    playing: HashMap<SoundHandle, PlayingSound>,
}

impl CpalAudio {
    /// Create a capability storing takes under `recordings_dir`.
    ///
    /// Devices are opened lazily, so construction never touches hardware.
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
            capturer: None,
            active_capture: None,
            output: None,
            sounds: HashMap::new(),
            playing: HashMap::new(),
        }
    }

    /// Directory new takes are written to.
    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    #[track_caller]
    fn capturer(&mut self) -> AudioResult<&mut AudioCapturer> {
        if self.capturer.is_none() {
            self.capturer = Some(AudioCapturer::new()?);
        }
        self.capturer.as_mut().ok_or(AudioError::NoMicrophoneFound {
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn output(&mut self) -> AudioResult<&SoundOutput> {
        if self.output.is_none() {
            self.output = Some(SoundOutput::new()?);
        }
        self.output.as_ref().ok_or(AudioError::NoOutputDevice {
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn take_path(&self, handle: &CaptureHandle) -> AudioResult<PathBuf> {
        if !self.recordings_dir.exists() {
            fs::create_dir_all(&self.recordings_dir).map_err(|e| AudioError::EncodingError {
                reason: format!(
                    "Failed to create recordings dir {}: {}",
                    self.recordings_dir.display(),
                    e
                ),
                location: ErrorLocation::from(Location::caller()),
            })?;
            debug!(recordings_dir = ?self.recordings_dir, "Created recordings directory");
        }

        Ok(self
            .recordings_dir
            .join(format!("recording-{}.wav", handle.id())))
    }
}

#[async_trait(?Send)]
impl AudioCapability for CpalAudio {
    #[instrument(skip(self))]
    async fn request_permission(&mut self) -> AudioResult<Permission> {
        // Desktop hosts have no prompt; an inaccessible microphone is a denial.
        match self.capturer() {
            Ok(_) => Ok(Permission::Granted),
            Err(e) => {
                warn!(error = ?e, "Microphone unavailable, treating as permission denied");
                Ok(Permission::Denied)
            }
        }
    }

    #[instrument(skip(self))]
    async fn start_capture(&mut self, options: &CaptureOptions) -> AudioResult<CaptureHandle> {
        if let Some((active, _)) = self.active_capture {
            return Err(AudioError::DeviceError {
                reason: format!("Capture {} is already running", active.id()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.capturer()?.start(options.max_duration)?;

        let handle = CaptureHandle::new();
        self.active_capture = Some((handle, *options));

        info!(capture_id = %handle.id(), preset = ?options.preset, "Capture started");

        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn stop_capture(&mut self, handle: &CaptureHandle) -> AudioResult<ResourceUri> {
        let options = match self.active_capture {
            Some((active, options)) if active == *handle => options,
            _ => {
                return Err(AudioError::UnknownHandle {
                    kind: "capture",
                    id: handle.id().to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };
        self.active_capture = None;

        let capturer = self.capturer()?;
        let device_rate = capturer.sample_rate();
        let samples = capturer.stop()?;

        if samples.is_empty() {
            return Err(AudioError::NoAudioCaptured {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let stored = Resampler::new(device_rate, options.preset.sample_rate())?.resample(&samples)?;
        let path = self.take_path(handle)?;
        write_wav(&path, &stored, options.preset.sample_rate())?;

        info!(
            capture_id = %handle.id(),
            path = ?path,
            sample_count = stored.len(),
            "Capture stored"
        );

        Ok(ResourceUri::from_path(&path))
    }

    #[instrument(skip(self, uri), fields(uri = %uri))]
    async fn load_sound(&mut self, uri: &ResourceUri) -> AudioResult<SoundHandle> {
        let decoded = read_wav(Path::new(uri.as_str()))?;
        let output_rate = self.output()?.sample_rate();
        let samples = Resampler::new(decoded.sample_rate, output_rate)?.resample(&decoded.samples)?;

        let handle = SoundHandle::new();
        self.sounds.insert(handle, Arc::new(samples));

        debug!(sound_id = %handle.id(), "Sound loaded");

        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn play_sound(&mut self, sound: &SoundHandle) -> AudioResult<()> {
        let samples = self
            .sounds
            .get(sound)
            .cloned()
            .ok_or_else(|| AudioError::UnknownHandle {
                kind: "sound",
                id: sound.id().to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        // Replaying restarts from the beginning.
        self.playing.remove(sound);
        let playing = self.output()?.play(samples)?;
        self.playing.insert(*sound, playing);

        info!(sound_id = %sound.id(), "Playback started");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop_sound(&mut self, sound: &SoundHandle) -> AudioResult<()> {
        let was_playing = self.playing.remove(sound).is_some();
        self.sounds.remove(sound);

        if was_playing {
            info!(sound_id = %sound.id(), "Playback stopped");
        } else {
            debug!(sound_id = %sound.id(), "Stop requested for idle sound");
        }

        Ok(())
    }

    fn is_sound_finished(&self, sound: &SoundHandle) -> bool {
        self.playing
            .get(sound)
            .is_none_or(PlayingSound::is_finished)
    }
}
