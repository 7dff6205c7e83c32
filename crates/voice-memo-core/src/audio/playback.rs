use crate::{AudioError, AudioResult};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Copy mono samples starting at `cursor` into an interleaved output buffer,
/// duplicating each sample across `channels`. Frames past the end are silent.
///
/// Returns the cursor after the written frames.
pub(crate) fn fill_frames(out: &mut [f32], samples: &[f32], cursor: usize, channels: usize) -> usize {
    let channels = channels.max(1);
    let mut position = cursor;

    for frame in out.chunks_mut(channels) {
        let value = samples.get(position).copied().unwrap_or(0.0);
        frame.fill(value);
        if position < samples.len() {
            position += 1;
        }
    }

    position
}

/// A running output stream and how far it has read.
pub struct PlayingSound {
    // Held for its Drop, which stops the stream.
    _stream: Stream,
    cursor: Arc<AtomicUsize>,
    len: usize,
}

impl PlayingSound {
    /// True once every sample has been handed to the device.
    pub fn is_finished(&self) -> bool {
        played_through(self.cursor.load(Ordering::Acquire), self.len)
    }
}

pub(crate) fn played_through(cursor: usize, len: usize) -> bool {
    cursor >= len
}

/// Default output device and the stream config sounds are rendered at.
pub struct SoundOutput {
    device: Device,
    config: StreamConfig,
}

impl SoundOutput {
    #[track_caller]
    #[instrument]
    pub fn new() -> AudioResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to get output config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "SoundOutput initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
        })
    }

    /// Output device sample rate; sounds must be resampled to this first.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Start streaming `samples` (mono, at [`Self::sample_rate`]).
    ///
    /// Playback runs until the returned sound is dropped. After the last
    /// sample the stream renders silence and [`PlayingSound::is_finished`]
    /// turns true.
    #[track_caller]
    #[instrument(skip(self, samples), fields(sample_count = samples.len()))]
    pub fn play(&self, samples: Arc<Vec<f32>>) -> AudioResult<PlayingSound> {
        let channels = self.config.channels as usize;
        let len = samples.len();
        let cursor = Arc::new(AtomicUsize::new(0));
        let callback_cursor = Arc::clone(&cursor);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let start = callback_cursor.load(Ordering::Acquire);
                    let next = fill_frames(out, &samples, start, channels);
                    callback_cursor.store(next, Ordering::Release);
                },
                |err| {
                    error!("Audio output stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to build output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to start output stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!("Output stream started");

        Ok(PlayingSound {
            _stream: stream,
            cursor,
            len,
        })
    }
}
