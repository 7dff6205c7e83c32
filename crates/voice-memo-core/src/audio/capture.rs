use crate::{AudioError, AudioResult};

use std::{
    panic::Location,
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
    time::Duration,
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Number of mono samples that fit in `max_duration` at `sample_rate`.
pub(crate) fn sample_limit(sample_rate: u32, max_duration: Duration) -> usize {
    (sample_rate as f64 * max_duration.as_secs_f64()) as usize
}

/// Average interleaved frames down to mono and append them to `buf`,
/// stopping once `limit` samples are held.
///
/// Returns `true` if any input was dropped because the limit was reached.
pub(crate) fn append_mono(buf: &mut Vec<f32>, data: &[f32], channels: usize, limit: usize) -> bool {
    let channels = channels.max(1);
    let mut truncated = false;

    for frame in data.chunks(channels) {
        if buf.len() >= limit {
            truncated = true;
            break;
        }
        let sum: f32 = frame.iter().sum();
        buf.push(sum / frame.len() as f32);
    }

    truncated
}

/// Microphone capture into an in-memory mono buffer.
pub struct AudioCapturer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    samples: Arc<Mutex<Vec<f32>>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback writes after `stop()`
    /// takes the lock.
    shutdown: Arc<AtomicBool>,
}

impl AudioCapturer {
    /// Open the default input device.
    #[track_caller]
    #[instrument]
    pub fn new() -> AudioResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(AudioError::NoMicrophoneFound {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "AudioCapturer initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            samples: Arc::new(Mutex::new(Vec::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start a new take, discarding any samples from the previous one.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self, max_duration: Duration) -> AudioResult<()> {
        let samples = Arc::clone(&self.samples);
        let shutdown = Arc::clone(&self.shutdown);
        let channels = self.config.channels as usize;
        let limit = sample_limit(self.sample_rate(), max_duration);

        self.shutdown.store(false, Ordering::Release);

        {
            let mut buf = samples.lock().map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            buf.clear();
            buf.reserve(limit.min(self.sample_rate() as usize * 60));
        }

        let limit_logged = Arc::new(AtomicBool::new(false));

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // A poisoned lock still holds valid samples.
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    if append_mono(&mut buf, data, channels, limit)
                        && !limit_logged.swap(true, Ordering::Relaxed)
                    {
                        warn!(limit, "Maximum take length reached, dropping further audio");
                    }
                },
                |err| {
                    error!("Audio input stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to build input stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to start input stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!(limit, "Audio capture started");

        Ok(())
    }

    /// Stop the stream and return a copy of the take.
    ///
    /// The buffer is kept until the next `start()`, so calling this again
    /// returns the same samples.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> AudioResult<Vec<f32>> {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Let an in-flight callback observe the shutdown flag.
            std::thread::sleep(Duration::from_millis(5));
            info!("Audio capture stopped");
        }

        let samples = self
            .samples
            .lock()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .clone();

        debug!(sample_count = samples.len(), "Captured audio samples");

        Ok(samples)
    }

    /// Device sample rate of captured audio.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}
