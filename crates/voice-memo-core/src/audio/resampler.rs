use crate::{AudioError, AudioResult};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Mono sample rate converter.
///
/// Used on both sides of a take: device rate to preset rate when a capture
/// is stored, and file rate to output device rate before playback.
pub struct Resampler {
    /// `None` when input and output rates match.
    resampler: Option<Fft<f32>>,
    input_rate: u32,
    output_rate: u32,
}

impl Resampler {
    #[track_caller]
    #[instrument]
    pub fn new(input_rate: u32, output_rate: u32) -> AudioResult<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(AudioError::ResamplingError {
                reason: format!("Invalid sample rates {} -> {}", input_rate, output_rate),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let resampler = if input_rate == output_rate {
            None
        } else {
            let fft = Fft::<f32>::new(
                input_rate as usize,
                output_rate as usize,
                CHUNK_SIZE,
                SUB_CHUNKS,
                1,
                FixedSync::Input,
            )
            .map_err(|e| AudioError::ResamplingError {
                reason: format!("Failed to create resampler: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            Some(fft)
        };

        debug!(input_rate, output_rate, passthrough = resampler.is_none(), "Resampler initialized");

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
        })
    }

    /// Whether samples pass through untouched.
    pub fn is_passthrough(&self) -> bool {
        self.resampler.is_none()
    }

    #[track_caller]
    #[instrument(skip(self, samples))]
    pub fn resample(&mut self, samples: &[f32]) -> AudioResult<Vec<f32>> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(samples.to_vec());
        };

        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let estimated_len =
            (samples.len() as f64 * self.output_rate as f64 / self.input_rate as f64) as usize;
        let mut output = Vec::with_capacity(estimated_len);
        let mut output_chunk = vec![0.0f32; resampler.output_frames_max()];

        for chunk in samples.chunks(CHUNK_SIZE) {
            let mut input_chunk = chunk.to_vec();
            // Last chunk is zero-padded to the fixed input size.
            input_chunk.resize(CHUNK_SIZE, 0.0);

            let input_adapter = InterleavedSlice::new(&input_chunk, 1, CHUNK_SIZE).map_err(|e| {
                AudioError::ResamplingError {
                    reason: format!("Failed to create input adapter: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

            let output_frames = output_chunk.len();
            let mut output_adapter = InterleavedSlice::new_mut(&mut output_chunk, 1, output_frames)
                .map_err(|e| AudioError::ResamplingError {
                    reason: format!("Failed to create output adapter: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let (_input_frames, written) = resampler
                .process_into_buffer(&input_adapter, &mut output_adapter, None)
                .map_err(|e| AudioError::ResamplingError {
                    reason: format!("Resampling failed: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            output.extend_from_slice(&output_chunk[..written]);
        }

        output.truncate(estimated_len);

        debug!(
            input_len = samples.len(),
            output_len = output.len(),
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Resampled audio"
        );

        Ok(output)
    }
}
