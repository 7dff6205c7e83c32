// WAV storage for finished takes

use crate::{AudioError, AudioResult};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::{debug, instrument};

/// Mono samples read back from a stored take.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Write mono samples as a 16-bit PCM WAV file.
#[track_caller]
#[instrument(skip(samples), fields(sample_count = samples.len()))]
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> AudioResult<()> {
    if samples.is_empty() {
        return Err(AudioError::NoAudioCaptured {
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let encoding_error = |e: hound::Error| AudioError::EncodingError {
        reason: format!("{}: {}", path.display(), e),
        location: ErrorLocation::from(Location::caller()),
    };

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(encoding_error)?;
    for &sample in samples {
        // NaN maps to silence.
        let clamped = if sample.is_finite() { sample.clamp(-1.0, 1.0) } else { 0.0 };
        writer
            .write_sample((clamped * i16::MAX as f32) as i16)
            .map_err(encoding_error)?;
    }
    writer.finalize().map_err(encoding_error)?;

    debug!(path = ?path, sample_rate, "WAV written");

    Ok(())
}

/// Read a WAV file and downmix it to mono `f32`.
#[track_caller]
#[instrument]
pub fn read_wav(path: &Path) -> AudioResult<DecodedAudio> {
    let decoding_error = |reason: String| AudioError::DecodingError {
        uri: path.display().to_string(),
        reason,
        location: ErrorLocation::from(Location::caller()),
    };

    let reader = WavReader::open(path).map_err(|e| decoding_error(e.to_string()))?;
    let spec = reader.spec();

    if spec.sample_rate == 0 || spec.channels == 0 {
        return Err(decoding_error(format!(
            "invalid header: {} Hz, {} channels",
            spec.sample_rate, spec.channels
        )));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| decoding_error(e.to_string()))?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| decoding_error(e.to_string()))?
        }
    };

    let channels = spec.channels as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    debug!(
        sample_count = samples.len(),
        sample_rate = spec.sample_rate,
        channels,
        "WAV decoded"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}
