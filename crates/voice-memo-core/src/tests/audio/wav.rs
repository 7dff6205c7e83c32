use crate::{
    AudioError,
    audio::{read_wav, write_wav},
};

/// WHAT: A stored take reads back at its rate with the same length
/// WHY: Playback depends on the file written when the capture stopped
#[test]
#[allow(clippy::unwrap_used)]
fn given_written_take_when_reading_then_rate_and_length_preserved() {
    // Given: A short ramp written as a 16kHz WAV
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("take.wav");
    let samples: Vec<f32> = (0..1600).map(|i| i as f32 / 1600.0 - 0.5).collect();
    write_wav(&path, &samples, 16_000).unwrap();

    // When: Reading it back
    let decoded = read_wav(&path).unwrap();

    // Then: Same rate, same length, values within 16-bit quantization
    assert_eq!(decoded.sample_rate, 16_000);
    assert_eq!(decoded.samples.len(), samples.len());
    assert!(
        decoded
            .samples
            .iter()
            .zip(&samples)
            .all(|(a, b)| (a - b).abs() < 1e-3)
    );
}

/// WHAT: Stereo files are downmixed on read
/// WHY: Files not written by this recorder may still be played
#[test]
#[allow(clippy::unwrap_used)]
fn given_stereo_wav_when_reading_then_downmixed_to_mono() {
    // Given: A stereo float WAV with opposite channels
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stereo.wav");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 8_000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..10 {
        writer.write_sample(0.5f32).unwrap();
        writer.write_sample(-0.5f32).unwrap();
    }
    writer.finalize().unwrap();

    // When: Reading
    let decoded = read_wav(&path).unwrap();

    // Then: One silent mono sample per frame
    assert_eq!(decoded.samples.len(), 10);
    assert!(decoded.samples.iter().all(|s| s.abs() < f32::EPSILON));
}

/// WHAT: Out-of-range and NaN samples are clamped when writing
/// WHY: Device glitches must not corrupt the stored file
#[test]
#[allow(clippy::unwrap_used)]
fn given_out_of_range_samples_when_writing_then_clamped() {
    // Given: A temp file path
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loud.wav");

    // When: Writing samples past full scale and a NaN
    write_wav(&path, &[2.0, -3.0, f32::NAN], 16_000).unwrap();
    let decoded = read_wav(&path).unwrap();

    // Then: Values clamp to full scale and NaN becomes silence
    assert!(decoded.samples[0] > 0.99);
    assert!(decoded.samples[1] < -0.99);
    assert!(decoded.samples[2].abs() < f32::EPSILON);
}

/// WHAT: An empty take is not written
/// WHY: A zero-length file would fail later at playback
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_samples_when_writing_then_no_audio_captured() {
    // Given: A temp file path
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.wav");

    // When: Writing no samples
    let result = write_wav(&path, &[], 16_000);

    // Then: NoAudioCaptured and no file
    assert!(matches!(result, Err(AudioError::NoAudioCaptured { .. })));
    assert!(!path.exists());
}

/// WHAT: A file that is not a WAV fails with a decoding error
/// WHY: Malformed resources are a reported, non-fatal failure
#[test]
#[allow(clippy::unwrap_used)]
fn given_non_wav_file_when_reading_then_decoding_error() {
    // Given: A text file
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"not audio").unwrap();

    // When: Reading it as WAV
    let result = read_wav(&path);

    // Then: DecodingError
    assert!(matches!(result, Err(AudioError::DecodingError { .. })));
}
