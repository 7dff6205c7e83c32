use crate::audio::capture::{append_mono, sample_limit};

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// WHAT: Stereo frames are averaged into one mono sample each
/// WHY: Takes are stored mono regardless of the input device layout
#[test]
fn given_stereo_frames_when_appending_then_each_frame_averaged() {
    // Given: Two stereo frames
    let mut buf = Vec::new();
    let data = [0.2f32, 0.4, -1.0, 1.0];

    // When: Appending with a generous limit
    let truncated = append_mono(&mut buf, &data, 2, 100);

    // Then: Two mono samples holding the frame averages
    assert!(!truncated);
    assert_eq!(buf.len(), 2);
    assert!((buf[0] - 0.3).abs() < f32::EPSILON);
    assert!(buf[1].abs() < f32::EPSILON);
}

/// WHAT: Buffer stops growing at the take limit and keeps the oldest audio
/// WHY: A recorder must keep the beginning of a take, not the end
#[test]
fn given_buffer_at_limit_when_appending_then_new_audio_dropped() {
    // Given: A buffer already holding the maximum number of samples
    let limit = 480;
    let mut buf = vec![0.5f32; limit];

    // When: More audio arrives
    let truncated = append_mono(&mut buf, &[1.0f32; 64], 1, limit);

    // Then: Nothing is added and the original samples are intact
    assert!(truncated);
    assert_eq!(buf.len(), limit);
    assert!(buf.iter().all(|&s| (s - 0.5).abs() < f32::EPSILON));
}

/// WHAT: A partially fitting block fills the buffer exactly to the limit
/// WHY: Prevents overshooting the configured take length
#[test]
fn given_buffer_near_limit_when_appending_then_filled_to_limit() {
    // Given: A buffer two samples short of its limit
    let mut buf = vec![0.0f32; 8];

    // When: Appending four mono samples
    let truncated = append_mono(&mut buf, &[1.0f32; 4], 1, 10);

    // Then: Exactly two are kept
    assert!(truncated);
    assert_eq!(buf.len(), 10);
}

/// WHAT: Sample limit scales with rate and duration
/// WHY: The configured max duration must translate to a buffer bound
#[test]
fn given_rate_and_duration_when_computing_limit_then_product_returned() {
    // Given: Rates and durations, including zero
    // When/Then: The limit is rate times seconds
    assert_eq!(sample_limit(48_000, Duration::from_secs(600)), 48_000 * 600);
    assert_eq!(sample_limit(16_000, Duration::from_millis(500)), 8_000);
    assert_eq!(sample_limit(44_100, Duration::ZERO), 0);
}

/// WHAT: Lock poison recovery preserves buffer data
/// WHY: Ensures audio data is never silently lost on mutex poison
#[test]
fn given_poisoned_mutex_when_recovering_then_data_preserved() {
    // Given: A mutex poisoned by a panic while holding the lock
    let buf = Arc::new(Mutex::new(vec![0.5f32; 100]));
    let buf_clone = Arc::clone(&buf);

    let _ = std::thread::spawn(move || {
        let _guard = buf_clone.lock().unwrap_or_else(|e| e.into_inner());
        panic!("intentional panic to poison mutex");
    })
    .join();

    // When: Recovering from poisoned lock and appending
    let mut recovered = buf.lock().unwrap_or_else(|e| e.into_inner());
    append_mono(&mut recovered, &[1.0f32; 10], 1, 200);

    // Then: Original data is preserved and new data appended
    assert_eq!(recovered.len(), 110);
    assert!(recovered[..100].iter().all(|&s| (s - 0.5).abs() < f32::EPSILON));
}
