//! Voice Memo Core Library
//!
//! Recording session management for a single-screen voice memo recorder:
//! capture takes from the microphone, list and search them, rename, play
//! back, and delete. Audio hardware sits behind [`AudioCapability`];
//! [`CpalAudio`] is the cpal implementation.
//!
//! # Example
//!
//! ```no_run
//! use voice_memo_core::{CpalAudio, SessionManager, SessionResult};
//!
//! async fn take_note() -> SessionResult<()> {
//!     let mut session = SessionManager::new(CpalAudio::new("recordings"));
//!
//!     session.request_start_capture().await?;
//!     let recording = session.request_stop_capture().await?;
//!     session.submit_completed_name("Groceries")?;
//!     session.play(&recording.uri).await?;
//!     Ok(())
//! }
//! ```

mod audio;
mod error;
mod recording;
mod session;

pub use {
    audio::{
        AudioCapability, CaptureHandle, CaptureOptions, CapturePreset, CpalAudio, Permission,
        ResourceUri, SoundHandle,
    },
    error::{AudioError, Result as AudioResult, SessionError, SessionResult},
    recording::{DEFAULT_RECORDING_NAME, Recording, filter_recordings},
    session::{
        CaptureStatus, Clock, DEFAULT_TIMESTAMP_FORMAT, EditDraft, Notice, NoticeLevel,
        PlaybackStatus, SessionIntent, SessionManager, SessionState, SystemClock, TimestampFormat,
    },
};
