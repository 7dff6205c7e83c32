use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Audio capability errors with source location tracking.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No audio input device found.
    #[error("No microphone found {location}")]
    NoMicrophoneFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio output device found.
    #[error("No output device found {location}")]
    NoOutputDevice {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio resampling failed.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing a captured take to disk failed.
    #[error("Encoding error: {reason} {location}")]
    EncodingError {
        /// Description of the encoding error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A resource could not be read back as audio.
    #[error("Failed to decode {uri}: {reason} {location}")]
    DecodingError {
        /// Resource that failed to decode.
        uri: String,
        /// Description of the decoding error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A capture or sound handle is not known to the capability.
    #[error("Unknown {kind} handle {id} {location}")]
    UnknownHandle {
        /// Handle kind ("capture" or "sound").
        kind: &'static str,
        /// Handle identifier.
        id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio data captured.
    #[error("No audio captured {location}")]
    NoAudioCaptured {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`AudioError`].
pub type Result<T> = std::result::Result<T, AudioError>;

/// Recording session errors.
///
/// Every variant is recoverable. [`SessionManager::dispatch`] turns them into
/// user-facing notices instead of propagating them.
///
/// [`SessionManager::dispatch`]: crate::SessionManager::dispatch
#[derive(Error, Debug)]
pub enum SessionError {
    /// The user declined microphone access.
    #[error("Microphone permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The audio capability failed to capture, load or play.
    #[error("Audio capability failed: {source} {location}")]
    Capability {
        /// The underlying capability error.
        #[source]
        source: AudioError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An operation was invoked in a state that does not allow it.
    #[error("Cannot {operation}: {reason} {location}")]
    PreconditionViolation {
        /// Operation that was rejected.
        operation: &'static str,
        /// Why the current state rejects it.
        reason: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No recording with this resource URI exists.
    #[error("Recording not found: {uri} {location}")]
    RecordingNotFound {
        /// Resource URI that was looked up.
        uri: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A rename was saved without starting one.
    #[error("No recording is being edited {location}")]
    NoActiveEdit {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A name was submitted with no freshly completed recording to apply it to.
    #[error("No completed recording awaiting a name {location}")]
    NoCompletedRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capability returned a resource URI that is already in the list.
    #[error("Duplicate recording resource: {uri} {location}")]
    DuplicateRecording {
        /// Resource URI that collided.
        uri: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

// Manual From<AudioError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<AudioError> for SessionError {
    #[track_caller]
    fn from(source: AudioError) -> Self {
        SessionError::Capability {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`SessionError`].
pub type SessionResult<T> = std::result::Result<T, SessionError>;
