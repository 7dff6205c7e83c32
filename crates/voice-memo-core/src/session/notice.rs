use crate::{AudioError, SessionError};

use std::fmt;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// The user can fix this.
    Warning,
    /// The platform failed.
    Error,
}

/// User-visible message produced at the session boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message without source locations.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{}] {}", label, self.message)
    }
}

fn describe_audio(error: &AudioError) -> String {
    match error {
        AudioError::NoMicrophoneFound { .. } => "No microphone was found".to_string(),
        AudioError::NoOutputDevice { .. } => "No audio output device was found".to_string(),
        AudioError::DeviceError { reason, .. } => format!("Audio device error: {}", reason),
        AudioError::ResamplingError { reason, .. } => format!("Audio conversion failed: {}", reason),
        AudioError::EncodingError { reason, .. } => format!("Could not save the recording: {}", reason),
        AudioError::DecodingError { uri, reason, .. } => {
            format!("Could not read {}: {}", uri, reason)
        }
        AudioError::UnknownHandle { kind, .. } => format!("The {} is no longer available", kind),
        AudioError::NoAudioCaptured { .. } => "No audio was captured".to_string(),
    }
}

impl From<&SessionError> for Notice {
    fn from(error: &SessionError) -> Self {
        let (level, message) = match error {
            SessionError::PermissionDenied { .. } => (
                NoticeLevel::Warning,
                "Permission to access microphone is required!".to_string(),
            ),
            SessionError::Capability { source, .. } => (NoticeLevel::Error, describe_audio(source)),
            SessionError::PreconditionViolation {
                operation, reason, ..
            } => (NoticeLevel::Warning, format!("Cannot {}: {}", operation, reason)),
            SessionError::RecordingNotFound { .. } => (
                NoticeLevel::Warning,
                "That recording no longer exists".to_string(),
            ),
            SessionError::NoActiveEdit { .. } => (
                NoticeLevel::Warning,
                "Choose a recording to rename first".to_string(),
            ),
            SessionError::NoCompletedRecording { .. } => (
                NoticeLevel::Warning,
                "There is no new recording to name".to_string(),
            ),
            SessionError::DuplicateRecording { uri, .. } => (
                NoticeLevel::Error,
                format!("The recorder returned an already listed file: {}", uri),
            ),
        };

        Self { level, message }
    }
}
