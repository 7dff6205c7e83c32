use crate::{CaptureHandle, Recording, ResourceUri, SoundHandle};

use std::time::Instant;

/// Whether the microphone is being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureStatus {
    /// Not capturing.
    #[default]
    Idle,
    /// A take is in progress.
    Capturing {
        /// Capability handle of the take.
        handle: CaptureHandle,
        /// When capture began.
        started_at: Instant,
    },
}

/// Whether a recording is being played back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Nothing is playing.
    #[default]
    Idle,
    /// One sound is playing.
    Playing {
        /// Capability handle of the loaded sound.
        sound: SoundHandle,
        /// Recording the sound was loaded from.
        uri: ResourceUri,
    },
}

/// A rename in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    /// Recording being renamed.
    pub uri: ResourceUri,
}

/// Everything a session knows. Read-only outside the manager.
#[derive(Debug, Default)]
pub struct SessionState {
    pub(crate) recordings: Vec<Recording>,
    pub(crate) capture: CaptureStatus,
    pub(crate) playback: PlaybackStatus,
    pub(crate) edit: Option<EditDraft>,
    pub(crate) name_field: String,
    pub(crate) just_completed: Option<ResourceUri>,
    pub(crate) search_text: String,
}

impl SessionState {
    /// All recordings in the order they were captured.
    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    /// Capture status.
    pub fn capture(&self) -> &CaptureStatus {
        &self.capture
    }

    /// Whether a take is in progress.
    pub fn is_capturing(&self) -> bool {
        matches!(self.capture, CaptureStatus::Capturing { .. })
    }

    /// Playback status.
    pub fn playback(&self) -> &PlaybackStatus {
        &self.playback
    }

    /// Recording currently playing, if any.
    pub fn now_playing(&self) -> Option<&ResourceUri> {
        match &self.playback {
            PlaybackStatus::Playing { uri, .. } => Some(uri),
            PlaybackStatus::Idle => None,
        }
    }

    /// Rename in progress, if any.
    pub fn edit_draft(&self) -> Option<&EditDraft> {
        self.edit.as_ref()
    }

    /// Text of the shared name input.
    pub fn name_field(&self) -> &str {
        &self.name_field
    }

    /// Take waiting to be named right after it was stopped.
    pub fn just_completed(&self) -> Option<&ResourceUri> {
        self.just_completed.as_ref()
    }

    /// Current search filter.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub(crate) fn find(&self, uri: &ResourceUri) -> Option<&Recording> {
        self.recordings.iter().find(|r| r.uri == *uri)
    }

    pub(crate) fn find_mut(&mut self, uri: &ResourceUri) -> Option<&mut Recording> {
        self.recordings.iter_mut().find(|r| r.uri == *uri)
    }
}
