use crate::ResourceUri;

/// User intents forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIntent {
    /// Start a take.
    StartCapture,
    /// Stop the current take.
    StopCapture,
    /// Start when idle, stop when capturing.
    ToggleCapture,
    /// Play a recording, stopping whatever is playing.
    Play {
        /// Recording to play.
        uri: ResourceUri,
    },
    /// Stop playback.
    StopPlayback,
    /// Remove a recording.
    Delete {
        /// Recording to remove.
        uri: ResourceUri,
    },
    /// Open a rename draft for a recording.
    BeginEdit {
        /// Recording to rename.
        uri: ResourceUri,
    },
    /// Save the open rename draft.
    SaveEdit {
        /// New display name.
        name: String,
    },
    /// Update the shared name input.
    SetNameField {
        /// Current input text.
        text: String,
    },
    /// Name the take that was just stopped.
    SubmitCompletedName {
        /// New display name.
        name: String,
    },
    /// Update the search filter.
    SetSearchText {
        /// Current filter text.
        text: String,
    },
}
