use crate::{
    AudioCapability, CaptureOptions, DEFAULT_RECORDING_NAME, Permission, Recording, ResourceUri,
    SessionError, SessionResult,
    recording::filter_recordings,
    session::{
        CaptureStatus, Clock, EditDraft, Notice, NoticeLevel, PlaybackStatus, SessionIntent,
        SessionState, SystemClock, TimestampFormat,
    },
};

use std::{panic::Location, time::Instant};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Owns one recording session and mediates every state transition.
///
/// The presentation layer forwards intents (directly or through
/// [`dispatch`](Self::dispatch)) and renders [`state`](Self::state).
///
/// # Concurrency
///
/// Driven from a single task. Each operation awaits its capability calls in
/// order; a playback switch finishes stopping the old sound before the new
/// one is loaded.
pub struct SessionManager<C: AudioCapability> {
    capability: C,
    state: SessionState,
    capture_options: CaptureOptions,
    timestamp_format: TimestampFormat,
    clock: Box<dyn Clock>,
}

impl<C: AudioCapability> SessionManager<C> {
    /// Create an empty session on top of `capability`.
    pub fn new(capability: C) -> Self {
        Self {
            capability,
            state: SessionState::default(),
            capture_options: CaptureOptions::default(),
            timestamp_format: TimestampFormat::default(),
            clock: Box::new(SystemClock),
        }
    }

    /// Options used for every new take.
    pub fn with_capture_options(mut self, options: CaptureOptions) -> Self {
        self.capture_options = options;
        self
    }

    /// Format of the timestamp stamped on finished takes.
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Replace the wall clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The underlying audio capability.
    pub fn capability(&self) -> &C {
        &self.capability
    }

    #[cfg(test)]
    pub(crate) fn capability_mut(&mut self) -> &mut C {
        &mut self.capability
    }

    /// Recordings matching the search text, in insertion order.
    pub fn filtered_view(&self) -> Vec<&Recording> {
        filter_recordings(&self.state.recordings, &self.state.search_text)
    }

    /// Update the search filter.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
    }

    /// Update the shared name input.
    pub fn set_name_field(&mut self, text: impl Into<String>) {
        self.state.name_field = text.into();
    }

    /// Ask for microphone access and start a take.
    ///
    /// # Errors
    ///
    /// - `PreconditionViolation` if a take is already in progress
    /// - `PermissionDenied` if the user declines
    /// - `Capability` if the capture cannot start
    ///
    /// State is unchanged on every error.
    #[instrument(skip(self))]
    pub async fn request_start_capture(&mut self) -> SessionResult<()> {
        if self.state.is_capturing() {
            return Err(SessionError::PreconditionViolation {
                operation: "start recording",
                reason: "a recording is already in progress",
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let location = Location::caller();

        if self.capability.request_permission().await? == Permission::Denied {
            return Err(SessionError::PermissionDenied {
                location: ErrorLocation::from(location),
            });
        }

        let handle = self.capability.start_capture(&self.capture_options).await?;

        self.state.capture = CaptureStatus::Capturing {
            handle,
            started_at: Instant::now(),
        };
        self.state.edit = None;
        self.state.name_field.clear();
        self.state.just_completed = None;

        info!(capture_id = %handle.id(), "Recording started");

        Ok(())
    }

    /// Stop the current take and append it to the list.
    ///
    /// The new recording takes the name field's text, or
    /// [`DEFAULT_RECORDING_NAME`] when it is empty, and becomes the
    /// just-completed take awaiting a name.
    ///
    /// # Errors
    ///
    /// - `PreconditionViolation` if no take is in progress
    /// - `Capability` if the take could not be stored; the session still
    ///   returns to idle because the capture has ended
    /// - `DuplicateRecording` if the capability reused a listed URI
    #[instrument(skip(self))]
    pub async fn request_stop_capture(&mut self) -> SessionResult<Recording> {
        let CaptureStatus::Capturing { handle, started_at } = self.state.capture else {
            return Err(SessionError::PreconditionViolation {
                operation: "stop recording",
                reason: "no recording is in progress",
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let location = Location::caller();
        let result = self.capability.stop_capture(&handle).await;
        self.state.capture = CaptureStatus::Idle;

        let uri = result.map_err(|source| SessionError::Capability {
            source,
            location: ErrorLocation::from(location),
        })?;

        if self.state.find(&uri).is_some() {
            return Err(SessionError::DuplicateRecording {
                uri: uri.to_string(),
                location: ErrorLocation::from(location),
            });
        }

        let name = if self.state.name_field.is_empty() {
            DEFAULT_RECORDING_NAME.to_string()
        } else {
            self.state.name_field.clone()
        };

        let recording = Recording {
            uri: uri.clone(),
            timestamp: self.timestamp_format.format(&self.clock.now()),
            name,
        };

        self.state.recordings.push(recording.clone());
        self.state.just_completed = Some(uri);

        info!(
            uri = %recording.uri,
            duration_ms = started_at.elapsed().as_millis(),
            "Recording stopped"
        );

        Ok(recording)
    }

    /// The single record button: start when idle, stop when capturing.
    #[instrument(skip(self))]
    pub async fn toggle_capture(&mut self) -> SessionResult<()> {
        if self.state.is_capturing() {
            self.request_stop_capture().await.map(|_| ())
        } else {
            self.request_start_capture().await
        }
    }

    /// Play a recording, stopping whatever is playing first.
    ///
    /// # Errors
    ///
    /// - `RecordingNotFound` if `uri` is not listed
    /// - `Capability` if the sound cannot be loaded or played; playback is
    ///   left idle
    #[instrument(skip(self, uri), fields(uri = %uri))]
    pub async fn play(&mut self, uri: &ResourceUri) -> SessionResult<()> {
        if self.state.find(uri).is_none() {
            return Err(SessionError::RecordingNotFound {
                uri: uri.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let location = Location::caller();

        if let PlaybackStatus::Playing { sound, uri: previous } =
            std::mem::take(&mut self.state.playback)
        {
            // Teardown failures do not block the next sound.
            if let Err(e) = self.capability.stop_sound(&sound).await {
                warn!(uri = %previous, error = ?e, "Failed to stop previous sound");
            }
        }

        let sound = self
            .capability
            .load_sound(uri)
            .await
            .map_err(|source| SessionError::Capability {
                source,
                location: ErrorLocation::from(location),
            })?;

        if let Err(source) = self.capability.play_sound(&sound).await {
            if let Err(e) = self.capability.stop_sound(&sound).await {
                debug!(error = ?e, "Failed to release sound after play failure");
            }
            return Err(SessionError::Capability {
                source,
                location: ErrorLocation::from(location),
            });
        }

        self.state.playback = PlaybackStatus::Playing {
            sound,
            uri: uri.clone(),
        };

        info!("Playback started");

        Ok(())
    }

    /// Stop playback. No-op when nothing is playing.
    ///
    /// Playback is idle afterwards even if the capability reports an error.
    #[instrument(skip(self))]
    pub async fn stop_playback(&mut self) -> SessionResult<()> {
        let PlaybackStatus::Playing { sound, uri } = std::mem::take(&mut self.state.playback) else {
            debug!("Nothing playing");
            return Ok(());
        };

        let location = Location::caller();

        self.capability
            .stop_sound(&sound)
            .await
            .map_err(|source| SessionError::Capability {
                source,
                location: ErrorLocation::from(location),
            })?;

        info!(uri = %uri, "Playback stopped");

        Ok(())
    }

    /// Return playback to idle if the playing sound reached its end.
    ///
    /// Returns `true` when a finished sound was released. Release failures
    /// are logged; playback is idle either way.
    #[instrument(skip(self))]
    pub async fn refresh_playback(&mut self) -> bool {
        let finished = match &self.state.playback {
            PlaybackStatus::Playing { sound, .. } => self.capability.is_sound_finished(sound),
            PlaybackStatus::Idle => false,
        };
        if !finished {
            return false;
        }

        if let Err(e) = self.stop_playback().await {
            warn!(error = ?e, "Failed to release finished sound");
        }
        debug!("Playback reached the end");

        true
    }

    /// Remove a recording and return it.
    ///
    /// Stops playback if the recording was playing, and drops any rename
    /// draft or naming prompt that referenced it.
    ///
    /// # Errors
    ///
    /// `RecordingNotFound` if `uri` is not listed, e.g. on a second delete.
    #[instrument(skip(self, uri), fields(uri = %uri))]
    pub async fn delete(&mut self, uri: &ResourceUri) -> SessionResult<Recording> {
        let Some(index) = self.state.recordings.iter().position(|r| r.uri == *uri) else {
            return Err(SessionError::RecordingNotFound {
                uri: uri.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let removed = self.state.recordings.remove(index);

        if self.state.now_playing() == Some(uri) {
            if let Err(e) = self.stop_playback().await {
                warn!(error = ?e, "Failed to stop playback of deleted recording");
            }
        }
        if self.state.edit.as_ref().is_some_and(|d| d.uri == *uri) {
            self.state.edit = None;
            self.state.name_field.clear();
        }
        if self.state.just_completed.as_ref() == Some(uri) {
            self.state.just_completed = None;
        }

        info!(name = %removed.name, "Recording deleted");

        Ok(removed)
    }

    /// Open a rename draft, seeding the name field with the current name.
    ///
    /// # Errors
    ///
    /// `RecordingNotFound` if `uri` is not listed.
    #[track_caller]
    #[instrument(skip(self, uri), fields(uri = %uri))]
    pub fn begin_edit(&mut self, uri: &ResourceUri) -> SessionResult<()> {
        let Some(recording) = self.state.find(uri) else {
            return Err(SessionError::RecordingNotFound {
                uri: uri.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        self.state.name_field = recording.name.clone();
        self.state.edit = Some(EditDraft { uri: uri.clone() });

        debug!("Rename draft opened");

        Ok(())
    }

    /// Write `new_name` onto the drafted recording and close the draft.
    ///
    /// # Errors
    ///
    /// - `NoActiveEdit` if no draft is open
    /// - `RecordingNotFound` if the drafted recording disappeared
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_edit(&mut self, new_name: &str) -> SessionResult<()> {
        let Some(draft) = self.state.edit.take() else {
            return Err(SessionError::NoActiveEdit {
                location: ErrorLocation::from(Location::caller()),
            });
        };
        self.state.name_field.clear();

        let recording =
            self.state
                .find_mut(&draft.uri)
                .ok_or_else(|| SessionError::RecordingNotFound {
                    uri: draft.uri.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        recording.name = new_name.to_string();

        info!(uri = %draft.uri, "Recording renamed");

        Ok(())
    }

    /// Name the take that was just stopped and close its prompt.
    ///
    /// # Errors
    ///
    /// - `NoCompletedRecording` if no prompt is open
    /// - `RecordingNotFound` if the take disappeared
    #[track_caller]
    #[instrument(skip(self))]
    pub fn submit_completed_name(&mut self, name: &str) -> SessionResult<()> {
        let Some(uri) = self.state.just_completed.take() else {
            return Err(SessionError::NoCompletedRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let recording =
            self.state
                .find_mut(&uri)
                .ok_or_else(|| SessionError::RecordingNotFound {
                    uri: uri.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        recording.name = name.to_string();

        info!(uri = %uri, "New recording named");

        Ok(())
    }

    /// Apply an intent, turning any failure into a notice.
    ///
    /// Nothing propagates past this point: every error is logged at a level
    /// matching its kind and returned as a [`Notice`].
    #[instrument(skip(self))]
    pub async fn dispatch(&mut self, intent: SessionIntent) -> Option<Notice> {
        let result = match intent {
            SessionIntent::StartCapture => self.request_start_capture().await,
            SessionIntent::StopCapture => self.request_stop_capture().await.map(|_| ()),
            SessionIntent::ToggleCapture => self.toggle_capture().await,
            SessionIntent::Play { uri } => self.play(&uri).await,
            SessionIntent::StopPlayback => self.stop_playback().await,
            SessionIntent::Delete { uri } => self.delete(&uri).await.map(|_| ()),
            SessionIntent::BeginEdit { uri } => self.begin_edit(&uri),
            SessionIntent::SaveEdit { name } => self.save_edit(&name),
            SessionIntent::SetNameField { text } => {
                self.set_name_field(text);
                Ok(())
            }
            SessionIntent::SubmitCompletedName { name } => self.submit_completed_name(&name),
            SessionIntent::SetSearchText { text } => {
                self.set_search_text(text);
                Ok(())
            }
        };

        let error = result.err()?;
        let notice = Notice::from(&error);

        match notice.level {
            NoticeLevel::Error => error!(error = ?error, "Session operation failed"),
            NoticeLevel::Warning | NoticeLevel::Info => {
                warn!(error = ?error, "Session operation rejected")
            }
        }

        Some(notice)
    }
}
