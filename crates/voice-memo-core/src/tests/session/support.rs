use crate::{
    AudioCapability, AudioError, AudioResult, CaptureHandle, CaptureOptions, Clock, Permission,
    ResourceUri, SessionManager, SoundHandle,
};

use std::panic::Location;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use error_location::ErrorLocation;

/// Timestamp rendered by [`FixedClock`] with the default format.
pub(crate) const FIXED_TIMESTAMP: &str = "3/14/2025, 9:05:07 PM";

/// Capability call as observed by [`ScriptedAudio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    RequestPermission,
    StartCapture(CaptureHandle),
    StopCapture(CaptureHandle),
    LoadSound(ResourceUri, SoundHandle),
    PlaySound(SoundHandle),
    StopSound(SoundHandle),
}

/// In-memory capability that records every call and fails on request.
pub(crate) struct ScriptedAudio {
    pub(crate) permission: Permission,
    pub(crate) fail_start: bool,
    pub(crate) fail_stop: bool,
    pub(crate) fail_load: bool,
    pub(crate) fail_play: bool,
    pub(crate) fail_stop_sound: bool,
    /// URI returned by the next stop instead of a fresh one.
    pub(crate) reuse_uri: Option<ResourceUri>,
    /// Sounds reported as played through.
    pub(crate) finished: Vec<SoundHandle>,
    pub(crate) calls: Vec<Call>,
    takes: usize,
}

impl ScriptedAudio {
    pub(crate) fn new() -> Self {
        Self {
            permission: Permission::Granted,
            fail_start: false,
            fail_stop: false,
            fail_load: false,
            fail_play: false,
            fail_stop_sound: false,
            reuse_uri: None,
            finished: Vec::new(),
            calls: Vec::new(),
            takes: 0,
        }
    }

    /// Sound handle loaded for `uri` most recently.
    pub(crate) fn sound_for(&self, uri: &ResourceUri) -> Option<SoundHandle> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::LoadSound(loaded, sound) if loaded == uri => Some(*sound),
            _ => None,
        })
    }

    #[track_caller]
    fn failure(reason: &str) -> AudioError {
        AudioError::DeviceError {
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

#[async_trait(?Send)]
impl AudioCapability for ScriptedAudio {
    async fn request_permission(&mut self) -> AudioResult<Permission> {
        self.calls.push(Call::RequestPermission);
        Ok(self.permission)
    }

    async fn start_capture(&mut self, _options: &CaptureOptions) -> AudioResult<CaptureHandle> {
        if self.fail_start {
            return Err(Self::failure("microphone busy"));
        }
        let handle = CaptureHandle::new();
        self.calls.push(Call::StartCapture(handle));
        Ok(handle)
    }

    async fn stop_capture(&mut self, handle: &CaptureHandle) -> AudioResult<ResourceUri> {
        self.calls.push(Call::StopCapture(*handle));
        if self.fail_stop {
            return Err(Self::failure("encoder crashed"));
        }
        if let Some(uri) = self.reuse_uri.clone() {
            return Ok(uri);
        }
        self.takes += 1;
        Ok(ResourceUri::new(format!("file:///takes/take-{}.wav", self.takes)))
    }

    async fn load_sound(&mut self, uri: &ResourceUri) -> AudioResult<SoundHandle> {
        if self.fail_load {
            return Err(Self::failure("unsupported format"));
        }
        let sound = SoundHandle::new();
        self.calls.push(Call::LoadSound(uri.clone(), sound));
        Ok(sound)
    }

    async fn play_sound(&mut self, sound: &SoundHandle) -> AudioResult<()> {
        self.calls.push(Call::PlaySound(*sound));
        if self.fail_play {
            return Err(Self::failure("output busy"));
        }
        Ok(())
    }

    async fn stop_sound(&mut self, sound: &SoundHandle) -> AudioResult<()> {
        self.calls.push(Call::StopSound(*sound));
        if self.fail_stop_sound {
            return Err(Self::failure("already released"));
        }
        Ok(())
    }

    fn is_sound_finished(&self, sound: &SoundHandle) -> bool {
        self.finished.contains(sound)
    }
}

/// Clock frozen at 2025-03-14 21:05:07 local time.
pub(crate) struct FixedClock(DateTime<Local>);

impl FixedClock {
    #[allow(clippy::unwrap_used)]
    pub(crate) fn new() -> Self {
        Self(Local.with_ymd_and_hms(2025, 3, 14, 21, 5, 7).earliest().unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Session over a [`ScriptedAudio`] with a frozen clock.
pub(crate) fn session_with(audio: ScriptedAudio) -> SessionManager<ScriptedAudio> {
    SessionManager::new(audio).with_clock(FixedClock::new())
}

pub(crate) fn session() -> SessionManager<ScriptedAudio> {
    session_with(ScriptedAudio::new())
}

/// Capture and stop `count` takes, returning their URIs in order.
#[allow(clippy::unwrap_used)]
pub(crate) async fn record_takes(
    session: &mut SessionManager<ScriptedAudio>,
    count: usize,
) -> Vec<ResourceUri> {
    let mut uris = Vec::with_capacity(count);
    for _ in 0..count {
        session.request_start_capture().await.unwrap();
        uris.push(session.request_stop_capture().await.unwrap().uri);
    }
    uris
}
