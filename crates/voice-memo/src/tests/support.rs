use crate::{App, AppCommand};

use std::panic::Location;

use async_trait::async_trait;
use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use voice_memo_core::{
    AudioCapability, AudioError, AudioResult, CaptureHandle, CaptureOptions, Permission,
    ResourceUri, SessionManager, SoundHandle,
};

/// Capability that numbers its takes and fails only on request.
#[derive(Default)]
pub(crate) struct FakeAudio {
    /// Stops fail as if nothing was captured once this many takes exist.
    pub(crate) fail_stop_after: Option<usize>,
    /// Every started sound reports it has played through.
    pub(crate) finished: bool,
    pub(crate) stopped_sounds: Vec<SoundHandle>,
    pub(crate) takes: usize,
}

#[async_trait(?Send)]
impl AudioCapability for FakeAudio {
    async fn request_permission(&mut self) -> AudioResult<Permission> {
        Ok(Permission::Granted)
    }

    async fn start_capture(&mut self, _options: &CaptureOptions) -> AudioResult<CaptureHandle> {
        Ok(CaptureHandle::new())
    }

    async fn stop_capture(&mut self, _handle: &CaptureHandle) -> AudioResult<ResourceUri> {
        if self.fail_stop_after.is_some_and(|limit| self.takes >= limit) {
            return Err(AudioError::NoAudioCaptured {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.takes += 1;
        Ok(ResourceUri::new(format!("file:///takes/take-{}.wav", self.takes)))
    }

    async fn load_sound(&mut self, _uri: &ResourceUri) -> AudioResult<SoundHandle> {
        Ok(SoundHandle::new())
    }

    async fn play_sound(&mut self, _sound: &SoundHandle) -> AudioResult<()> {
        Ok(())
    }

    async fn stop_sound(&mut self, sound: &SoundHandle) -> AudioResult<()> {
        self.stopped_sounds.push(*sound);
        Ok(())
    }

    fn is_sound_finished(&self, _sound: &SoundHandle) -> bool {
        self.finished
    }
}

pub(crate) struct TestApp {
    pub(crate) app: App<FakeAudio>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) shutdown_rx: watch::Receiver<bool>,
}

pub(crate) fn test_app() -> TestApp {
    test_app_with(FakeAudio::default())
}

pub(crate) fn test_app_with(audio: FakeAudio) -> TestApp {
    let (command_tx, command_rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    TestApp {
        app: App {
            session: SessionManager::new(audio),
            command_rx,
            shutdown_tx,
        },
        command_tx,
        shutdown_rx,
    }
}

/// Record `count` takes through the command path, leaving each unnamed.
pub(crate) async fn record_takes(app: &mut App<FakeAudio>, count: usize) {
    for _ in 0..count {
        app.handle_command(AppCommand::Record).await;
        app.handle_command(AppCommand::Record).await;
    }
}
