use crate::{AppCommand, AppResult, app_command::HELP, view};

use voice_memo_core::{
    AudioCapability, Notice, NoticeLevel, ResourceUri, SessionIntent, SessionManager,
};

use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};

/// Main application state.
///
/// Owns the session and runs on the async runtime thread; the session is not
/// `Send`, so all commands arrive through `command_rx`.
pub struct App<C: AudioCapability> {
    pub(crate) session: SessionManager<C>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl<C: AudioCapability> App<C> {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Voice-Memo starting");
        println!("{}", self.render());

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    match self.handle_command(cmd).await {
                        Some(output) => println!("{}", output),
                        None => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                else => {
                    info!("Command channel closed, shutting down");
                    break;
                }
            }
        }

        self.shutdown_session().await;
        let _ = self.shutdown_tx.send(true);
        info!("Voice-Memo shut down");

        Ok(())
    }

    /// Apply one command and return what to print, or `None` to quit.
    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&mut self, cmd: AppCommand) -> Option<String> {
        self.session.refresh_playback().await;

        let notice = match cmd {
            AppCommand::Quit => return None,
            AppCommand::Help => return Some(HELP.to_string()),
            AppCommand::List => None,
            AppCommand::Record => self.session.dispatch(SessionIntent::ToggleCapture).await,
            AppCommand::Start => self.session.dispatch(SessionIntent::StartCapture).await,
            AppCommand::Stop => self.session.dispatch(SessionIntent::StopCapture).await,
            AppCommand::Halt => self.session.dispatch(SessionIntent::StopPlayback).await,
            AppCommand::Play { row } => match self.resolve_row(row) {
                Ok(uri) => self.session.dispatch(SessionIntent::Play { uri }).await,
                Err(notice) => Some(notice),
            },
            AppCommand::Delete { row } => match self.resolve_row(row) {
                Ok(uri) => self.session.dispatch(SessionIntent::Delete { uri }).await,
                Err(notice) => Some(notice),
            },
            AppCommand::Edit { row } => match self.resolve_row(row) {
                Ok(uri) => self.session.dispatch(SessionIntent::BeginEdit { uri }).await,
                Err(notice) => Some(notice),
            },
            AppCommand::Save { name } => {
                let name = name.unwrap_or_else(|| self.session.state().name_field().to_string());
                self.session.dispatch(SessionIntent::SaveEdit { name }).await
            }
            AppCommand::Name { text } => {
                let notice = self
                    .session
                    .dispatch(SessionIntent::SetNameField { text: text.clone() })
                    .await;
                let state = self.session.state();
                if notice.is_none()
                    && state.edit_draft().is_none()
                    && state.just_completed().is_some()
                {
                    self.session
                        .dispatch(SessionIntent::SubmitCompletedName { name: text })
                        .await
                } else {
                    notice
                }
            }
            AppCommand::Search { text } => {
                self.session
                    .dispatch(SessionIntent::SetSearchText { text })
                    .await
            }
        };

        let view = self.render();
        Some(match notice {
            Some(notice) => format!("{}\n{}", notice, view),
            None => view,
        })
    }

    /// Recording at 1-based `row` of the filtered view.
    fn resolve_row(&self, row: usize) -> Result<ResourceUri, Notice> {
        row.checked_sub(1)
            .and_then(|index| self.session.filtered_view().get(index).map(|r| r.uri.clone()))
            .ok_or_else(|| {
                warn!(row, "No recording at row");
                Notice {
                    level: NoticeLevel::Warning,
                    message: format!("No recording at row {}", row),
                }
            })
    }

    fn render(&self) -> String {
        view::render(self.session.state(), &self.session.filtered_view())
    }

    /// Keep an in-progress take and silence playback before exit.
    ///
    /// Failures are logged; shutdown always runs to the end.
    #[instrument(skip(self))]
    pub(crate) async fn shutdown_session(&mut self) {
        if self.session.state().is_capturing() {
            match self.session.request_stop_capture().await {
                Ok(recording) => info!(uri = %recording.uri, "Saved in-progress recording on exit"),
                Err(e) => error!(error = ?e, "Failed to save in-progress recording on exit"),
            }
        }

        if let Err(e) = self.session.stop_playback().await {
            error!(error = ?e, "Failed to stop playback on exit");
        }
    }
}
