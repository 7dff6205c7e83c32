//! Terminal input handler.
//!
//! Reads commands from stdin line by line and forwards them to the main
//! application over an async channel.

use crate::{AppCommand, AppError, AppResult};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards parsed stdin lines to the app.
pub struct InputHandler {
    command_tx: mpsc::Sender<AppCommand>,
}

impl InputHandler {
    /// Create a handler sending on `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the input loop until shutdown or end of input.
    ///
    /// End of input is treated as `quit`.
    #[instrument(skip(self))]
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<std::io::Result<String>>(32);

        // stdin has only a blocking reader, so one blocking task forwards
        // lines. It exits on EOF or when line_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Input handler shutting down");
                    break;
                }
                line = line_rx.recv() => match line {
                    Some(line) => {
                        if !self.handle_line(&line?).await? {
                            break;
                        }
                    }
                    None => {
                        info!("End of input");
                        self.send(AppCommand::Quit).await?;
                        break;
                    }
                }
            }
        }

        drop(line_rx);

        // The reader may be parked in a read that never returns; the runtime
        // is shut down with a timeout for the same reason.
        match tokio::time::timeout(Duration::from_millis(200), handle).await {
            Ok(Ok(())) => debug!("Stdin forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Stdin forwarder task panicked"),
            Err(_) => debug!("Stdin forwarder still blocked on read, will be cleaned up on exit"),
        }

        Ok(())
    }

    /// Parse and forward one line. Returns `false` once `quit` was sent.
    ///
    /// Unparseable lines are reported to the user and dropped.
    #[instrument(skip(self))]
    pub(crate) async fn handle_line(&self, line: &str) -> AppResult<bool> {
        if line.trim().is_empty() {
            return Ok(true);
        }

        match line.parse::<AppCommand>() {
            Ok(command) => {
                let keep_reading = command != AppCommand::Quit;
                self.send(command).await?;
                Ok(keep_reading)
            }
            Err(AppError::InvalidCommand { reason, .. }) => {
                debug!(reason = %reason, "Ignoring invalid command");
                println!("[warning] {}", reason);
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", e.0, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
