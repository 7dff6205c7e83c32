//! Voice-Memo: record, play back, rename and search voice memos from the
//! terminal.

mod app;
mod app_command;
mod config;
mod error;
mod input_handler;
mod view;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    input_handler::InputHandler,
};

use crate::config::Config;

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voice_memo_core::{CpalAudio, SessionManager};

const DEFAULT_LOG_FILTER: &str = "voice_memo=info,voice_memo_core=info";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "voice-memo", version, about = "Record and organize voice memos")]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for recordings, overriding the config file.
    #[arg(long, value_name = "PATH")]
    recordings_dir: Option<PathBuf>,
}

/// Application entry point.
fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let timestamp_format = match config.timestamp_format() {
        Ok(f) => f,
        Err(e) => {
            error!("Invalid display settings: {:?}", e);
            std::process::exit(1);
        }
    };

    let capture_options = match config.capture_options() {
        Ok(o) => o,
        Err(e) => {
            error!("Invalid audio settings: {:?}", e);
            std::process::exit(1);
        }
    };

    let recordings_dir = match cli.recordings_dir {
        Some(dir) => dir,
        None => match config.recordings_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("Failed to resolve recordings directory: {:?}", e);
                std::process::exit(1);
            }
        },
    };
    info!(recordings_dir = ?recordings_dir, "Storing recordings");

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // The session holds cpal streams, which are not Send, so it is driven on
    // the runtime's main thread through block_on.
    let session = SessionManager::new(CpalAudio::new(recordings_dir))
        .with_capture_options(capture_options)
        .with_timestamp_format(timestamp_format);

    let failed = rt.block_on(async {
        let input_handler = InputHandler::new(command_tx);
        let app = App {
            session,
            command_rx,
            shutdown_tx,
        };

        let (input_result, app_result) = tokio::join!(input_handler.run(shutdown_rx), app.run());

        if let Err(e) = &input_result {
            error!(error = ?e, "Input handler error");
        }
        if let Err(e) = &app_result {
            error!(error = ?e, "App error");
        }

        app_result.is_err()
    });

    // The stdin reader can stay blocked in a read after shutdown.
    rt.shutdown_timeout(Duration::from_millis(500));

    if failed {
        std::process::exit(1);
    }
}
