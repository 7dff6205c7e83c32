use crate::{AppError, AppResult};

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands sent from the input handler to the main application.
///
/// Rows are 1-based positions in the list as last displayed (the filtered
/// view), resolved to recordings by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Start recording when idle, stop when recording.
    Record,
    /// Start a recording.
    Start,
    /// Stop the current recording.
    Stop,
    /// Play the recording at a row.
    Play {
        /// 1-based row.
        row: usize,
    },
    /// Stop playback.
    Halt,
    /// Delete the recording at a row.
    Delete {
        /// 1-based row.
        row: usize,
    },
    /// Start renaming the recording at a row.
    Edit {
        /// 1-based row.
        row: usize,
    },
    /// Save the rename, with the draft text when no name is given.
    Save {
        /// New name.
        name: Option<String>,
    },
    /// Type into the name field.
    ///
    /// While a rename draft is open this only replaces the draft text, which
    /// `save` then writes. Otherwise, if the naming prompt of a just-stopped
    /// recording is open, that recording is named.
    Name {
        /// Text typed.
        text: String,
    },
    /// Filter the list; empty text clears the filter.
    Search {
        /// Filter text.
        text: String,
    },
    /// Redraw the list.
    List,
    /// Show available commands.
    Help,
    /// Request application shutdown.
    Quit,
}

/// One line per command, shown by `help`.
pub(crate) const HELP: &str = "\
record          start or stop recording
start | stop    start or stop recording explicitly
play <n>        play recording n
halt            stop playback
delete <n>      delete recording n
edit <n>        rename recording n
save [name]     save the rename
name <text>     name the new recording
search [text]   filter by name or timestamp
list            show recordings
help            show this help
quit            exit";

#[track_caller]
fn parse_row(command: &str, arg: &str) -> AppResult<usize> {
    match arg.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(AppError::InvalidCommand {
            reason: format!("`{}` needs a row number, got {:?}", command, arg),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(line: &str) -> AppResult<Self> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let command_lower = command.to_lowercase();
        let parsed = match (command_lower.as_str(), arg.is_empty()) {
            ("record" | "r", true) => AppCommand::Record,
            ("start", true) => AppCommand::Start,
            ("stop", true) => AppCommand::Stop,
            ("play" | "p", false) => AppCommand::Play {
                row: parse_row(command, arg)?,
            },
            ("halt", true) => AppCommand::Halt,
            ("delete" | "rm", false) => AppCommand::Delete {
                row: parse_row(command, arg)?,
            },
            ("edit", false) => AppCommand::Edit {
                row: parse_row(command, arg)?,
            },
            ("save", _) => AppCommand::Save {
                name: (!arg.is_empty()).then(|| arg.to_string()),
            },
            ("name", false) => AppCommand::Name {
                text: arg.to_string(),
            },
            ("search" | "/", _) => AppCommand::Search {
                text: arg.to_string(),
            },
            ("list" | "ls", true) => AppCommand::List,
            ("help" | "?", true) => AppCommand::Help,
            ("quit" | "exit" | "q", true) => AppCommand::Quit,
            _ => {
                return Err(AppError::InvalidCommand {
                    reason: format!("unrecognized command {:?}, type `help`", line),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(parsed)
    }
}
