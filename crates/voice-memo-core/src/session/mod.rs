mod clock;
mod intent;
mod manager;
mod notice;
mod state;

pub use {
    clock::{Clock, DEFAULT_TIMESTAMP_FORMAT, SystemClock, TimestampFormat},
    intent::SessionIntent,
    manager::SessionManager,
    notice::{Notice, NoticeLevel},
    state::{CaptureStatus, EditDraft, PlaybackStatus, SessionState},
};
