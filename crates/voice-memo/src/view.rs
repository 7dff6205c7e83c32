//! Plain-text rendering of the session for the terminal.

use std::fmt::Write;

use voice_memo_core::{CaptureStatus, Recording, SessionState};

/// Status line, prompts and the numbered filtered list.
pub(crate) fn render(state: &SessionState, view: &[&Recording]) -> String {
    let mut out = String::new();

    let capture = match state.capture() {
        CaptureStatus::Idle => "idle".to_string(),
        CaptureStatus::Capturing { started_at, .. } => {
            format!("recording ({}s)", started_at.elapsed().as_secs())
        }
    };
    let _ = write!(out, "-- {} --", capture);
    if !state.search_text().is_empty() {
        let _ = write!(out, " search: {:?}", state.search_text());
    }
    out.push('\n');

    if view.is_empty() {
        let message = if state.recordings().is_empty() {
            "no recordings yet, type `record`"
        } else {
            "no recordings match"
        };
        let _ = writeln!(out, "   ({})", message);
    }

    for (index, recording) in view.iter().enumerate() {
        let marker = if state.now_playing() == Some(&recording.uri) {
            " >"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:>3}. {}  {}{}",
            index + 1,
            recording.name,
            recording.timestamp,
            marker
        );
    }

    if let Some(draft) = state.edit_draft() {
        let current = state
            .recordings()
            .iter()
            .find(|r| r.uri == draft.uri)
            .map_or(draft.uri.as_str(), |r| r.name.as_str());
        let _ = writeln!(
            out,
            "renaming {:?}: `save <name>` (draft: {:?})",
            current,
            state.name_field()
        );
    } else if state.just_completed().is_some() {
        let _ = writeln!(out, "name the new recording: `name <text>`");
    }

    out
}
