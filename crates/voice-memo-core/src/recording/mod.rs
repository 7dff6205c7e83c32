use crate::ResourceUri;

/// Name given to a take when none was entered before it was stopped.
pub const DEFAULT_RECORDING_NAME: &str = "Untitled";

/// A finished take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    /// Where the take is stored. Unique within a session.
    pub uri: ResourceUri,
    /// Wall-clock time the take was stopped, already formatted for display.
    pub timestamp: String,
    /// Display name.
    pub name: String,
}

impl Recording {
    /// Whether this recording's name or timestamp contains `query`,
    /// ignoring case. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.timestamp.to_lowercase().contains(&needle)
    }
}

/// Recordings matching `query`, in their original order.
pub fn filter_recordings<'a>(recordings: &'a [Recording], query: &str) -> Vec<&'a Recording> {
    recordings.iter().filter(|r| r.matches(query)).collect()
}
