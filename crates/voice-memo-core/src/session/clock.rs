use chrono::{
    DateTime, Local,
    format::{Item, StrftimeItems},
};

/// Default display format, e.g. `3/14/2025, 9:05:07 PM`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Source of the wall-clock time stamped on finished takes.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;
}

/// [`Clock`] reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A validated strftime pattern for recording timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat(String);

impl TimestampFormat {
    /// Validate `pattern`. Returns `None` if chrono cannot render it.
    pub fn new(pattern: impl Into<String>) -> Option<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return None;
        }
        Some(Self(pattern))
    }

    /// Render `time` with this pattern.
    pub fn format(&self, time: &DateTime<Local>) -> String {
        time.format(&self.0).to_string()
    }

    /// The raw pattern.
    pub fn pattern(&self) -> &str {
        &self.0
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self(DEFAULT_TIMESTAMP_FORMAT.to_string())
    }
}
