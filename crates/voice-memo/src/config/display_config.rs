use crate::config::default_timestamp_format;

use serde::{Deserialize, Serialize};

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// chrono strftime pattern for recording timestamps.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
        }
    }
}
