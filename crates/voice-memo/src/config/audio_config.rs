use crate::config::{DEFAULT_MAX_DURATION_SECS, default_max_duration_secs};

use serde::{Deserialize, Serialize};
use voice_memo_core::CapturePreset;

/// Capture configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Quality preset for new takes.
    #[serde(default)]
    pub preset: CapturePreset,

    /// Longest take in seconds; audio beyond this is dropped.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            preset: CapturePreset::default(),
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}
