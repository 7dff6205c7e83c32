use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where finished takes are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Recordings directory (None = platform data dir).
    #[serde(default)]
    pub recordings_dir: Option<PathBuf>,
}
