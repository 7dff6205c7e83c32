mod audio_config;
#[allow(clippy::module_inception)]
mod config;
mod display_config;
mod storage_config;

pub(crate) use {
    audio_config::AudioConfig, config::Config, display_config::DisplayConfig,
    storage_config::StorageConfig,
};

use voice_memo_core::DEFAULT_TIMESTAMP_FORMAT;

pub(crate) const DEFAULT_MAX_DURATION_SECS: u64 = 600;

pub(crate) fn default_max_duration_secs() -> u64 {
    DEFAULT_MAX_DURATION_SECS
}

pub(crate) fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}
