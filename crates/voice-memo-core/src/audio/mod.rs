mod capability;
pub(crate) mod capture;
mod cpal_audio;
pub(crate) mod playback;
mod resampler;
pub(crate) mod wav;

pub(crate) use {
    capture::AudioCapturer,
    playback::{PlayingSound, SoundOutput},
    resampler::Resampler,
    wav::{read_wav, write_wav},
};

pub use {
    capability::{
        AudioCapability, CaptureHandle, CaptureOptions, CapturePreset, Permission, ResourceUri,
        SoundHandle,
    },
    cpal_audio::CpalAudio,
};
