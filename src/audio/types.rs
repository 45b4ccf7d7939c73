//! Audio types and error definitions

/// Mono PCM captured from the input device, at the device's rate
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedAudio {
    /// PCM 16-bit signed samples (mono)
    pub(crate) samples: Vec<i16>,
    /// Sample rate in Hz
    pub(crate) sample_rate: u32,
}

impl CapturedAudio {
    pub(crate) fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Errors that can occur during audio capture
#[derive(Debug, thiserror::Error)]
pub(crate) enum AudioCaptureError {
    #[error("No audio input device found")]
    NoInputDevice,

    #[error("No supported audio configuration found")]
    NoSupportedConfig,

    #[error("Audio configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio stream error: {0}")]
    StreamError(#[from] cpal::BuildStreamError),

    #[error("Audio play error: {0}")]
    PlayError(#[from] cpal::PlayStreamError),

    #[error("Resampling error: {0}")]
    Resample(String),

    #[error("Capture thread error: {0}")]
    Thread(String),
}
