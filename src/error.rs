use std::path::PathBuf;
use thiserror::Error;

/// Backend HTTP errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Camera, microphone and recorder errors
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("No capture device satisfies the request")]
    NotFound,

    #[error("Camera stream is not active or not ready")]
    NotReady,

    #[error("No supported recording format (tried: {0})")]
    UnsupportedFormat(String),

    #[error("Frame encoding failed: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("Device error: {0}")]
    Other(String),
}

/// Speech synthesis / recognition errors
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech recognition is not supported on this platform")]
    Unsupported,

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Speech recognition failed: {0}")]
    Recognition(String),

    #[error("Microphone error: {0}")]
    Microphone(String),
}

/// File attachment errors
#[derive(Debug, Error)]
pub enum AttachError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty", path.display())]
    Empty { path: PathBuf },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
