//! Speech capability traits: synthesis, recognition and microphone clips

use crate::error::SpeechError;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub(crate) trait SpeechSynthesizer: Send + Sync {
    /// Speak `text` and resolve once playback has finished
    async fn speak(&self, text: &str, locale: &str) -> Result<(), SpeechError>;
}

#[async_trait]
pub(crate) trait SpeechRecognizer: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Listen for one utterance; `None` if recognition ended without a result
    async fn recognize(&self, locale: &str) -> Result<Option<String>, SpeechError>;
}

#[async_trait]
pub(crate) trait Microphone: Send + Sync {
    /// Record a fixed-length clip, ready for upload
    async fn record_clip(&self, duration: Duration) -> Result<AudioClip, SpeechError>;
}

/// An encoded audio recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AudioClip {
    pub(crate) bytes: Vec<u8>,
    pub(crate) mime: &'static str,
    pub(crate) file_name: &'static str,
}

impl AudioClip {
    /// A WAV clip under the upload file name the backend expects
    pub(crate) fn wav(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "audio/wav",
            file_name: "respuesta.wav",
        }
    }
}
