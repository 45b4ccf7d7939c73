//! How a spoken answer is turned into text

use crate::platform::PlatformFamily;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Transcription path for one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TranscriptionStrategy {
    /// Record a fixed-length clip and upload it to the transcription endpoint
    RecordAndUpload,
    /// Let the platform recognizer listen for a single utterance
    ContinuousRecognition,
}

/// Configured override of the platform-based choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum StrategyOverride {
    #[default]
    Auto,
    RecordAndUpload,
    Continuous,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transcription strategy: {0}")]
pub(crate) struct UnknownStrategy(String);

impl FromStr for StrategyOverride {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(StrategyOverride::Auto),
            "record-and-upload" => Ok(StrategyOverride::RecordAndUpload),
            "continuous" => Ok(StrategyOverride::Continuous),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

impl TranscriptionStrategy {
    /// Apple mobile browsers have no usable continuous recognizer, so they
    /// record and upload; everything else recognizes locally.
    pub(crate) fn select(family: PlatformFamily, strategy: StrategyOverride) -> Self {
        match strategy {
            StrategyOverride::RecordAndUpload => TranscriptionStrategy::RecordAndUpload,
            StrategyOverride::Continuous => TranscriptionStrategy::ContinuousRecognition,
            StrategyOverride::Auto if family.is_apple_mobile() => {
                TranscriptionStrategy::RecordAndUpload
            }
            StrategyOverride::Auto => TranscriptionStrategy::ContinuousRecognition,
        }
    }
}

impl fmt::Display for TranscriptionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptionStrategy::RecordAndUpload => write!(f, "record-and-upload"),
            TranscriptionStrategy::ContinuousRecognition => write!(f, "continuous"),
        }
    }
}
