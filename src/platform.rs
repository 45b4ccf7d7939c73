//! Capability providers the controller runs against

use crate::media::MediaDevices;
use crate::speech::{Microphone, SpeechRecognizer, SpeechSynthesizer};

/// Device family, used to pick platform workarounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlatformFamily {
    /// iPhone, iPad, iPod
    AppleMobile,
    Other,
}

const APPLE_MOBILE_MARKERS: [&str; 3] = ["iPad", "iPhone", "iPod"];

impl PlatformFamily {
    /// Classify a browser-style user agent string
    pub(crate) fn from_user_agent(user_agent: &str) -> Self {
        if APPLE_MOBILE_MARKERS
            .iter()
            .any(|marker| user_agent.contains(marker))
        {
            PlatformFamily::AppleMobile
        } else {
            PlatformFamily::Other
        }
    }

    /// Family of the machine this binary runs on
    pub(crate) fn current() -> Self {
        if cfg!(target_os = "ios") {
            PlatformFamily::AppleMobile
        } else {
            PlatformFamily::Other
        }
    }

    pub(crate) fn is_apple_mobile(&self) -> bool {
        matches!(self, PlatformFamily::AppleMobile)
    }
}

/// Everything the controller needs from the device
pub(crate) struct Platform {
    pub(crate) family: PlatformFamily,
    pub(crate) synthesizer: Box<dyn SpeechSynthesizer>,
    pub(crate) recognizer: Box<dyn SpeechRecognizer>,
    pub(crate) microphone: Box<dyn Microphone>,
    pub(crate) devices: Box<dyn MediaDevices>,
}
