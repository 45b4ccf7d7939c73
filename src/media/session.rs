//! Live capture session and its constraints

use super::devices::MediaStream;
use serde::Deserialize;
use std::fmt;
use tracing::info;

/// Which physical camera a session is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FacingMode {
    /// Rear camera
    #[default]
    Environment,
    /// Front camera
    User,
}

impl FacingMode {
    pub(crate) fn flipped(self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacingMode::Environment => write!(f, "environment"),
            FacingMode::User => write!(f, "user"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VideoConstraint {
    /// Any camera the platform picks
    Any,
    /// Exactly this facing mode, or fail
    Exact(FacingMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StreamConstraints {
    pub(crate) video: VideoConstraint,
    pub(crate) audio: bool,
}

impl StreamConstraints {
    pub(crate) fn exact(facing: FacingMode) -> Self {
        Self {
            video: VideoConstraint::Exact(facing),
            audio: true,
        }
    }

    /// Fallback request without the facing-mode requirement
    pub(crate) fn relaxed() -> Self {
        Self {
            video: VideoConstraint::Any,
            audio: true,
        }
    }
}

/// The one live stream; its tracks are stopped when the session is dropped
pub(crate) struct CaptureSession {
    stream: Box<dyn MediaStream>,
    facing: FacingMode,
    /// Acquired through the relaxed fallback request
    relaxed: bool,
}

impl CaptureSession {
    pub(crate) fn new(stream: Box<dyn MediaStream>, facing: FacingMode, relaxed: bool) -> Self {
        Self {
            stream,
            facing,
            relaxed,
        }
    }

    pub(crate) fn stream(&self) -> &dyn MediaStream {
        self.stream.as_ref()
    }

    pub(crate) fn facing(&self) -> FacingMode {
        self.facing
    }

    pub(crate) fn is_relaxed(&self) -> bool {
        self.relaxed
    }

    /// Live and delivering frames
    pub(crate) fn is_ready(&self) -> bool {
        self.stream.is_active() && self.stream.is_ready()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stream.stop_tracks();
        info!(stream = %self.stream.id(), facing = %self.facing, "Capture session released");
    }
}

impl fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("stream", &self.stream.id())
            .field("facing", &self.facing)
            .field("relaxed", &self.relaxed)
            .finish()
    }
}
