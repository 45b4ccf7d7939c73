//! Recording state machine shared by field dictation and video capture
//!
//! Only one recording of any kind may run at a time. A request to start a
//! second one is rejected and leaves the current state untouched.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum RecordingState {
    #[default]
    Idle,
    /// Dictating the answer for a question field
    RecordingField { index: usize },
    RecordingVideo,
}

/// A start request that arrived while another recording was running
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot start {requested} while {active} is in progress")]
pub(crate) struct RecordingRejected {
    pub(crate) active: RecordingState,
    pub(crate) requested: RecordingState,
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingState::Idle => write!(f, "idle"),
            RecordingState::RecordingField { index } => write!(f, "field {} dictation", index),
            RecordingState::RecordingVideo => write!(f, "video recording"),
        }
    }
}

impl RecordingState {
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, RecordingState::Idle)
    }

    pub(crate) fn is_recording_video(&self) -> bool {
        matches!(self, RecordingState::RecordingVideo)
    }

    pub(crate) fn begin_field(&mut self, index: usize) -> Result<(), RecordingRejected> {
        self.transition(RecordingState::RecordingField { index })
    }

    pub(crate) fn begin_video(&mut self) -> Result<(), RecordingRejected> {
        self.transition(RecordingState::RecordingVideo)
    }

    /// Return to idle if a field dictation is running; true if it was
    pub(crate) fn finish_field(&mut self) -> bool {
        if matches!(self, RecordingState::RecordingField { .. }) {
            *self = RecordingState::Idle;
            true
        } else {
            false
        }
    }

    /// Return to idle if a video recording is running; true if it was
    pub(crate) fn finish_video(&mut self) -> bool {
        if self.is_recording_video() {
            *self = RecordingState::Idle;
            true
        } else {
            false
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = RecordingState::Idle;
    }

    fn transition(&mut self, requested: RecordingState) -> Result<(), RecordingRejected> {
        if !self.is_idle() {
            return Err(RecordingRejected {
                active: *self,
                requested,
            });
        }
        *self = requested;
        Ok(())
    }
}
