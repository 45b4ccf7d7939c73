//! Form surface the controller renders into
//!
//! Text fields, notices, thumbnails, capture controls and the submit button.
//! The console front-end implements it for the binary; tests record calls.

use crate::media::{MediaKind, SlotIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A user-visible message (the form's alert)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) level: NoticeLevel,
    pub(crate) message: String,
}

impl Notice {
    pub(crate) fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Which capture controls are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaptureLayout {
    /// No camera; only the start-camera control
    Inactive,
    /// Live preview with photo, record and switch controls
    Active,
    /// Video recording; photo control hidden, stop control shown
    Recording,
}

pub(crate) trait FormView: Send {
    fn set_answer(&mut self, index: usize, text: &str);
    fn clear_answers(&mut self);
    fn notify(&mut self, notice: Notice);
    fn show_layout(&mut self, layout: CaptureLayout);
    fn bind_preview(&mut self, stream_id: &str);
    /// Append one thumbnail; earlier thumbnails are left alone
    fn add_thumbnail(&mut self, kind: MediaKind, slot: SlotIndex, data_url: &str);
    fn remove_thumbnail(&mut self, kind: MediaKind, slot: SlotIndex);
    fn clear_thumbnails(&mut self, kind: MediaKind);
    fn clear_drawing_surface(&mut self);
    fn set_submit_enabled(&mut self, enabled: bool);
    /// Start over with a fresh form
    fn reload(&mut self);
}
