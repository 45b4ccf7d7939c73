//! Form view rendered as terminal output

use crate::media::{MediaKind, SlotIndex};
use crate::questions::QUESTIONS;
use crate::view::{CaptureLayout, FormView, Notice, NoticeLevel};
use tracing::debug;

/// Data URLs are long; only this much is echoed
const DATA_URL_PREVIEW: usize = 48;

#[derive(Debug)]
pub(crate) struct ConsoleView;

impl ConsoleView {
    pub(crate) fn print_questions() {
        for (index, question) in QUESTIONS.iter().enumerate() {
            println!("  [{}] {}", index, question.prompt);
        }
    }
}

fn preview(data_url: &str) -> &str {
    match data_url.char_indices().nth(DATA_URL_PREVIEW) {
        Some((end, _)) => &data_url[..end],
        None => data_url,
    }
}

impl FormView for ConsoleView {
    fn set_answer(&mut self, index: usize, text: &str) {
        let prompt = QUESTIONS.get(index).map(|q| q.prompt).unwrap_or_default();
        println!("  [{}] {} → {}", index, prompt, text);
    }

    fn clear_answers(&mut self) {
        println!("  Respuestas borradas");
    }

    fn notify(&mut self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        println!("[{}] {}", tag, notice.message);
    }

    fn show_layout(&mut self, layout: CaptureLayout) {
        match layout {
            CaptureLayout::Inactive => println!("  Cámara apagada (camera)"),
            CaptureLayout::Active => println!("  Cámara lista (photo, record, switch)"),
            CaptureLayout::Recording => println!("  Grabando video... (stop)"),
        }
    }

    fn bind_preview(&mut self, stream_id: &str) {
        debug!(stream = stream_id, "Preview bound");
    }

    fn add_thumbnail(&mut self, kind: MediaKind, slot: SlotIndex, data_url: &str) {
        println!("  + {} {}: {}…", kind, slot, preview(data_url));
    }

    fn remove_thumbnail(&mut self, kind: MediaKind, slot: SlotIndex) {
        println!("  - {} {}", kind, slot);
    }

    fn clear_thumbnails(&mut self, kind: MediaKind) {
        debug!(%kind, "Thumbnails cleared");
    }

    fn clear_drawing_surface(&mut self) {
        debug!("Drawing surface cleared");
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        debug!(enabled, "Submit control toggled");
        if !enabled {
            println!("  Enviando...");
        }
    }

    fn reload(&mut self) {
        println!("--- Formulario reiniciado ---");
        Self::print_questions();
    }
}
