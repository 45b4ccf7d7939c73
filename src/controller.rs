//! Field report controller
//!
//! Owns every piece of page-lifetime state (answers, capture session, media
//! collections, recording state) and runs one user operation at a time
//! against the platform providers, the backend and the form view.

use crate::backend::RecordBackend;
use crate::media::{MediaCaptureManager, MediaKind, SlotIndex, VideoStartError};
use crate::platform::Platform;
use crate::questions::AnswerSet;
use crate::recording_state::RecordingState;
use crate::sequencer::{AskOutcome, Sequencer};
use crate::submission::{SubmissionAssembler, SubmitOutcome, RECORD_SAVED};
use crate::view::{FormView, Notice};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

const STOP_RECORDING_FIRST: &str = "Detenga la grabación de video primero.";
const QUESTIONS_COMPLETE: &str = "Preguntas completadas.";
const ALL_ANSWERED: &str = "Todas las preguntas tienen respuesta.";

pub(crate) struct FieldReportController {
    platform: Platform,
    backend: Box<dyn RecordBackend>,
    view: Box<dyn FormView>,
    sequencer: Sequencer,
    media: MediaCaptureManager,
    assembler: SubmissionAssembler,
    recording: RecordingState,
}

impl FieldReportController {
    pub(crate) fn new(
        platform: Platform,
        backend: Box<dyn RecordBackend>,
        view: Box<dyn FormView>,
        sequencer: Sequencer,
        media: MediaCaptureManager,
        assembler: SubmissionAssembler,
    ) -> Self {
        Self {
            platform,
            backend,
            view,
            sequencer,
            media,
            assembler,
            recording: RecordingState::default(),
        }
    }

    pub(crate) fn answers(&self) -> &AnswerSet {
        self.sequencer.answers()
    }

    pub(crate) fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub(crate) fn media(&self) -> &MediaCaptureManager {
        &self.media
    }

    pub(crate) fn recording(&self) -> RecordingState {
        self.recording
    }

    pub(crate) fn platform(&self) -> &Platform {
        &self.platform
    }

    pub(crate) fn assembler(&self) -> &SubmissionAssembler {
        &self.assembler
    }

    /// Ask the remaining questions; the camera starts once the last is answered
    pub(crate) async fn start_questions(&mut self) -> AskOutcome {
        let outcome = self
            .sequencer
            .ask_next(
                &self.platform,
                self.backend.as_ref(),
                self.view.as_mut(),
                &mut self.recording,
            )
            .await;

        match outcome {
            AskOutcome::Finished => {
                info!("Questions complete, starting camera");
                self.view.notify(Notice::info(QUESTIONS_COMPLETE));
                self.activate_camera().await;
            }
            AskOutcome::NothingToAsk => self.view.notify(Notice::info(ALL_ANSWERED)),
            _ => {}
        }
        outcome
    }

    /// Dictate a single field again
    pub(crate) async fn record_field(&mut self, index: usize) -> bool {
        self.sequencer
            .record_field(
                index,
                &self.platform,
                self.backend.as_ref(),
                self.view.as_mut(),
                &mut self.recording,
            )
            .await
    }

    /// Start the camera with the current facing mode
    pub(crate) async fn activate_camera(&mut self) -> bool {
        if self.blocked_by_video("activate camera") {
            return false;
        }
        let facing = self.media.facing();
        self.media
            .activate_session(self.platform.devices.as_ref(), self.view.as_mut(), facing)
            .await
            .is_ok()
    }

    pub(crate) async fn switch_camera(&mut self) -> bool {
        if self.blocked_by_video("switch camera") {
            return false;
        }
        self.media
            .switch_facing(self.platform.devices.as_ref(), self.view.as_mut())
            .await
            .is_ok()
    }

    /// Photo controls are hidden while a video records, so this is ignored then
    pub(crate) fn capture_photo(&mut self) -> Option<SlotIndex> {
        if self.recording.is_recording_video() {
            warn!("Ignoring photo request during video recording");
            return None;
        }
        self.media.capture_photo(self.view.as_mut()).ok()
    }

    pub(crate) fn delete_media(&mut self, kind: MediaKind, index: SlotIndex) -> bool {
        self.media.delete_media(kind, index, self.view.as_mut())
    }

    pub(crate) fn start_video(&mut self) -> bool {
        match self.media.start_video_recording(
            self.platform.devices.as_ref(),
            self.platform.family,
            &mut self.recording,
            self.view.as_mut(),
        ) {
            Ok(_) => true,
            Err(VideoStartError::Rejected(rejected)) => {
                warn!("Ignoring video request: {}", rejected);
                false
            }
            Err(VideoStartError::Device(_)) => false,
        }
    }

    pub(crate) async fn stop_video(&mut self) -> Option<SlotIndex> {
        self.media
            .stop_video_recording(&mut self.recording, self.view.as_mut())
            .await
            .ok()
            .flatten()
    }

    pub(crate) async fn attach_photos(&mut self, files: &[PathBuf]) -> Vec<SlotIndex> {
        self.media.attach_photos(files, self.view.as_mut()).await
    }

    pub(crate) async fn attach_video(&mut self, path: &Path) -> Option<SlotIndex> {
        self.media.attach_video(path, self.view.as_mut()).await.ok()
    }

    /// Post the record and apply the outcome to the form
    #[instrument(skip(self))]
    pub(crate) async fn submit(&mut self) -> SubmitOutcome {
        let outcome = self
            .assembler
            .submit(
                self.backend.as_ref(),
                self.sequencer.answers(),
                self.media.photos(),
                self.media.videos(),
                self.view.as_mut(),
            )
            .await;

        match &outcome {
            SubmitOutcome::Saved => {
                self.sequencer.reset();
                self.view.clear_answers();
                self.media.clear_collections(self.view.as_mut());
                self.view.clear_drawing_surface();
                self.view.notify(Notice::success(RECORD_SAVED));
                self.view.set_submit_enabled(true);
            }
            SubmitOutcome::Rejected { message } => {
                self.view.clear_answers();
                self.view.clear_drawing_surface();
                self.view
                    .notify(SubmitOutcome::rejection_notice(message.as_deref()));
                self.reload();
            }
            SubmitOutcome::TransportFailed => {}
        }
        outcome
    }

    pub(crate) async fn save_to_list(&mut self) -> bool {
        self.assembler
            .save_to_list(
                self.backend.as_ref(),
                self.sequencer.answers(),
                self.view.as_mut(),
            )
            .await
    }

    /// Reset every piece of page-lifetime state and redraw a fresh form
    pub(crate) fn reload(&mut self) {
        info!("Reloading form");
        self.media.reset();
        self.sequencer.reset();
        self.recording.reset();
        self.view.reload();
    }

    /// Release hardware after the running operation was abandoned or on exit
    pub(crate) fn shutdown(&mut self) {
        if !self.recording.is_idle() {
            warn!(state = %self.recording, "Abandoning active recording");
        }
        self.recording.reset();
        self.media.release();
    }

    fn blocked_by_video(&mut self, action: &str) -> bool {
        if self.recording.is_recording_video() {
            warn!("Cannot {} while recording video", action);
            self.view.notify(Notice::error(STOP_RECORDING_FIRST));
            return true;
        }
        false
    }
}
