//! Submission assembler
//!
//! Builds the record payload from the answers and surviving media, posts it
//! and classifies the reply. Clearing state afterwards is up to the caller,
//! which owns the answers and media.

use crate::backend::{RecordBackend, Respuestas, SubmissionPayload};
use crate::error::BackendError;
use crate::media::SlotCollection;
use crate::page::PageContext;
use crate::questions::AnswerSet;
use crate::view::{FormView, Notice};
use tracing::{error, info, instrument, warn};

pub(crate) const RECORD_SAVED: &str = "¡Registro guardado exitosamente!";
pub(crate) const RECORD_REJECTED: &str = "El servidor no pudo guardar el registro.";
pub(crate) const CONNECTION_FAILED: &str = "Error en la conexión con el servidor.";
pub(crate) const LIST_ENTRY_SAVED: &str = "¡Registro guardado en la lista de SharePoint!";

/// How a submit attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubmitOutcome {
    /// The server confirmed the record
    Saved,
    /// The server answered but did not report success
    Rejected { message: Option<String> },
    /// No usable reply; nothing was changed
    TransportFailed,
}

impl SubmitOutcome {
    /// Error notice for a rejected record, with the server's reason if any
    pub(crate) fn rejection_notice(message: Option<&str>) -> Notice {
        match message {
            Some(reason) => Notice::error(format!("{} {}", RECORD_REJECTED, reason)),
            None => Notice::error(RECORD_REJECTED),
        }
    }
}

pub(crate) struct SubmissionAssembler {
    page: PageContext,
}

impl SubmissionAssembler {
    pub(crate) fn new(page: PageContext) -> Self {
        Self { page }
    }

    pub(crate) fn page(&self) -> &PageContext {
        &self.page
    }

    /// Payload for the current answers and media; `project_id` is read now
    pub(crate) fn assemble(
        &self,
        answers: &AnswerSet,
        photos: &SlotCollection,
        videos: &SlotCollection,
    ) -> SubmissionPayload {
        SubmissionPayload::assemble(answers, photos, videos, self.page.project_id())
    }

    /// Post the record once
    ///
    /// The submit control is disabled for the duration. On a transport
    /// failure it is enabled again and an error notice is shown; the other
    /// outcomes are left to the caller.
    #[instrument(skip_all)]
    pub(crate) async fn submit(
        &self,
        backend: &dyn RecordBackend,
        answers: &AnswerSet,
        photos: &SlotCollection,
        videos: &SlotCollection,
        view: &mut dyn FormView,
    ) -> SubmitOutcome {
        view.set_submit_enabled(false);

        if answers.is_empty() {
            warn!("Submitting a record without answers");
        }
        let payload = self.assemble(answers, photos, videos);
        info!(
            fotos = payload.fotos.len(),
            videos = payload.videos.len(),
            project_id = ?payload.project_id,
            "Submitting record"
        );

        match backend.save_record(&payload).await {
            Ok(reply) if reply.is_success() => {
                info!("Record saved");
                SubmitOutcome::Saved
            }
            Ok(reply) => {
                let message = reply.reason().map(str::to_string);
                warn!(reason = ?message, "Server did not confirm the record");
                SubmitOutcome::Rejected { message }
            }
            Err(e) => {
                error!(error = %e, "Record submission failed");
                view.set_submit_enabled(true);
                view.notify(Notice::error(CONNECTION_FAILED));
                SubmitOutcome::TransportFailed
            }
        }
    }

    /// Post the text answers as a list entry; true on success
    #[instrument(skip_all)]
    pub(crate) async fn save_to_list(
        &self,
        backend: &dyn RecordBackend,
        answers: &AnswerSet,
        view: &mut dyn FormView,
    ) -> bool {
        let respuestas = Respuestas::from_answers(answers);
        match backend.save_list_entry(&respuestas).await {
            Ok(reply) => {
                info!(id_registro = ?reply.id_registro, "List entry saved");
                view.notify(Notice::success(LIST_ENTRY_SAVED));
                true
            }
            Err(e) => {
                error!(error = %e, "List entry failed");
                let message = match e {
                    BackendError::ServerError { message, .. } => message,
                    other => other.to_string(),
                };
                view.notify(Notice::error(format!("Error: {}", message)));
                false
            }
        }
    }
}
