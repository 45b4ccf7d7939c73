//! Record backend: submission, list entry and audio transcription endpoints

mod client;
mod payload;

pub(crate) use client::BackendClient;
pub(crate) use payload::{
    ListEntryReply, Respuestas, SaveRecordReply, SubmissionPayload, TranscriptionReply,
};

use crate::error::BackendError;
use crate::speech::AudioClip;
use async_trait::async_trait;

#[async_trait]
pub(crate) trait RecordBackend: Send + Sync {
    /// `POST /guardar-registro`
    ///
    /// Non-2xx statuses and unparsable bodies are errors; an application-level
    /// failure is a successfully parsed reply whose `success` is falsy.
    async fn save_record(&self, payload: &SubmissionPayload)
        -> Result<SaveRecordReply, BackendError>;

    /// `POST /guardar-en-lista-sharepoint`
    async fn save_list_entry(&self, respuestas: &Respuestas)
        -> Result<ListEntryReply, BackendError>;

    /// `POST /transcribe-audio`
    async fn transcribe_audio(&self, clip: &AudioClip) -> Result<TranscriptionReply, BackendError>;
}
