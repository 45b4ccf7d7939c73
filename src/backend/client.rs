//! HTTP client for the record backend.
//!
//! One `reqwest::Client` is built up front and reused for every call. Calls
//! are made once: there is no retry and no request timeout, only a connect
//! timeout.

use super::payload::{
    ListEntryReply, ListEntryRequest, Respuestas, SaveRecordReply, SubmissionPayload,
    TranscriptionReply,
};
use super::RecordBackend;
use crate::config::BackendSettings;
use crate::error::BackendError;
use crate::speech::AudioClip;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{info, instrument, warn};
use url::Url;

const SAVE_RECORD_PATH: &str = "/guardar-registro";
const LIST_ENTRY_PATH: &str = "/guardar-en-lista-sharepoint";
const TRANSCRIBE_PATH: &str = "/transcribe-audio";

/// Message used when the list endpoint fails without saying why
const LIST_ENTRY_FALLBACK_ERROR: &str = "Error al guardar";

pub(crate) struct BackendClient {
    base_url: Url,
    client: reqwest::Client,
}

impl BackendClient {
    pub(crate) fn new(settings: &BackendSettings) -> anyhow::Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid backend URL: {}", settings.base_url))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout())
            .build()
            .context("Failed to create HTTP client for BackendClient")?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl RecordBackend for BackendClient {
    #[instrument(skip(self, payload), fields(fotos = payload.fotos.len(), videos = payload.videos.len()))]
    async fn save_record(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SaveRecordReply, BackendError> {
        let url = self.endpoint(SAVE_RECORD_PATH)?;
        let response = self.client.post(url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let reply: SaveRecordReply = response.json().await.map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse save reply: {}", e))
        })?;
        info!(success = reply.is_success(), "Record save reply received");
        Ok(reply)
    }

    #[instrument(skip(self, respuestas))]
    async fn save_list_entry(
        &self,
        respuestas: &Respuestas,
    ) -> Result<ListEntryReply, BackendError> {
        let url = self.endpoint(LIST_ENTRY_PATH)?;
        let response = self
            .client
            .post(url)
            .json(&ListEntryRequest { respuestas })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<ListEntryReply>(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|reply| reply.error)
                .unwrap_or_else(|| LIST_ENTRY_FALLBACK_ERROR.to_string());
            return Err(BackendError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        parsed.map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse list entry reply: {}", e))
        })
    }

    #[instrument(skip(self, clip), fields(bytes = clip.bytes.len()))]
    async fn transcribe_audio(&self, clip: &AudioClip) -> Result<TranscriptionReply, BackendError> {
        let url = self.endpoint(TRANSCRIBE_PATH)?;
        let part = Part::bytes(clip.bytes.clone())
            .file_name(clip.file_name)
            .mime_str(clip.mime)?;
        let form = Form::new().part("audio", part);

        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Transcription endpoint returned an error status");
        }

        // The reply body carries `error` on failure, so it is parsed either way
        response.json().await.map_err(|e| {
            BackendError::InvalidResponse(format!(
                "Failed to parse transcription reply ({}): {}",
                status, e
            ))
        })
    }
}
