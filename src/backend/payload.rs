//! Request and reply bodies for the record endpoints

use crate::media::SlotCollection;
use crate::questions::{AnswerSet, QUESTIONS};
use serde::{Deserialize, Serialize};

/// Text answers under their submission keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Respuestas {
    pub(crate) zona_intervencion: String,
    pub(crate) items: String,
    pub(crate) metros_lineales: String,
    pub(crate) proximas_tareas: String,
}

impl Respuestas {
    /// Unanswered questions become empty strings
    pub(crate) fn from_answers(answers: &AnswerSet) -> Self {
        let text = |key: &str| {
            QUESTIONS
                .iter()
                .position(|q| q.key == key)
                .map(|index| answers.text_or_empty(index).to_string())
                .unwrap_or_default()
        };
        Self {
            zona_intervencion: text("zona_intervencion"),
            items: text("items"),
            metros_lineales: text("metros_lineales"),
            proximas_tareas: text("proximas_tareas"),
        }
    }
}

/// Body of `POST /guardar-registro`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SubmissionPayload {
    pub(crate) respuestas: Respuestas,
    pub(crate) fotos: Vec<String>,
    pub(crate) videos: Vec<String>,
    pub(crate) project_id: Option<String>,
}

impl SubmissionPayload {
    /// Build from answers and the surviving (non-tombstoned) media
    pub(crate) fn assemble(
        answers: &AnswerSet,
        photos: &SlotCollection,
        videos: &SlotCollection,
        project_id: Option<String>,
    ) -> Self {
        let survivors = |slots: &SlotCollection| {
            slots
                .survivors()
                .map(|(_, media)| media.as_data_url().to_string())
                .collect()
        };
        Self {
            respuestas: Respuestas::from_answers(answers),
            fotos: survivors(photos),
            videos: survivors(videos),
            project_id,
        }
    }
}

/// Body of `POST /guardar-en-lista-sharepoint`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ListEntryRequest<'a> {
    pub(crate) respuestas: &'a Respuestas,
}

/// Reply of `POST /guardar-registro`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SaveRecordReply {
    /// Any JSON value; judged by truthiness
    #[serde(default)]
    pub(crate) success: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

impl SaveRecordReply {
    pub(crate) fn is_success(&self) -> bool {
        use serde_json::Value;
        match &self.success {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    /// Server-provided explanation, if any
    pub(crate) fn reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Reply of `POST /guardar-en-lista-sharepoint`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ListEntryReply {
    #[serde(default)]
    pub(crate) id_registro: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

/// Reply of `POST /transcribe-audio`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct TranscriptionReply {
    #[serde(default)]
    pub(crate) text: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

impl TranscriptionReply {
    /// Transcribed text, if non-blank
    pub(crate) fn transcript(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
