//! Question-answer sequencer
//!
//! Walks the fixed question list: speaks each prompt, waits for the spoken
//! answer and writes its transcription into the matching field. A failed
//! step leaves the cursor on the same question so asking again retries it.

mod strategy;

pub(crate) use strategy::{StrategyOverride, TranscriptionStrategy};

use crate::backend::RecordBackend;
use crate::config::SpeechSettings;
use crate::error::{BackendError, SpeechError};
use crate::platform::Platform;
use crate::questions::{AnswerSet, Question, QUESTIONS};
use crate::recording_state::RecordingState;
use crate::view::{FormView, Notice};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const TRANSCRIPTION_FAILED: &str = "No se pudo transcribir el audio.";
const MICROPHONE_FAILED: &str = "No se pudo acceder al micrófono.";
const UPLOAD_FAILED: &str = "Error al enviar el audio al servidor.";
const RECOGNITION_UNSUPPORTED: &str =
    "El reconocimiento de voz no es compatible con este dispositivo.";
const SYNTHESIS_FAILED: &str = "No se pudo leer la pregunta en voz alta.";

#[derive(Debug, Clone)]
pub(crate) struct SequencerSettings {
    pub(crate) locale: String,
    pub(crate) listen_delay: Duration,
    pub(crate) clip_duration: Duration,
    pub(crate) strategy: StrategyOverride,
}

impl From<&SpeechSettings> for SequencerSettings {
    fn from(settings: &SpeechSettings) -> Self {
        Self {
            locale: settings.locale.clone(),
            listen_delay: settings.listen_delay(),
            clip_duration: settings.clip_duration(),
            strategy: settings.strategy,
        }
    }
}

/// Result of one `ask_next` run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AskOutcome {
    /// The last question was answered during this run
    Finished,
    /// Stopped on a failed question; the cursor still points at it
    Halted { index: usize },
    /// No recognizer on this platform
    Unsupported,
    /// Another recording holds the recording state
    Busy,
    /// Every question already had an answer
    NothingToAsk,
}

/// Why one listening step produced no answer
#[derive(Debug, thiserror::Error)]
enum StepError {
    #[error("Speech recognition is not supported")]
    Unsupported,
    #[error("Speech synthesis failed: {0}")]
    Synthesis(SpeechError),
    #[error("Microphone capture failed: {0}")]
    Microphone(SpeechError),
    #[error("Speech recognition failed: {0}")]
    Recognition(SpeechError),
    #[error("Transcription upload failed: {0}")]
    Upload(#[from] BackendError),
    #[error("Transcription service reported: {0}")]
    Service(String),
    #[error("Nothing was transcribed")]
    Empty,
}

impl StepError {
    fn notice(&self) -> Notice {
        let message = match self {
            StepError::Unsupported => RECOGNITION_UNSUPPORTED,
            StepError::Synthesis(_) => SYNTHESIS_FAILED,
            StepError::Microphone(_) => MICROPHONE_FAILED,
            StepError::Upload(_) => UPLOAD_FAILED,
            StepError::Recognition(_) | StepError::Service(_) | StepError::Empty => {
                TRANSCRIPTION_FAILED
            }
        };
        Notice::error(message)
    }
}

pub(crate) struct Sequencer {
    cursor: usize,
    answers: AnswerSet,
    settings: SequencerSettings,
}

impl Sequencer {
    pub(crate) fn new(settings: SequencerSettings) -> Self {
        Self {
            cursor: 0,
            answers: AnswerSet::default(),
            settings,
        }
    }

    /// Index of the next question to ask
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.cursor >= QUESTIONS.len()
    }

    /// Forget all answers and start again from the first question
    pub(crate) fn reset(&mut self) {
        self.cursor = 0;
        self.answers.clear();
    }

    pub(crate) fn strategy(&self, platform: &Platform) -> TranscriptionStrategy {
        TranscriptionStrategy::select(platform.family, self.settings.strategy)
    }

    /// Ask the remaining questions in order until one fails or all are answered
    #[instrument(skip_all, fields(cursor = self.cursor))]
    pub(crate) async fn ask_next(
        &mut self,
        platform: &Platform,
        backend: &dyn RecordBackend,
        view: &mut dyn FormView,
        recording: &mut RecordingState,
    ) -> AskOutcome {
        if self.is_complete() {
            debug!("All questions already answered");
            return AskOutcome::NothingToAsk;
        }

        if !recording.is_idle() {
            warn!(state = %recording, "Ignoring question request while recording");
            return AskOutcome::Busy;
        }

        let strategy = self.strategy(platform);
        if !self.strategy_available(strategy, platform, view) {
            return AskOutcome::Unsupported;
        }
        info!(%strategy, "Asking questions from {}", self.cursor);

        while let Some(question) = QUESTIONS.get(self.cursor) {
            let index = self.cursor;
            if let Err(rejected) = recording.begin_field(index) {
                warn!("{}", rejected);
                return AskOutcome::Busy;
            }

            let result = match self.speak(question, platform).await {
                Ok(()) => {
                    tokio::time::sleep(self.settings.listen_delay).await;
                    self.listen(strategy, platform, backend).await
                }
                Err(e) => Err(e),
            };
            recording.finish_field();

            match result {
                Ok(text) => {
                    self.store_answer(index, &text, view);
                    self.cursor += 1;
                }
                Err(e) => {
                    warn!(index, "Question step failed: {}", e);
                    view.notify(e.notice());
                    return match e {
                        StepError::Unsupported => AskOutcome::Unsupported,
                        _ => AskOutcome::Halted { index },
                    };
                }
            }
        }

        info!(answers = self.answers.len(), "All questions answered");
        AskOutcome::Finished
    }

    /// Dictate one field again without speaking its prompt
    ///
    /// The cursor is left alone. Returns true if an answer was stored.
    #[instrument(skip(self, platform, backend, view, recording))]
    pub(crate) async fn record_field(
        &mut self,
        index: usize,
        platform: &Platform,
        backend: &dyn RecordBackend,
        view: &mut dyn FormView,
        recording: &mut RecordingState,
    ) -> bool {
        if index >= QUESTIONS.len() {
            warn!("No question field {}", index);
            return false;
        }
        if let Err(rejected) = recording.begin_field(index) {
            warn!("Ignoring field recording: {}", rejected);
            return false;
        }
        let strategy = self.strategy(platform);
        if !self.strategy_available(strategy, platform, view) {
            recording.finish_field();
            return false;
        }

        let result = self.listen(strategy, platform, backend).await;
        recording.finish_field();

        match result {
            Ok(text) => {
                self.store_answer(index, &text, view);
                true
            }
            Err(e) => {
                warn!("Field recording failed: {}", e);
                view.notify(e.notice());
                false
            }
        }
    }

    fn strategy_available(
        &self,
        strategy: TranscriptionStrategy,
        platform: &Platform,
        view: &mut dyn FormView,
    ) -> bool {
        if strategy == TranscriptionStrategy::ContinuousRecognition
            && !platform.recognizer.is_supported()
        {
            warn!("Speech recognition unavailable");
            view.notify(StepError::Unsupported.notice());
            return false;
        }
        true
    }

    fn store_answer(&mut self, index: usize, text: &str, view: &mut dyn FormView) {
        if let Some(previous) = self.answers.record(index, text) {
            debug!(index, "Replaced answer {:?}", previous);
        }
        view.set_answer(index, text);
        info!(index, "Answer recorded");
    }

    async fn speak(&self, question: &Question, platform: &Platform) -> Result<(), StepError> {
        platform
            .synthesizer
            .speak(question.prompt, &self.settings.locale)
            .await
            .map_err(StepError::Synthesis)
    }

    async fn listen(
        &self,
        strategy: TranscriptionStrategy,
        platform: &Platform,
        backend: &dyn RecordBackend,
    ) -> Result<String, StepError> {
        match strategy {
            TranscriptionStrategy::RecordAndUpload => {
                let clip = platform
                    .microphone
                    .record_clip(self.settings.clip_duration)
                    .await
                    .map_err(StepError::Microphone)?;
                debug!(bytes = clip.bytes.len(), "Uploading answer clip");

                let reply = backend.transcribe_audio(&clip).await?;
                if let Some(text) = reply.transcript() {
                    return Ok(text.to_string());
                }
                match reply.error {
                    Some(error) => Err(StepError::Service(error)),
                    None => Err(StepError::Empty),
                }
            }
            TranscriptionStrategy::ContinuousRecognition => {
                match platform.recognizer.recognize(&self.settings.locale).await {
                    Ok(Some(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
                    Ok(_) => Err(StepError::Empty),
                    Err(SpeechError::Unsupported) => Err(StepError::Unsupported),
                    Err(e) => Err(StepError::Recognition(e)),
                }
            }
        }
    }
}
