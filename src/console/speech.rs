//! Terminal speech: prompts are printed, answers are typed

use super::LineSource;
use crate::error::SpeechError;
use crate::speech::{SpeechRecognizer, SpeechSynthesizer};
use async_trait::async_trait;
use tracing::debug;

/// "Speaks" by printing the prompt
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PrintSynthesizer;

#[async_trait]
impl SpeechSynthesizer for PrintSynthesizer {
    async fn speak(&self, text: &str, locale: &str) -> Result<(), SpeechError> {
        debug!(locale, "Speaking prompt");
        println!("» {}", text);
        Ok(())
    }
}

/// Takes the next typed line as the recognized utterance
pub(crate) struct LineRecognizer {
    lines: LineSource,
}

impl LineRecognizer {
    pub(crate) fn new(lines: LineSource) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl SpeechRecognizer for LineRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    async fn recognize(&self, _locale: &str) -> Result<Option<String>, SpeechError> {
        println!("  (escriba la respuesta y pulse Enter)");
        match self.lines.next_line().await {
            Some(line) => {
                let line = line.trim();
                Ok((!line.is_empty()).then(|| line.to_string()))
            }
            None => Err(SpeechError::Recognition("input closed".to_string())),
        }
    }
}
