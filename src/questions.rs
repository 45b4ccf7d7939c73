//! Fixed question list and the answers collected for it

use std::collections::BTreeMap;

/// A spoken prompt and the payload key its answer is submitted under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Question {
    pub(crate) prompt: &'static str,
    pub(crate) key: &'static str,
}

/// Questions asked in order, one text field each
pub(crate) const QUESTIONS: &[Question] = &[
    Question {
        prompt: "¿Cuál es el tipo de informe?",
        key: "zona_intervencion",
    },
    Question {
        prompt: "Mencione la sede",
        key: "items",
    },
    Question {
        prompt: "Mencione los repuestos utilizados",
        key: "metros_lineales",
    },
    Question {
        prompt: "Mencione los repuestos a cotizar",
        key: "proximas_tareas",
    },
];

/// Transcribed answers keyed by question index
///
/// Re-recording a field replaces its previous answer; no history is kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct AnswerSet {
    answers: BTreeMap<usize, String>,
}

impl AnswerSet {
    /// Store the answer for `index`, returning the one it replaced
    pub(crate) fn record(&mut self, index: usize, text: impl Into<String>) -> Option<String> {
        self.answers.insert(index, text.into())
    }

    pub(crate) fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    /// Answer for `index`, or an empty string if never answered
    pub(crate) fn text_or_empty(&self, index: usize) -> &str {
        self.get(index).unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.answers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.answers.clear();
    }
}
