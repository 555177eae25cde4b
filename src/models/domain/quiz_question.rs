use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

/// Fixed set of choice labels shared by the prompt template and the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(OptionLabel::A),
            'B' => Some(OptionLabel::B),
            'C' => Some(OptionLabel::C),
            'D' => Some(OptionLabel::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLabel::A => 'A',
            OptionLabel::B => 'B',
            OptionLabel::C => 'C',
            OptionLabel::D => 'D',
        }
    }
}

impl std::fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("question text is empty")]
    EmptyQuestion,

    #[error("expected {} options, found {found}", OptionLabel::ALL.len())]
    IncompleteOptions { found: usize },

    #[error("option {0} has no text")]
    EmptyOption(OptionLabel),

    #[error("explanation is empty")]
    EmptyExplanation,
}

/// A fully validated multiple-choice question.
///
/// Only constructed through [`QuizQuestion::new`], so every instance carries
/// non-empty text, the complete label set and a non-empty explanation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, JsonSchema)]
pub struct QuizQuestion {
    question: String,
    options: BTreeMap<OptionLabel, String>,
    correct_answer: OptionLabel,
    explanation: String,
}

impl QuizQuestion {
    pub fn new(
        question: impl Into<String>,
        options: BTreeMap<OptionLabel, String>,
        correct_answer: OptionLabel,
        explanation: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let question = question.into().trim().to_string();
        let explanation = explanation.into().trim().to_string();

        if question.is_empty() {
            return Err(RecordError::EmptyQuestion);
        }
        if options.len() != OptionLabel::ALL.len() {
            return Err(RecordError::IncompleteOptions {
                found: options.len(),
            });
        }
        if let Some((label, _)) = options.iter().find(|(_, text)| text.trim().is_empty()) {
            return Err(RecordError::EmptyOption(*label));
        }
        if explanation.is_empty() {
            return Err(RecordError::EmptyExplanation);
        }

        Ok(Self {
            question,
            options,
            correct_answer,
            explanation,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &BTreeMap<OptionLabel, String> {
        &self.options
    }

    pub fn option(&self, label: OptionLabel) -> &str {
        // Complete label set is guaranteed by the constructor.
        self.options.get(&label).map(String::as_str).unwrap_or_default()
    }

    pub fn correct_answer(&self) -> OptionLabel {
        self.correct_answer
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}
