//! Turns a free-text model completion into validated quiz questions.
//!
//! Lexing is lenient about decoration around the fixed markers (emoji, markdown
//! emphasis, bullets, spacing). Acceptance is strict: a block missing any piece
//! is dropped whole and reported as a [`BlockRejection`].

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::domain::{OptionLabel, QuizQuestion, RecordError};

/// Question line + four options + answer line.
const MIN_BLOCK_LINES: usize = 6;

static QUESTION_DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[^\p{L}\p{N}\n]*question[^\S\n]+\d+[^\S\n]*:(?:\*\*)?")
        .expect("QUESTION_DELIMITER is a valid regex pattern")
});

static OPTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\p{L}\p{N}]*([A-D])\)\**\s*(.+)$")
        .expect("OPTION_LINE is a valid regex pattern")
});

// Markers must open the line, after any decoration.
static CORRECT_ANSWER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[^\p{L}\p{N}]*correct\s+answer\**\s*:")
        .expect("CORRECT_ANSWER_LINE is a valid regex pattern")
});

static EXPLANATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[^\p{L}\p{N}]*explanation\**\s*:")
        .expect("EXPLANATION_LINE is a valid regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    TooFewLines { found: usize },
    MissingQuestion,
    IncompleteOptions { found: usize },
    EmptyOption { label: OptionLabel },
    MissingCorrectAnswer,
    MissingExplanation,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::TooFewLines { found } => {
                write!(f, "only {} non-empty lines (need {})", found, MIN_BLOCK_LINES)
            }
            RejectionReason::MissingQuestion => write!(f, "no question text"),
            RejectionReason::IncompleteOptions { found } => {
                write!(f, "{} of {} options found", found, OptionLabel::ALL.len())
            }
            RejectionReason::EmptyOption { label } => write!(f, "option {} is empty", label),
            RejectionReason::MissingCorrectAnswer => write!(f, "no valid correct answer"),
            RejectionReason::MissingExplanation => write!(f, "no explanation"),
        }
    }
}

impl From<RecordError> for RejectionReason {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::EmptyQuestion => RejectionReason::MissingQuestion,
            RecordError::IncompleteOptions { found } => RejectionReason::IncompleteOptions { found },
            RecordError::EmptyOption(label) => RejectionReason::EmptyOption { label },
            RecordError::EmptyExplanation => RejectionReason::MissingExplanation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockRejection {
    pub block_index: usize, // 1-based position among delimited blocks
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub questions: Vec<QuizQuestion>,
    pub rejections: Vec<BlockRejection>,
}

impl ParseOutcome {
    pub fn block_count(&self) -> usize {
        self.questions.len() + self.rejections.len()
    }
}

/// Lexical view of one block before any acceptance decision.
#[derive(Debug, Default)]
struct LexedBlock<'a> {
    line_count: usize,
    question: Option<&'a str>,
    options: BTreeMap<OptionLabel, &'a str>,
    correct_answer: Option<OptionLabel>,
    explanation: Option<&'a str>,
}

/// Parses a completion and keeps only the fully formed questions, in order.
pub fn parse_questions(raw: &str) -> Vec<QuizQuestion> {
    parse_response(raw).questions
}

/// Parses a completion, also reporting why each dropped block was rejected.
pub fn parse_response(raw: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (index, block) in split_blocks(raw).enumerate() {
        let block_index = index + 1;
        match validate(lex_block(block)) {
            Ok(question) => outcome.questions.push(question),
            Err(reason) => {
                log::debug!("Skipping question block {}: {}", block_index, reason);
                outcome.rejections.push(BlockRejection {
                    block_index,
                    reason,
                });
            }
        }
    }

    outcome
}

/// Everything before the first delimiter is preamble and never yields a block.
fn split_blocks(raw: &str) -> impl Iterator<Item = &str> {
    QUESTION_DELIMITER.split(raw).skip(1)
}

fn lex_block(block: &str) -> LexedBlock<'_> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut lexed = LexedBlock {
        line_count: lines.len(),
        question: lines.first().copied().map(strip_emphasis),
        ..LexedBlock::default()
    };

    for (label, text) in lines
        .iter()
        .copied()
        .filter_map(lex_option)
        .take(OptionLabel::ALL.len())
    {
        lexed.options.insert(label, text);
    }

    // The question line never carries answer or explanation markers.
    let body = lines.get(1..).unwrap_or_default();

    lexed.correct_answer = body
        .iter()
        .copied()
        .find_map(|line| CORRECT_ANSWER_LINE.find(line).map(|m| &line[m.end()..]))
        .and_then(|rest| rest.chars().find_map(OptionLabel::from_char));

    lexed.explanation = body
        .iter()
        .copied()
        .find_map(|line| EXPLANATION_LINE.find(line).map(|m| &line[m.end()..]))
        .map(strip_emphasis);

    lexed
}

fn strip_emphasis(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '*')
}

fn lex_option(line: &str) -> Option<(OptionLabel, &str)> {
    let captures = OPTION_LINE.captures(line)?;
    let label = captures
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(OptionLabel::from_char)?;
    let text = captures.get(2)?.as_str().trim();
    Some((label, text))
}

fn validate(lexed: LexedBlock<'_>) -> Result<QuizQuestion, RejectionReason> {
    if lexed.line_count < MIN_BLOCK_LINES {
        return Err(RejectionReason::TooFewLines {
            found: lexed.line_count,
        });
    }

    let question = lexed.question.ok_or(RejectionReason::MissingQuestion)?;

    if lexed.options.len() != OptionLabel::ALL.len() {
        return Err(RejectionReason::IncompleteOptions {
            found: lexed.options.len(),
        });
    }

    let correct_answer = lexed
        .correct_answer
        .ok_or(RejectionReason::MissingCorrectAnswer)?;

    let explanation = lexed
        .explanation
        .filter(|e| !e.is_empty())
        .ok_or(RejectionReason::MissingExplanation)?;

    let options = lexed
        .options
        .into_iter()
        .map(|(label, text)| (label, text.to_string()))
        .collect();

    Ok(QuizQuestion::new(
        question,
        options,
        correct_answer,
        explanation,
    )?)
}
