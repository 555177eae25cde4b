use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::domain::{QuizQuestion, StudySession},
    services::response_parser::{BlockRejection, ParseOutcome},
};

#[derive(Debug, Clone, Serialize)]
pub struct SessionDto {
    pub id: Uuid,
    pub topic: Option<String>,
    pub question_count: usize,
    pub questions: Vec<QuizQuestion>,
    pub generation_in_flight: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<StudySession> for SessionDto {
    fn from(session: StudySession) -> Self {
        SessionDto {
            id: session.id,
            topic: session.topic,
            question_count: session.questions.len(),
            questions: session.questions,
            generation_in_flight: session.generation_in_flight,
            created_at: session.created_at,
            modified_at: session.modified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    pub session_id: Uuid,
    pub requested: u8,
    pub parsed: usize,
    pub questions: Vec<QuizQuestion>,
    pub skipped: Vec<BlockRejection>,
    pub warning: Option<String>,
    pub cached: bool,
    /// Only returned when nothing could be parsed, to help the user adjust input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_completion: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub parsed: usize,
    pub questions: Vec<QuizQuestion>,
    pub skipped: Vec<BlockRejection>,
}

impl From<ParseOutcome> for ParseResponse {
    fn from(outcome: ParseOutcome) -> Self {
        ParseResponse {
            parsed: outcome.questions.len(),
            questions: outcome.questions,
            skipped: outcome.rejections,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialsResponse {
    pub valid: bool,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}
