use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::domain::quiz_question::QuizQuestion;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StudySession {
    pub id: Uuid,
    pub topic: Option<String>, // Set on create, replaced by the latest generation request
    #[serde(skip_serializing)]
    pub last_content: Option<String>, // Study material behind the current questions
    pub questions: Vec<QuizQuestion>,
    pub generation_in_flight: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl StudySession {
    pub fn new(topic: Option<&str>) -> Self {
        let now = Utc::now();
        StudySession {
            id: Uuid::new_v4(),
            topic: topic
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            last_content: None,
            questions: Vec::new(),
            generation_in_flight: false,
            created_at: now,
            modified_at: now,
        }
    }

    /// Swaps in a new question set; previous questions are discarded, never merged.
    pub fn replace_questions(&mut self, questions: Vec<QuizQuestion>) {
        self.questions = questions;
        self.modified_at = Utc::now();
    }

    pub fn clear(&mut self) {
        self.questions.clear();
        self.last_content = None;
        self.modified_at = Utc::now();
    }

    pub fn content_changed(&self, content: &str) -> bool {
        self.last_content.as_deref() != Some(content)
    }
}
