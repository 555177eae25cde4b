use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::ApiCredentials,
    config::Config,
    errors::{AppError, AppResult},
    models::{
        domain::StudySession,
        dto::{
            request::GenerateQuestionsRequest,
            response::{CredentialsResponse, GenerationResponse, ParseResponse},
        },
    },
    services::{
        completion_client::CompletionClient,
        export_service::{export_file_name, export_questions},
        generation_cache::{CacheKey, GenerationCache},
        prompt_builder::build_prompt,
        response_parser::parse_response,
        session_service::SessionService,
    },
};

pub struct QuestionService {
    client: Arc<dyn CompletionClient>,
    cache: Arc<GenerationCache>,
    sessions: Arc<SessionService>,
    config: Arc<Config>,
}

/// Plain-text download of a session's questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub body: String,
}

impl QuestionService {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        cache: Arc<GenerationCache>,
        sessions: Arc<SessionService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            client,
            cache,
            sessions,
            config,
        }
    }

    /// Checks user input before anything leaves the process. Returns the question count to use.
    pub fn validate_request(&self, request: &GenerateQuestionsRequest) -> AppResult<u8> {
        request.validate()?;

        let min_chars = self.config.min_content_chars;
        if request.content().chars().count() < min_chars {
            return Err(AppError::ValidationError(format!(
                "Please provide at least {} characters of study material",
                min_chars
            )));
        }

        let count = request.count.unwrap_or(self.config.default_questions);
        let (min, max) = (self.config.min_questions, self.config.max_questions);
        if !(min..=max).contains(&count) {
            return Err(AppError::ValidationError(format!(
                "Question count must be between {} and {}, got {}",
                min, max, count
            )));
        }

        if self.config.require_topic && request.topic().is_none() {
            return Err(AppError::ValidationError(
                "Please specify a study topic".to_string(),
            ));
        }

        Ok(count)
    }

    /// Runs one generation cycle for a session: prompt, completion, parse, store.
    ///
    /// At most one cycle runs per session. Failures and empty parses leave the
    /// session's current questions untouched.
    pub async fn generate(
        &self,
        session_id: &Uuid,
        request: GenerateQuestionsRequest,
        credentials: &ApiCredentials,
    ) -> AppResult<GenerationResponse> {
        let count = self.validate_request(&request)?;
        let session = self.sessions.begin_generation(session_id).await?;

        let result = self
            .run_generation(session, &request, count, credentials)
            .await;

        if let Err(e) = self.sessions.finish_generation(session_id).await {
            log::error!("Failed to release generation lock for session {}: {}", session_id, e);
        }

        result
    }

    async fn run_generation(
        &self,
        mut session: StudySession,
        request: &GenerateQuestionsRequest,
        count: u8,
        credentials: &ApiCredentials,
    ) -> AppResult<GenerationResponse> {
        let content = request.content();
        let topic = request
            .topic()
            .map(str::to_string)
            .or_else(|| session.topic.clone());
        let model = self.config.completion_model.as_str();

        if session.content_changed(content) {
            if let Some(previous) = session.last_content.as_deref() {
                self.cache.invalidate_content(previous).await;
            }
        }

        let key = CacheKey::new(content, count, topic.as_deref(), model);
        let (completion, cached) = match self.cache.get(&key).await {
            Some(completion) => {
                log::info!("Serving cached completion for session {}", session.id);
                (completion, true)
            }
            None => {
                let prompt = build_prompt(content, topic.as_deref(), count);
                let completion = self
                    .client
                    .complete(&prompt, model, credentials)
                    .await
                    .map_err(|e| {
                        log::warn!("Completion failed for session {}: {}", session.id, e);
                        AppError::from(e)
                    })?;
                (completion, false)
            }
        };

        let outcome = parse_response(&completion);
        let parsed = outcome.questions.len();
        log::info!(
            "Session {}: parsed {} of {} requested questions ({} blocks skipped)",
            session.id,
            parsed,
            count,
            outcome.rejections.len()
        );

        if parsed == 0 {
            return Ok(GenerationResponse {
                session_id: session.id,
                requested: count,
                parsed,
                questions: Vec::new(),
                skipped: outcome.rejections,
                warning: generation_warning(parsed, count),
                cached,
                raw_completion: Some(completion),
            });
        }

        // Unparseable completions are not cached, so a retry reaches the model again.
        if !cached {
            self.cache.insert(&key, completion).await;
        }

        session.topic = topic;
        session.last_content = Some(content.to_string());
        session.replace_questions(outcome.questions);
        let session = self.sessions.save_session(session).await?;

        Ok(GenerationResponse {
            session_id: session.id,
            requested: count,
            parsed,
            questions: session.questions,
            skipped: outcome.rejections,
            warning: generation_warning(parsed, count),
            cached,
            raw_completion: None,
        })
    }

    /// Parses a completion the caller already holds, without contacting the model.
    pub fn parse_completion(raw: &str) -> ParseResponse {
        parse_response(raw).into()
    }

    pub async fn verify_credentials(
        &self,
        credentials: &ApiCredentials,
    ) -> AppResult<CredentialsResponse> {
        let model = self.config.completion_model.clone();
        self.client.verify_credentials(&model, credentials).await?;
        Ok(CredentialsResponse { valid: true, model })
    }

    /// Empties a session and forgets cached completions for its study material.
    pub async fn clear_session(&self, session_id: &Uuid) -> AppResult<StudySession> {
        let session = self.sessions.get_session(session_id).await?;
        if let Some(content) = session.last_content.as_deref() {
            self.cache.invalidate_content(content).await;
        }
        self.sessions.clear_session(session_id).await
    }

    pub async fn export_session(&self, session_id: &Uuid) -> AppResult<ExportFile> {
        let session = self.sessions.get_session(session_id).await?;
        if session.questions.is_empty() {
            return Err(AppError::NotFound(
                "This session has no questions to export yet".to_string(),
            ));
        }

        Ok(ExportFile {
            file_name: export_file_name(session.topic.as_deref()),
            body: export_questions(&session.questions, session.topic.as_deref()),
        })
    }
}

fn generation_warning(parsed: usize, requested: u8) -> Option<String> {
    if parsed == 0 {
        Some("No questions could be parsed from the response. Please try again or adjust your study material.".to_string())
    } else if parsed < requested as usize {
        Some(format!(
            "Only {} of {} requested questions could be parsed.",
            parsed, requested
        ))
    } else {
        None
    }
}
