use std::{env, time::Duration};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_COMPLETION_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_COMPLETION_MODEL: &str = "gemini-1.5-flash";

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub allowed_origin: Option<String>,
    pub completion_api_base: String,
    pub completion_model: String,
    pub cache_ttl_seconds: u64,
    pub min_content_chars: usize,
    pub min_questions: u8,
    pub max_questions: u8,
    pub default_questions: u8,
    pub require_topic: bool,
    pub session_idle_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: parse_env("WEB_SERVER_PORT", 8080),
            allowed_origin: env::var("ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
            completion_api_base: env::var("COMPLETION_API_BASE")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_API_BASE.to_string()),
            completion_model: env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string()),
            cache_ttl_seconds: parse_env("CACHE_TTL_SECONDS", 3600),
            min_content_chars: parse_env("MIN_CONTENT_CHARS", 50),
            min_questions: parse_env("MIN_QUESTIONS", 1),
            max_questions: parse_env("MAX_QUESTIONS", 10),
            default_questions: parse_env("DEFAULT_QUESTIONS", 5),
            require_topic: parse_env("REQUIRE_TOPIC", false),
            session_idle_seconds: parse_env("SESSION_IDLE_SECONDS", 86400),
        }
    }

    /// Rejects bounds that would make every generation request invalid.
    pub fn validate(&self) -> AppResult<()> {
        if self.min_questions == 0 {
            return Err(AppError::ValidationError(
                "MIN_QUESTIONS must be at least 1".to_string(),
            ));
        }
        if self.min_questions > self.max_questions {
            return Err(AppError::ValidationError(format!(
                "MIN_QUESTIONS ({}) exceeds MAX_QUESTIONS ({})",
                self.min_questions, self.max_questions
            )));
        }
        if !(self.min_questions..=self.max_questions).contains(&self.default_questions) {
            return Err(AppError::ValidationError(format!(
                "DEFAULT_QUESTIONS ({}) must lie within {}..={}",
                self.default_questions, self.min_questions, self.max_questions
            )));
        }
        if self.completion_model.trim().is_empty() {
            return Err(AppError::ValidationError(
                "COMPLETION_MODEL must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_seconds)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            allowed_origin: None,
            completion_api_base: "http://localhost:9/v1".to_string(),
            completion_model: "test-model".to_string(),
            cache_ttl_seconds: 60,
            min_content_chars: 50,
            min_questions: 1,
            max_questions: 10,
            default_questions: 5,
            require_topic: false,
            session_idle_seconds: 3600,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
