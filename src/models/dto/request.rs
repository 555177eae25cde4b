use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(max = 200))]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuestionsRequest {
    // Lower bound comes from configuration and is checked by the question service.
    #[validate(length(max = 100000))]
    pub content: String,

    #[validate(length(max = 200))]
    pub topic: Option<String>,

    pub count: Option<u8>,
}

impl GenerateQuestionsRequest {
    pub fn topic(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn content(&self) -> &str {
        self.content.trim()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ParseCompletionRequest {
    #[validate(length(min = 1, max = 200000))]
    pub raw: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_topic_is_trimmed_and_blank_is_none() {
        let request = GenerateQuestionsRequest {
            content: "notes".to_string(),
            topic: Some("   ".to_string()),
            count: None,
        };
        assert_eq!(request.topic(), None);

        let request = GenerateQuestionsRequest {
            topic: Some("  Genetics ".to_string()),
            ..request
        };
        assert_eq!(request.topic(), Some("Genetics"));
    }

    #[test]
    fn test_topic_too_long() {
        let request = CreateSessionRequest {
            topic: Some("x".repeat(201)),
        };
        assert!(request.validate().is_err());
        assert!(CreateSessionRequest::default().validate().is_ok());
    }

    #[test]
    fn test_empty_raw_completion_is_invalid() {
        let request = ParseCompletionRequest { raw: String::new() };
        assert!(request.validate().is_err());
    }
}
