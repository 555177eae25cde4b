use std::time::Duration;

use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::ApiCredentials;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("the completion service rejected the API key: {0}")]
    Authentication(String),

    #[error("could not reach the completion service: {0}")]
    Network(String),

    #[error("the completion service returned an error: {0}")]
    Service(String),

    #[error("the completion service returned no text")]
    EmptyResponse,
}

impl From<OpenAIError> for CompletionError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::ApiError(api) => {
                let code = api.code.clone().unwrap_or_default().to_lowercase();
                let kind = api.r#type.clone().unwrap_or_default().to_lowercase();
                let message = api.message.to_lowercase();
                let auth_failure = code.contains("api_key")
                    || kind.contains("authentication")
                    || kind.contains("permission")
                    || message.contains("api key");

                if auth_failure {
                    CompletionError::Authentication(api.message.clone())
                } else {
                    CompletionError::Service(api.message.clone())
                }
            }
            other => CompletionError::Network(other.to_string()),
        }
    }
}

/// Boundary to the hosted language model. One prompt in, free text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        credentials: &ApiCredentials,
    ) -> Result<String, CompletionError>;

    /// Cheap round trip that only checks the key is accepted.
    async fn verify_credentials(
        &self,
        model: &str,
        credentials: &ApiCredentials,
    ) -> Result<(), CompletionError>;
}

/// Client for any OpenAI-compatible chat completion endpoint.
pub struct OpenAiCompletionClient {
    api_base: String,
}

impl OpenAiCompletionClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    // Built per call so the caller's key never outlives the request.
    fn client_for(&self, credentials: &ApiCredentials) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_base(self.api_base.as_str())
            .with_api_key(credentials.expose());
        Client::with_config(config).with_backoff(single_attempt())
    }
}

/// Backoff policy that gives up after the first failure. Failed generations
/// are surfaced to the user, who decides whether to try again.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        credentials: &ApiCredentials,
    ) -> Result<String, CompletionError> {
        log::info!(
            "Requesting completion from model {} ({} prompt chars)",
            model,
            prompt.chars().count()
        );

        let request = json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response: Value = self
            .client_for(credentials)
            .chat()
            .create_byot(request)
            .await?;

        extract_completion_text(&response)
    }

    async fn verify_credentials(
        &self,
        model: &str,
        credentials: &ApiCredentials,
    ) -> Result<(), CompletionError> {
        let request = json!({
            "model": model,
            "messages": [{ "role": "user", "content": "ping" }],
            "max_tokens": 1,
        });

        let _: Value = self
            .client_for(credentials)
            .chat()
            .create_byot(request)
            .await?;

        Ok(())
    }
}

fn extract_completion_text(response: &Value) -> Result<String, CompletionError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(CompletionError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    #[test]
    fn extracts_first_choice_content() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Question 1: Why?  " } }]
        });

        assert_eq!(
            extract_completion_text(&response),
            Ok("Question 1: Why?".to_string())
        );
    }

    #[test]
    fn blank_or_missing_content_is_empty_response() {
        let blank = json!({ "choices": [{ "message": { "content": "   " } }] });
        assert_eq!(extract_completion_text(&blank), Err(CompletionError::EmptyResponse));

        let missing = json!({ "choices": [] });
        assert_eq!(extract_completion_text(&missing), Err(CompletionError::EmptyResponse));

        let refused = json!({ "choices": [{ "message": { "content": null } }] });
        assert_eq!(extract_completion_text(&refused), Err(CompletionError::EmptyResponse));
    }

    /// Answers every request with a 500 and counts how many arrived.
    async fn failing_upstream() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                read_request(&mut socket).await;

                let body = r#"{"error":{"message":"upstream exploded","type":"server_error","param":null,"code":null}}"#;
                let response = format!(
                    "HTTP/1.1 500 Internal Server Error\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}/v1", addr), hits)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let Ok(n) = socket.read(&mut chunk).await else {
                return;
            };
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    return;
                }
            }
        }
    }

    #[actix_web::test]
    async fn server_errors_are_not_retried() {
        let (api_base, hits) = failing_upstream().await;
        let client = OpenAiCompletionClient::new(api_base);

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            client.complete("prompt", "test-model", &ApiCredentials::new("key")),
        )
        .await
        .expect("a failing upstream should fail fast");

        assert!(matches!(
            result,
            Err(CompletionError::Service(_)) | Err(CompletionError::Network(_))
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_policy_never_schedules_a_retry() {
        use backoff::backoff::Backoff;

        let mut policy = single_attempt();
        policy.reset();
        assert_eq!(policy.next_backoff(), None);
    }

    #[test]
    fn non_api_errors_are_network_failures() {
        let err: CompletionError = OpenAIError::InvalidArgument("bad url".into()).into();
        assert!(matches!(err, CompletionError::Network(_)));
    }
}
