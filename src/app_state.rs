use std::sync::Arc;

use crate::{
    config::Config,
    repositories::InMemorySessionRepository,
    services::{
        completion_client::{CompletionClient, OpenAiCompletionClient},
        generation_cache::GenerationCache,
        question_service::QuestionService,
        session_service::SessionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub question_service: Arc<QuestionService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = Arc::new(OpenAiCompletionClient::new(
            config.completion_api_base.clone(),
        ));
        Self::with_client(config, client)
    }

    /// Wires the services around a given completion backend.
    pub fn with_client(config: Config, client: Arc<dyn CompletionClient>) -> Self {
        let config = Arc::new(config);

        let session_repository = Arc::new(InMemorySessionRepository::with_idle_ttl(
            config.session_idle_ttl(),
        ));
        let session_service = Arc::new(SessionService::new(session_repository));

        let cache = Arc::new(GenerationCache::new(config.cache_ttl()));
        if !cache.is_enabled() {
            log::info!("Completion cache disabled (CACHE_TTL_SECONDS=0)");
        }

        let question_service = Arc::new(QuestionService::new(
            client,
            cache,
            session_service.clone(),
            config.clone(),
        ));

        Self {
            session_service,
            question_service,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[actix_web::test]
    async fn test_services_share_session_store() {
        let state = AppState::new(Config::test_config());
        let session = state.session_service.create_session(Some("Physics")).await.unwrap();

        let err = state.question_service.export_session(&session.id).await.unwrap_err();
        assert!(matches!(err, crate::errors::AppError::NotFound(_)));
    }
}
