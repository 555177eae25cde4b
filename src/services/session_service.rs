use std::sync::Arc;

use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::StudySession,
    repositories::SessionRepository,
};

pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_session(&self, topic: Option<&str>) -> AppResult<StudySession> {
        let session = self.repository.create(StudySession::new(topic)).await?;
        log::info!("Created study session {}", session.id);
        Ok(session)
    }

    pub async fn get_session(&self, id: &Uuid) -> AppResult<StudySession> {
        let session = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))?;

        Ok(session)
    }

    pub async fn save_session(&self, session: StudySession) -> AppResult<StudySession> {
        self.repository.update(session).await
    }

    /// Drops the current questions and remembered content.
    pub async fn clear_session(&self, id: &Uuid) -> AppResult<StudySession> {
        let mut session = self.get_session(id).await?;
        session.clear();
        self.repository.update(session).await
    }

    pub async fn delete_session(&self, id: &Uuid) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Session with id '{}' not found",
                id
            )));
        }
        log::info!("Deleted study session {}", id);
        Ok(())
    }

    pub async fn begin_generation(&self, id: &Uuid) -> AppResult<StudySession> {
        match self.repository.try_begin_generation(id).await? {
            None => Err(AppError::NotFound(format!(
                "Session with id '{}' not found",
                id
            ))),
            Some(false) => Err(AppError::Conflict(
                "A generation request is already running for this session".to_string(),
            )),
            Some(true) => self.get_session(id).await,
        }
    }

    pub async fn finish_generation(&self, id: &Uuid) -> AppResult<()> {
        self.repository.end_generation(id).await
    }
}
