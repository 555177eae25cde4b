use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::StudySession,
};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<StudySession>>;
    async fn create(&self, session: StudySession) -> AppResult<StudySession>;
    async fn update(&self, session: StudySession) -> AppResult<StudySession>;
    async fn delete(&self, id: &Uuid) -> AppResult<bool>;
    /// Flags a generation as running; returns `None` when the session is unknown
    /// and `Some(false)` when one was already running.
    async fn try_begin_generation(&self, id: &Uuid) -> AppResult<Option<bool>>;
    async fn end_generation(&self, id: &Uuid) -> AppResult<()>;
}

/// Process-local session store. Sessions vanish on restart.
///
/// With an idle TTL, sessions left unmodified for longer than the TTL are
/// swept whenever a new session is created. Sessions with a generation in
/// flight are always kept. Without one, sessions live until deleted.
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, StudySession>>,
    idle_ttl: Option<Duration>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: None,
        }
    }

    /// A zero TTL disables sweeping.
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: (!idle_ttl.is_zero()).then_some(idle_ttl),
        }
    }
}

fn is_idle(session: &StudySession, idle_ttl: Duration) -> bool {
    if session.generation_in_flight {
        return false;
    }
    (Utc::now() - session.modified_at)
        .to_std()
        .is_ok_and(|idle| idle >= idle_ttl)
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<StudySession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn create(&self, session: StudySession) -> AppResult<StudySession> {
        let mut sessions = self.sessions.write().await;
        if let Some(idle_ttl) = self.idle_ttl {
            let before = sessions.len();
            sessions.retain(|_, existing| !is_idle(existing, idle_ttl));
            let swept = before - sessions.len();
            if swept > 0 {
                log::info!("Swept {} idle study session(s)", swept);
            }
        }
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn update(&self, session: StudySession) -> AppResult<StudySession> {
        let mut sessions = self.sessions.write().await;
        let Some(stored) = sessions.get_mut(&session.id) else {
            return Err(AppError::NotFound(format!(
                "Session with id '{}' not found",
                session.id
            )));
        };
        *stored = session.clone();
        Ok(session)
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id).is_some())
    }

    async fn try_begin_generation(&self, id: &Uuid) -> AppResult<Option<bool>> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(id) else {
            return Ok(None);
        };
        if session.generation_in_flight {
            return Ok(Some(false));
        }
        session.generation_in_flight = true;
        Ok(Some(true))
    }

    async fn end_generation(&self, id: &Uuid) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(id) {
            session.generation_in_flight = false;
        }
        Ok(())
    }
}
