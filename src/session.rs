use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{ChatMessage, DocumentContext, Session};
use crate::types::{AppError, AppResult};

/// How often the idle reaper sweeps, unless the idle limit is shorter
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared handle to every live session, keyed by session id
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionRegistry {
    pub async fn create(&self) -> Uuid {
        let session = Session::new();
        let id = session.id;
        let mut guard = self.inner.write().await;
        guard.insert(id, session);
        id
    }

    /// Snapshot of a session; counts as activity
    pub async fn get(&self, session_id: Uuid) -> AppResult<Session> {
        let mut guard = self.inner.write().await;
        let session = guard.get_mut(&session_id).ok_or_else(|| not_found(session_id))?;
        session.touch();
        Ok(session.clone())
    }

    pub async fn remove(&self, session_id: Uuid) -> AppResult<()> {
        let mut guard = self.inner.write().await;
        guard.remove(&session_id).map(|_| ()).ok_or_else(|| not_found(session_id))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Replace the session's document context and upload status
    pub async fn set_document(&self, session_id: Uuid, document: DocumentContext) -> AppResult<()> {
        let mut guard = self.inner.write().await;
        let session = guard.get_mut(&session_id).ok_or_else(|| not_found(session_id))?;
        session.upload_status = format!("Uploaded: {}", document.filename);
        session.document = Some(document);
        session.touch();
        Ok(())
    }

    pub async fn set_upload_status(&self, session_id: Uuid, status: impl Into<String>) -> AppResult<()> {
        let mut guard = self.inner.write().await;
        let session = guard.get_mut(&session_id).ok_or_else(|| not_found(session_id))?;
        session.upload_status = status.into();
        session.touch();
        Ok(())
    }

    /// Copy of the current document text; empty when nothing was uploaded
    pub async fn document_text(&self, session_id: Uuid) -> AppResult<String> {
        let mut guard = self.inner.write().await;
        let session = guard.get_mut(&session_id).ok_or_else(|| not_found(session_id))?;
        session.touch();
        Ok(session
            .document
            .as_ref()
            .map(|document| document.text.clone())
            .unwrap_or_default())
    }

    pub async fn push_message(&self, session_id: Uuid, message: ChatMessage) -> AppResult<()> {
        let mut guard = self.inner.write().await;
        let session = guard.get_mut(&session_id).ok_or_else(|| not_found(session_id))?;
        session.messages.push(message);
        session.touch();
        Ok(())
    }

    /// Drop the transcript; the document context stays
    pub async fn clear_messages(&self, session_id: Uuid) -> AppResult<()> {
        let mut guard = self.inner.write().await;
        let session = guard.get_mut(&session_id).ok_or_else(|| not_found(session_id))?;
        session.messages.clear();
        session.touch();
        Ok(())
    }

    /// End every session idle for at least `max_idle`; returns how many were removed
    pub async fn remove_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|_, session| session.idle_for(now) < max_idle);
        before - guard.len()
    }

    /// Periodically end idle sessions until the returned task is aborted
    pub fn spawn_idle_reaper(&self, max_idle: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        let period = max_idle.min(MAX_SWEEP_INTERVAL).max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let removed = registry.remove_idle(max_idle).await;
                if removed > 0 {
                    let remaining = registry.len().await;
                    info!(removed, remaining, "Ended idle sessions");
                } else {
                    debug!("No idle sessions to end");
                }
            }
        })
    }
}

fn not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("session {}", session_id))
}
