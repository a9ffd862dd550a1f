use crate::chunker::Chunker;
use crate::config::Config;
use crate::llm::LLMAdapter;
use crate::session::SessionRegistry;
use crate::types::{AppResult, DocumentKind};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionRegistry,
    pub llm: Arc<dyn LLMAdapter>,
    pub chunker: Chunker,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn LLMAdapter>) -> AppResult<Self> {
        let chunker = Chunker::new(config.chunking.max_chunk_chars)?;
        Ok(Self {
            config,
            sessions: SessionRegistry::default(),
            llm,
            chunker,
        })
    }
}

/// Extracted text of the most recent upload, replaced wholesale on the next one
#[derive(Debug, Clone, serde::Serialize)]
pub struct DocumentContext {
    pub filename: String,
    pub kind: DocumentKind,
    #[serde(skip)]
    pub text: String,
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentContext {
    pub fn new(filename: impl Into<String>, kind: DocumentKind, text: String) -> Self {
        Self {
            filename: filename.into(),
            kind,
            text,
            uploaded_at: Utc::now(),
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Per-browser-session state: document context, transcript and upload status
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub document: Option<DocumentContext>,
    pub messages: Vec<ChatMessage>,
    pub upload_status: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            document: None,
            messages: Vec::new(),
            upload_status: "No file uploaded".to_string(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// How long the session has gone without a read or write, as of `now`
    pub fn idle_for(&self, now: DateTime<Utc>) -> std::time::Duration {
        (now - self.last_active).to_std().unwrap_or_default()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// API Request/Response types

#[derive(Debug, serde::Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, serde::Serialize)]
pub struct DocumentSummary {
    pub filename: String,
    pub kind: DocumentKind,
    pub characters: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&DocumentContext> for DocumentSummary {
    fn from(document: &DocumentContext) -> Self {
        Self {
            filename: document.filename.clone(),
            kind: document.kind,
            characters: document.char_count(),
            uploaded_at: document.uploaded_at,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub upload_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentSummary>,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            upload_status: session.upload_status.clone(),
            document: session.document.as_ref().map(DocumentSummary::from),
            messages: session.messages.clone(),
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub document: DocumentSummary,
}

#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ChatResponse {
    /// The assistant reply shown in the transcript
    pub text: String,
    #[serde(flatten)]
    pub mode: crate::agents::ReplyMode,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub model: String,
    pub inference: String,
    /// Live sessions held in memory
    pub sessions: usize,
}
