use crate::config::LLMConfig;
use crate::types::AppResult;
use async_trait::async_trait;
use std::sync::Arc;

/// A text-generation backend that turns one prompt into one reply.
///
/// Implementations make exactly one request per call and surface the
/// first failure to the caller.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Whether the backend is reachable and answering
    async fn health_check(&self) -> AppResult<bool>;

    fn model(&self) -> &str;
}

/// Build the adapter described by the configuration
pub fn create_adapter(config: &LLMConfig) -> AppResult<Arc<dyn LLMAdapter>> {
    let adapter = crate::llm::ollama::OllamaAdapter::from_config(config)?;
    Ok(Arc::new(adapter))
}
