// Scripted adapter for tests: records every prompt and replays canned replies

use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub struct MockLLMAdapter {
    replies: Mutex<VecDeque<AppResult<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLLMAdapter {
    pub fn new(replies: Vec<AppResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMAdapter for MockLLMAdapter {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Internal("mock has no reply left".to_string())))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
