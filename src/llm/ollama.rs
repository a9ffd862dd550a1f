// Ollama adapter implementation
// Talks to a locally hosted Ollama server through its /api/generate endpoint
// with streaming disabled, so every call is one request and one JSON reply.

use crate::config::LLMConfig;
use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub struct OllamaAdapter {
    client: Client,
    generate_url: Url,
    model: String,
}

// Request types for the Ollama API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

// Response types for the Ollama API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Deserialize)]
struct OllamaErrorResponse {
    error: String,
}

impl OllamaAdapter {
    pub fn new(
        generate_url: impl AsRef<str>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let generate_url = Url::parse(generate_url.as_ref()).map_err(|e| {
            AppError::InvalidArgument(format!(
                "invalid Ollama URL '{}': {}",
                generate_url.as_ref(),
                e
            ))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            generate_url,
            model: model.into(),
        })
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        Self::new(
            &config.generate_url,
            config.model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Root of the Ollama server, which answers GET with a plain status line
    fn server_root(&self) -> Url {
        let mut root = self.generate_url.clone();
        root.set_path("/");
        root.set_query(None);
        root
    }

    fn network_error(e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Network(format!("Ollama request timed out: {}", e))
        } else {
            AppError::Network(format!("Ollama request failed: {}", e))
        }
    }
}

#[async_trait]
impl LLMAdapter for OllamaAdapter {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            url = %self.generate_url,
            "Sending generate request"
        );

        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.generate_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(Self::network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(Self::network_error)?;

        if !status.is_success() {
            if let Ok(error_response) = serde_json::from_str::<OllamaErrorResponse>(&body) {
                return Err(AppError::Network(format!(
                    "Ollama API error ({}): {}",
                    status, error_response.error
                )));
            }

            return Err(AppError::Network(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        let parsed: OllamaGenerateResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::Protocol(format!("Failed to parse Ollama response: {}", e))
        })?;

        match parsed.response {
            Some(text) => {
                info!(
                    model = %self.model,
                    response_len = text.len(),
                    prompt_tokens = ?parsed.prompt_eval_count,
                    completion_tokens = ?parsed.eval_count,
                    done_reason = ?parsed.done_reason,
                    "Generate request completed"
                );
                Ok(text)
            }
            None => match parsed.error {
                Some(error) => Err(AppError::Protocol(format!(
                    "Ollama reported an error: {}",
                    error
                ))),
                None => Err(AppError::Protocol(
                    "Ollama response is missing the 'response' field".to_string(),
                )),
            },
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        let response = self
            .client
            .get(self.server_root())
            .send()
            .await
            .map_err(Self::network_error)?;

        Ok(response.status().is_success())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
