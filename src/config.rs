use crate::types::{AppError, AppResult};
use serde::Deserialize;
use std::env;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llama3";
pub const DEFAULT_CHUNK_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub chunking: ChunkingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    /// Sessions idle for longer than this are dropped; 0 keeps them forever
    pub session_idle_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub generate_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingConfig {
    pub max_chunk_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub json: bool,
    pub directory: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8501,
                host: "0.0.0.0".to_string(),
                cors_allowed_origins: vec!["*".to_string()],
                max_upload_bytes: 50 * 1024 * 1024,
                session_idle_secs: 3600,
            },
            llm: LLMConfig {
                generate_url: DEFAULT_OLLAMA_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                request_timeout_secs: 300,
            },
            chunking: ChunkingConfig {
                max_chunk_chars: DEFAULT_CHUNK_MAX_CHARS,
            },
            logging: LoggingConfig {
                json: false,
                directory: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key/value source, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            server: ServerConfig {
                port: parse_or(&lookup, "PORT", defaults.server.port)?,
                host: lookup("HOST").unwrap_or(defaults.server.host),
                cors_allowed_origins: lookup("ALLOWED_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or(defaults.server.cors_allowed_origins),
                max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_MB", 50usize)?
                    .saturating_mul(1024 * 1024),
                session_idle_secs: parse_or(
                    &lookup,
                    "SESSION_IDLE_SECS",
                    defaults.server.session_idle_secs,
                )?,
            },
            llm: LLMConfig {
                generate_url: lookup("OLLAMA_URL").unwrap_or(defaults.llm.generate_url),
                model: lookup("OLLAMA_MODEL").unwrap_or(defaults.llm.model),
                request_timeout_secs: parse_or(
                    &lookup,
                    "OLLAMA_TIMEOUT_SECS",
                    defaults.llm.request_timeout_secs,
                )?,
            },
            chunking: ChunkingConfig {
                max_chunk_chars: parse_or(
                    &lookup,
                    "CHUNK_MAX_CHARS",
                    defaults.chunking.max_chunk_chars,
                )?,
            },
            logging: LoggingConfig {
                json: lookup("LOG_FORMAT")
                    .map(|format| format.eq_ignore_ascii_case("json"))
                    .unwrap_or(defaults.logging.json),
                directory: lookup("LOG_DIR").filter(|dir| !dir.trim().is_empty()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.chunking.max_chunk_chars == 0 {
            return Err(AppError::InvalidArgument(
                "CHUNK_MAX_CHARS must be greater than zero".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "OLLAMA_MODEL must not be empty".to_string(),
            ));
        }
        reqwest::Url::parse(&self.llm.generate_url).map_err(|e| {
            AppError::InvalidArgument(format!(
                "OLLAMA_URL '{}' is not a valid URL: {}",
                self.llm.generate_url, e
            ))
        })?;
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            AppError::InvalidArgument(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppResult<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.llm.generate_url, "http://localhost:11434/api/generate");
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.chunking.max_chunk_chars, 2000);
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.session_idle_secs, 3600);
        assert_eq!(config.server.cors_allowed_origins, vec!["*".to_string()]);
        assert!(!config.logging.json);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("OLLAMA_URL", "http://gpu-box:11434/api/generate"),
            ("OLLAMA_MODEL", "mistral"),
            ("CHUNK_MAX_CHARS", "500"),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test"),
            ("MAX_UPLOAD_MB", "2"),
            ("LOG_FORMAT", "JSON"),
            ("SESSION_IDLE_SECS", "0"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.generate_url, "http://gpu-box:11434/api/generate");
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.chunking.max_chunk_chars, 500);
        assert_eq!(
            config.server.cors_allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(config.server.max_upload_bytes, 2 * 1024 * 1024);
        assert!(config.logging.json);
        assert_eq!(config.server.session_idle_secs, 0);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = config_from(&[("CHUNK_MAX_CHARS", "0")]).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_negative_chunk_size_rejected() {
        let err = config_from(&[("CHUNK_MAX_CHARS", "-5")]).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = config_from(&[("OLLAMA_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
