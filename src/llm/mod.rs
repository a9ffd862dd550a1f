// LLM abstraction layer

pub mod provider;
pub mod ollama;

#[cfg(test)]
pub mod mock;

pub use provider::*;
pub use ollama::OllamaAdapter;
