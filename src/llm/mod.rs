pub mod prompt;
pub mod providers;
pub mod sanitize;

use crate::config::LlmConfig;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM connection error: {0}")]
    Connection(String),
    #[error("LLM response error: {0}")]
    Response(String),
    #[error("LLM configuration error: {0}")]
    Config(String),
}

/// A hosted text-completion model that turns a prompt into raw text.
///
/// Implementations make exactly one request per call and never retry.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, prompt: &str) -> Result<String, LlmError>;
}

pub struct LlmManager {
    translator: Box<dyn Translator>,
}

impl LlmManager {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let translator: Box<dyn Translator> = match config.backend.as_str() {
            "remote" => Box::new(providers::remote::RemoteLlmProvider::new(config)?),
            "ollama" => Box::new(providers::ollama::OllamaProvider::new(config)?),
            _ => {
                return Err(LlmError::Config(format!(
                    "Unsupported LLM backend: {}",
                    config.backend
                )))
            }
        };

        Ok(Self { translator })
    }

    pub fn with_translator(translator: Box<dyn Translator>) -> Self {
        Self { translator }
    }

    pub async fn translate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!("Sending prompt of {} chars to translator", prompt.len());
        self.translator.translate(prompt).await
    }
}
