//! Generative model client
//!
//! The rest of the app only sees [`TextModel`]: one prompt in, one text
//! reply out. `main` builds the Gemini implementation from config and hands
//! it to `AppState`; tests substitute their own.

use std::sync::Arc;

use async_trait::async_trait;

mod error;
mod gemini;

pub use error::LlmError;
pub use gemini::GeminiClient;

use crate::config::LlmConfig;

#[async_trait]
pub trait TextModel: Send + Sync {
    /// Sends a single prompt and returns the model's text reply.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Identifier used in logs.
    fn name(&self) -> &str;
}

pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn TextModel>, LlmError> {
    Ok(Arc::new(GeminiClient::from_config(config)?))
}
