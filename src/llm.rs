//! Text-generation seam. Handlers only see `TextGenerator`; the production
//! implementation is `crate::gemini::Gemini`.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("HTTP {status}: {message}")]
  Http { status: u16, message: String },
  #[error("unexpected response body: {0}")]
  Decode(String),
  #[error("model returned no text")]
  EmptyResponse,
}

/// One prompt in, one completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
  /// Short name used in logs.
  fn name(&self) -> &'static str;

  async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError>;
}
