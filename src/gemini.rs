//! Minimal Gemini client for our use-case.
//!
//! We only call `models/{model}:generateContent` with a single user turn and read
//! back the text parts of the first candidate.
//! Calls are instrumented and log model names, latencies, and token usage (not contents).
//!
//! NOTE: We never log the API key; the key travels in a header, not the URL.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::config::Settings;
use crate::llm::{LlmError, TextGenerator};
use crate::util::trunc_for_log;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
}

impl Gemini {
  pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, LlmError> {
    // Whole-request timeout; expiry surfaces as `LlmError::Transport`.
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, api_key, base_url: base_url.trim_end_matches('/').to_string() })
  }

  pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
    Self::new(settings.api_key.clone(), settings.base_url.clone(), settings.timeout)
  }

  fn endpoint(&self, model: &str) -> String {
    format!("{}/models/{}:generateContent", self.base_url, model)
  }
}

#[async_trait]
impl TextGenerator for Gemini {
  fn name(&self) -> &'static str {
    "gemini"
  }

  #[instrument(level = "info", skip(self, prompt), fields(model = %model, prompt_len = prompt.len()))]
  async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
    let req = GenerateContentRequest {
      contents: vec![Content { role: "user".into(), parts: vec![TextPart { text: prompt.into() }] }],
    };

    let start = Instant::now();
    let res = self
      .client
      .post(self.endpoint(model))
      .header(USER_AGENT, "worksheet-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(API_KEY_HEADER, &self.api_key)
      .json(&req)
      .send()
      .await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_gemini_error(&body).unwrap_or(body);
      error!(elapsed = ?start.elapsed(), status = status.as_u16(), "Gemini call failed");
      return Err(LlmError::Http { status: status.as_u16(), message });
    }

    let body: GenerateContentResponse = res.json().await.map_err(|e| LlmError::Decode(e.to_string()))?;
    if let Some(usage) = &body.usage_metadata {
      info!(prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }

    let text = completion_text(body)?;
    info!(elapsed = ?start.elapsed(), text_len = text.len(), "Model response received");
    debug!(preview = %trunc_for_log(&text, 200), "Model response preview");
    Ok(text)
  }
}

/// Concatenate the text parts of the first candidate.
fn completion_text(body: GenerateContentResponse) -> Result<String, LlmError> {
  let text: String = body
    .candidates
    .into_iter()
    .next()
    .and_then(|c| c.content)
    .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
    .unwrap_or_default();

  if text.is_empty() { Err(LlmError::EmptyResponse) } else { Ok(text) }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest {
  contents: Vec<Content>,
}
#[derive(Serialize)]
struct Content {
  role: String,
  parts: Vec<TextPart>,
}
#[derive(Serialize)]
struct TextPart {
  text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  #[serde(default)]
  usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Option<CandidateContent>,
}
#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<PartResp>,
}
#[derive(Deserialize)]
struct PartResp {
  #[serde(default)]
  text: Option<String>,
}
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
