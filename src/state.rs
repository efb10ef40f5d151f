//! Application state shared by every request.
//!
//! Holds the one long-lived text generator (built once at startup), the model
//! id passed to it, and the prompt templates. Nothing here is mutated after
//! construction.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{load_worksheet_config_from_env, Prompts, Settings};
use crate::gemini::Gemini;
use crate::llm::{LlmError, TextGenerator};

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn TextGenerator>,
    pub model: String,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from settings + optional TOML prompt overrides.
    #[instrument(level = "info", skip_all)]
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        let prompts = load_worksheet_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        if settings.api_key.is_empty() {
            warn!(target: "worksheet_backend", "GEMINI_API_KEY is not set; generation requests will fail upstream.");
        }

        let gemini = Gemini::from_settings(settings)?;
        info!(target: "worksheet_backend", base_url = %gemini.base_url, model = %settings.model, timeout = ?settings.timeout, "Gemini client ready.");

        Ok(Self::new(Arc::new(gemini), settings.model.clone(), prompts))
    }

    pub fn new(llm: Arc<dyn TextGenerator>, model: String, prompts: Prompts) -> Self {
        Self { llm, model, prompts }
    }
}
