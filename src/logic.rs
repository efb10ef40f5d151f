//! Core behaviors behind the HTTP handlers.
//!
//! Each intent is: render prompt -> one model call -> JSON extraction. Results
//! are explicit; status codes and fallbacks are decided in `routes::http`.
//! Model JSON is passed through untouched. The domain types are only used to
//! log when the payload does not have the requested shape.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::{Problem, TitleSuggestions, Worksheet};
use crate::extract::parse_model_json;
use crate::llm::LlmError;
use crate::prompt::{regenerate_prompt, title_prompt, worksheet_prompt};
use crate::protocol::{RegenerateIn, TitleIn, WorksheetIn};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[derive(Debug, Error)]
pub enum GenerateError {
  /// Neither strict parsing nor the brace-span fallback produced JSON.
  #[error("model response could not be parsed as JSON")]
  Unparseable,
  #[error(transparent)]
  Service(#[from] LlmError),
}

#[instrument(level = "info", skip(state, req), fields(grade = %req.grade, subject = %req.subject, count = req.count()))]
pub async fn generate_worksheet(state: &AppState, req: &WorksheetIn) -> Result<Value, GenerateError> {
  let prompt = worksheet_prompt(&state.prompts, req);
  let value = complete_json(state, &prompt).await?;

  if let Some(ws) = shape_check::<Worksheet>(&value, "worksheet") {
    let mismatched = ws.problems.iter().filter(|p| !p.choices_match_format()).count();
    if ws.problems.len() != req.count() as usize || mismatched > 0 {
      warn!(target: "worksheet", requested = req.count(), returned = ws.problems.len(), mismatched_choices = mismatched, "Worksheet deviates from requested layout");
    }
    info!(target: "worksheet", title = %ws.title, problems = ws.problems.len(), "Worksheet generated");
  }
  Ok(value)
}

#[instrument(level = "info", skip(state, req), fields(problem_number = req.problem_number(), current_len = req.current_question.len()))]
pub async fn regenerate_problem(state: &AppState, req: &RegenerateIn) -> Result<Value, GenerateError> {
  let prompt = regenerate_prompt(&state.prompts, req);
  let value = complete_json(state, &prompt).await?;

  if let Some(p) = shape_check::<Problem>(&value, "problem") {
    if p.question == req.current_question {
      warn!(target: "worksheet", number = p.number, "Regenerated problem repeats the current question");
    }
    info!(target: "worksheet", number = p.number, kind = p.kind.label(), "Problem regenerated");
  }
  Ok(value)
}

#[instrument(level = "info", skip(state, req), fields(theme = %req.theme))]
pub async fn suggest_titles(state: &AppState, req: &TitleIn) -> Result<Value, GenerateError> {
  let prompt = title_prompt(&state.prompts, req);
  let value = complete_json(state, &prompt).await?;

  if let Some(t) = shape_check::<TitleSuggestions>(&value, "titles") {
    info!(target: "worksheet", suggestions = t.titles.len(), "Titles suggested");
  }
  Ok(value)
}

async fn complete_json(state: &AppState, prompt: &str) -> Result<Value, GenerateError> {
  let text = state.llm.generate(&state.model, prompt).await?;
  parse_model_json(&text).ok_or_else(|| {
    warn!(target: "worksheet", provider = state.llm.name(), text_len = text.len(), preview = %trunc_for_log(&text, 120), "Model response is not JSON");
    GenerateError::Unparseable
  })
}

/// Deserialize a copy for inspection only; mismatches are logged, never rejected.
fn shape_check<T: DeserializeOwned>(value: &Value, what: &str) -> Option<T> {
  match serde_json::from_value::<T>(value.clone()) {
    Ok(t) => Some(t),
    Err(e) => {
      warn!(target: "worksheet", %what, error = %e, "Model JSON does not match the requested shape; passing through");
      None
    }
  }
}
