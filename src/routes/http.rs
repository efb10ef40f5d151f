//! HTTP endpoint handlers. Thin wrappers that forward to core logic and map
//! its `Result` onto status codes.
//!
//! Missing or oddly typed fields never fail a request. A body that cannot be
//! read as a JSON object fails generate/regenerate with a 500 and is treated
//! as an empty form by suggest-title.

use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::domain::TitleSuggestions;
use crate::logic::{generate_worksheet, regenerate_problem, suggest_titles, GenerateError};
use crate::protocol::{ErrorOut, HealthOut, RegenerateIn, TitleIn, WorksheetIn};
use crate::state::AppState;

const GENERATE_FAILED: &str = "生成中にエラーが発生しました";
const REGENERATE_FAILED: &str = "再生成中にエラーが発生しました";
const GENERATE_UNPARSEABLE: &str = "AIの応答をパースできませんでした。もう一度お試しください。";
const REGENERATE_UNPARSEABLE: &str = "AIの応答をパースできませんでした。";

/// 500 with `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub String);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorOut { error: self.0 })).into_response()
  }
}

/// Suggest-title only: an unreadable body degrades to empty fields.
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>, route: &str) -> T {
  match payload {
    Ok(Json(body)) => body,
    Err(rejection) => {
      warn!(target: "worksheet_backend", %route, error = %rejection.body_text(), "Unreadable request body; using empty fields");
      T::default()
    }
  }
}

/// Unreadable bodies fail the request before any model call.
fn body_or_error<T>(payload: Result<Json<T>, JsonRejection>, failure: &str) -> Result<T, ApiError> {
  payload.map(|Json(body)| body).map_err(|rejection| {
    warn!(target: "worksheet_backend", error = %rejection.body_text(), "Unreadable request body");
    ApiError(format!("{}: {}", failure, rejection.body_text()))
  })
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip_all)]
pub async fn http_generate(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<WorksheetIn>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  let body = body_or_error(payload, GENERATE_FAILED)?;
  generate_worksheet(&state, &body).await.map(Json).map_err(|e| {
    warn!(target: "worksheet", error = %e, "Worksheet generation failed");
    match e {
      GenerateError::Unparseable => ApiError(GENERATE_UNPARSEABLE.into()),
      GenerateError::Service(e) => ApiError(format!("{}: {}", GENERATE_FAILED, e)),
    }
  })
}

#[instrument(level = "info", skip_all)]
pub async fn http_regenerate_one(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<RegenerateIn>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  let body = body_or_error(payload, REGENERATE_FAILED)?;
  regenerate_problem(&state, &body).await.map(Json).map_err(|e| {
    warn!(target: "worksheet", error = %e, "Problem regeneration failed");
    match e {
      GenerateError::Unparseable => ApiError(REGENERATE_UNPARSEABLE.into()),
      GenerateError::Service(e) => ApiError(format!("{}: {}", REGENERATE_FAILED, e)),
    }
  })
}

/// Best effort: every failure becomes a 200 with a single generic title.
#[instrument(level = "info", skip_all)]
pub async fn http_suggest_title(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<TitleIn>, JsonRejection>,
) -> Response {
  let body = body_or_default(payload, "/api/suggest-title");
  match suggest_titles(&state, &body).await {
    Ok(value) => Json(value).into_response(),
    Err(e) => {
      warn!(target: "worksheet", error = %e, theme = %body.theme, "Title suggestion failed; serving fallback");
      Json(TitleSuggestions::fallback(&body.theme)).into_response()
    }
  }
}
