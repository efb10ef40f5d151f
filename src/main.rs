//! Worksheet generator backend
//!
//! - Axum HTTP API that turns form fields into a worksheet via Gemini
//! - Static form page served from ./static
//!
//! Important env variables (a `.env` file is loaded if present):
//!   PORT                  : u16 (default 5000)
//!   GEMINI_API_KEY        : API key (not checked locally; upstream rejects bad keys)
//!   GEMINI_BASE_URL       : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL          : default "gemini-2.5-flash-lite"
//!   GEMINI_TIMEOUT_SECS   : upstream request timeout (default 60)
//!   WORKSHEET_CONFIG_PATH : path to TOML config (prompt template overrides)
//!   STATIC_DIR            : default "./static"
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;

use worksheet_backend::config::Settings;
use worksheet_backend::routes::build_router;
use worksheet_backend::state::AppState;
use worksheet_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  // Missing .env is fine; real env vars still apply.
  let dotenv = dotenvy::dotenv();
  telemetry::init_tracing();
  if let Ok(path) = dotenv {
    info!(target: "worksheet_backend", path = %path.display(), "Loaded .env");
  }

  let settings = Settings::from_env();
  let state = Arc::new(AppState::from_settings(&settings)?);
  let app = build_router(state, &settings.static_dir);

  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "worksheet_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if tokio::signal::ctrl_c().await.is_ok() {
    info!(target: "worksheet_backend", "Shutdown signal received");
  }
}
