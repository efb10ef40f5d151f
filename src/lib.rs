//! Worksheet backend library: prompt rendering, model-output extraction,
//! the Gemini client, and the axum router. `main.rs` wires them together.

pub mod config;
pub mod domain;
pub mod extract;
pub mod gemini;
pub mod llm;
pub mod logic;
pub mod prompt;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod util;
