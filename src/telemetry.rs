//! Tracing setup.
//!
//! - LOG_LEVEL: `EnvFilter` directives. Defaults to info, with debug for the
//!   crate's own targets (`worksheet` for per-request outcomes,
//!   `worksheet_backend` for startup/config/client logs).
//! - LOG_FORMAT: `json` for one JSON object per line, `compact` for single-line
//!   text, anything else for the default multi-field text format.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,worksheet=debug,worksheet_backend=debug,tower_http=info";

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

pub fn init_tracing() {
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => fmt.json().init(),
        Ok("compact") => fmt.compact().init(),
        _ => fmt.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        let filter = EnvFilter::try_new(DEFAULT_DIRECTIVES).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("worksheet=debug"));
        assert!(rendered.contains("worksheet_backend=debug"));
    }
}
