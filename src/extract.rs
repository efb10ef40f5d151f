//! Recover a JSON value from raw model text.
//!
//! Models are told to answer with bare JSON but routinely wrap it in a
//! markdown fence or add a sentence before/after. Order of attempts:
//! 1) strip an opening ```/```json fence and a closing ``` fence,
//! 2) strict parse of what is left,
//! 3) strict parse of the greedy `{ ... last }` span.
//!
//! `None` means nothing structured could be recovered; the caller decides the fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:json)?\s*\n?").expect("valid regex"));
static FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n?```\s*$").expect("valid regex"));
static BRACE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"));

pub fn parse_model_json(text: &str) -> Option<Value> {
  let mut text = text.trim().to_string();
  if text.starts_with("```") {
    text = FENCE_OPEN.replace(&text, "").into_owned();
    text = FENCE_CLOSE.replace(&text, "").into_owned();
  }

  if let Ok(v) = serde_json::from_str::<Value>(&text) {
    return Some(v);
  }

  let span = BRACE_SPAN.find(&text)?;
  serde_json::from_str::<Value>(span.as_str()).ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn plain_json_is_parsed() {
    assert_eq!(parse_model_json(r#"{"a": 1}"#), Some(json!({"a": 1})));
  }

  #[test]
  fn surrounding_whitespace_is_ignored() {
    assert_eq!(parse_model_json("\n\n  {\"a\": [1, 2]}  \n"), Some(json!({"a": [1, 2]})));
  }

  #[test]
  fn fenced_json_with_and_without_tag() {
    let expected = json!({"title": "T", "problems": []});
    let tagged = "```json\n{\"title\":\"T\",\"problems\":[]}\n```";
    let bare = "```\n{\"title\":\"T\",\"problems\":[]}\n```";
    assert_eq!(parse_model_json(tagged), Some(expected.clone()));
    assert_eq!(parse_model_json(bare), Some(expected));
  }

  #[test]
  fn fenced_json_with_trailing_spaces_after_fence() {
    let text = "```json   \n{\"titles\": [\"a\", \"b\", \"c\"]}\n```   ";
    assert_eq!(parse_model_json(text), Some(json!({"titles": ["a", "b", "c"]})));
  }

  #[test]
  fn fenced_non_object_values_survive() {
    assert_eq!(parse_model_json("```json\n[1, 2, 3]\n```"), Some(json!([1, 2, 3])));
  }

  #[test]
  fn object_inside_prose_is_recovered() {
    let text = "Sure! Here is your worksheet:\n{\"title\": \"天気\", \"problems\": [{\"number\": 1}]}\nHope it helps.";
    assert_eq!(
      parse_model_json(text),
      Some(json!({"title": "天気", "problems": [{"number": 1}]}))
    );
  }

  #[test]
  fn fence_not_at_start_falls_back_to_brace_span() {
    let text = "回答です。\n```json\n{\"number\": 2}\n```";
    assert_eq!(parse_model_json(text), Some(json!({"number": 2})));
  }

  #[test]
  fn garbage_yields_none() {
    assert_eq!(parse_model_json("I cannot help with that."), None);
    assert_eq!(parse_model_json(""), None);
    assert_eq!(parse_model_json("```json\n```"), None);
  }

  #[test]
  fn unbalanced_or_invalid_braces_yield_none() {
    assert_eq!(parse_model_json("{ not json }"), None);
    assert_eq!(parse_model_json("{\"a\": 1"), None);
  }

  #[test]
  fn greedy_span_spanning_two_objects_is_not_parsed() {
    // First `{` to last `}` covers both objects, which is not valid JSON.
    assert_eq!(parse_model_json("a {\"x\":1} b {\"y\":2} c"), None);
  }

  #[test]
  fn empty_object_is_distinct_from_absence() {
    assert_eq!(parse_model_json("{}"), Some(json!({})));
  }
}
