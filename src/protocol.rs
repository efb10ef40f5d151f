//! Public protocol structs for the HTTP endpoints (serde ready).
//!
//! Request fields are deliberately lenient: nothing here ever rejects a
//! request. Missing or oddly-typed fields degrade into empty/default values and
//! flow into the prompt as-is.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_COUNT: u32 = 5;
pub const DEFAULT_PROBLEM_NUMBER: u32 = 1;

/// Separator used when `formats` arrives as a list.
pub const FORMAT_SEPARATOR: &str = "、";

/// Question formats as sent by the form: normally a list, but a bare string is accepted too.
#[derive(Clone, Debug, PartialEq)]
pub enum Formats {
    List(Vec<String>),
    Single(String),
}

impl Default for Formats {
    fn default() -> Self {
        Formats::List(Vec::new())
    }
}

impl Formats {
    /// Text embedded in prompts. An empty list renders as an empty string.
    pub fn display(&self) -> String {
        match self {
            Formats::List(items) => items.join(FORMAT_SEPARATOR),
            Formats::Single(s) => s.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for Formats {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => Formats::List(items.into_iter().map(value_to_text).collect()),
            Value::Null => Formats::default(),
            other => Formats::Single(value_to_text(other)),
        })
    }
}

/// `POST /api/generate`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorksheetIn {
    #[serde(deserialize_with = "lenient_text")]
    pub grade: String,
    #[serde(deserialize_with = "lenient_text")]
    pub subject: String,
    #[serde(deserialize_with = "lenient_text")]
    pub theme: String,
    #[serde(deserialize_with = "lenient_text")]
    pub notes: String,
    pub formats: Formats,
    #[serde(deserialize_with = "lenient_text")]
    pub difficulty: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub count: Option<u32>,
}

impl WorksheetIn {
    /// Requested problem count: defaults to 5, never below 1.
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(DEFAULT_COUNT).max(1)
    }
}

/// `POST /api/regenerate-one`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegenerateIn {
    #[serde(deserialize_with = "lenient_text")]
    pub grade: String,
    #[serde(deserialize_with = "lenient_text")]
    pub subject: String,
    #[serde(deserialize_with = "lenient_text")]
    pub theme: String,
    #[serde(deserialize_with = "lenient_text")]
    pub notes: String,
    pub formats: Formats,
    #[serde(deserialize_with = "lenient_text")]
    pub difficulty: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub problem_number: Option<u32>,
    #[serde(deserialize_with = "lenient_text")]
    pub current_question: String,
}

impl RegenerateIn {
    pub fn problem_number(&self) -> u32 {
        self.problem_number.unwrap_or(DEFAULT_PROBLEM_NUMBER).max(1)
    }
}

/// `POST /api/suggest-title`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TitleIn {
    #[serde(deserialize_with = "lenient_text")]
    pub grade: String,
    #[serde(deserialize_with = "lenient_text")]
    pub subject: String,
    #[serde(deserialize_with = "lenient_text")]
    pub theme: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

fn value_to_text(v: Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(value_to_text(Value::deserialize(d)?))
}

/// Accepts numbers or numeric strings; anything else becomes `None` (caller default).
fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let n = match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(n.and_then(|n| u32::try_from(n).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_take_defaults() {
        let w: WorksheetIn = serde_json::from_value(json!({})).unwrap();
        assert_eq!(w.grade, "");
        assert_eq!(w.formats, Formats::List(vec![]));
        assert_eq!(w.formats.display(), "");
        assert_eq!(w.count(), 5);

        let r: RegenerateIn = serde_json::from_value(json!({})).unwrap();
        assert_eq!(r.problem_number(), 1);
        assert_eq!(r.current_question, "");
    }

    #[test]
    fn formats_list_is_joined_and_scalar_is_kept() {
        let w: WorksheetIn = serde_json::from_value(json!({"formats": ["選択問題", "○×クイズ"]})).unwrap();
        assert_eq!(w.formats.display(), "選択問題、○×クイズ");

        let w: WorksheetIn = serde_json::from_value(json!({"formats": "穴埋め問題"})).unwrap();
        assert_eq!(w.formats, Formats::Single("穴埋め問題".into()));
        assert_eq!(w.formats.display(), "穴埋め問題");
    }

    #[test]
    fn oddly_typed_fields_degrade_instead_of_failing() {
        let w: WorksheetIn = serde_json::from_value(json!({
            "grade": 3,
            "subject": null,
            "notes": true,
            "count": "10",
        }))
        .unwrap();
        assert_eq!(w.grade, "3");
        assert_eq!(w.subject, "");
        assert_eq!(w.notes, "true");
        assert_eq!(w.count(), 10);

        let w: WorksheetIn = serde_json::from_value(json!({"count": "many"})).unwrap();
        assert_eq!(w.count(), 5);
        let w: WorksheetIn = serde_json::from_value(json!({"count": -2})).unwrap();
        assert_eq!(w.count(), 5);
    }

    #[test]
    fn zero_count_is_clamped_to_one() {
        let w: WorksheetIn = serde_json::from_value(json!({"count": 0})).unwrap();
        assert_eq!(w.count(), 1);
    }

    #[test]
    fn regenerate_reads_camel_case_fields() {
        let r: RegenerateIn = serde_json::from_value(json!({
            "problemNumber": 4,
            "currentQuestion": "3+4は？",
        }))
        .unwrap();
        assert_eq!(r.problem_number(), 4);
        assert_eq!(r.current_question, "3+4は？");
    }
}
