//! Domain models for worksheets: problem formats, problems, worksheet, title suggestions.
//!
//! Model output is passed through to clients untouched; these types are used to
//! check its shape for logging and to document what the prompts ask for.

use serde::{Deserialize, Serialize};

/// The fixed set of problem formats offered by the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemFormat {
  /// One-shot question and answer.
  #[serde(rename = "一問一答")]
  ShortQa,
  #[serde(rename = "穴埋め問題")]
  FillInBlank,
  #[serde(rename = "選択問題")]
  MultipleChoice,
  #[serde(rename = "○×クイズ")]
  TrueFalse,
  #[serde(rename = "記述式（短答）")]
  ShortAnswer,
  #[serde(rename = "記述式（長文）")]
  LongAnswer,
  #[serde(rename = "並べ替え問題")]
  Ordering,
  #[serde(rename = "マッチング")]
  Matching,
}

impl ProblemFormat {
  pub const ALL: [ProblemFormat; 8] = [
    ProblemFormat::ShortQa,
    ProblemFormat::FillInBlank,
    ProblemFormat::MultipleChoice,
    ProblemFormat::TrueFalse,
    ProblemFormat::ShortAnswer,
    ProblemFormat::LongAnswer,
    ProblemFormat::Ordering,
    ProblemFormat::Matching,
  ];

  /// Display label, identical to the serialized form.
  pub fn label(self) -> &'static str {
    match self {
      ProblemFormat::ShortQa => "一問一答",
      ProblemFormat::FillInBlank => "穴埋め問題",
      ProblemFormat::MultipleChoice => "選択問題",
      ProblemFormat::TrueFalse => "○×クイズ",
      ProblemFormat::ShortAnswer => "記述式（短答）",
      ProblemFormat::LongAnswer => "記述式（長文）",
      ProblemFormat::Ordering => "並べ替え問題",
      ProblemFormat::Matching => "マッチング",
    }
  }

  /// Number of choices the prompts ask for. `None` when it depends on the problem.
  pub fn expected_choice_count(self) -> Option<usize> {
    match self {
      ProblemFormat::MultipleChoice => Some(4),
      ProblemFormat::TrueFalse => Some(2),
      ProblemFormat::ShortQa
      | ProblemFormat::FillInBlank
      | ProblemFormat::ShortAnswer
      | ProblemFormat::LongAnswer => Some(0),
      ProblemFormat::Ordering | ProblemFormat::Matching => None,
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Problem {
  pub number: u32,
  #[serde(rename = "type")]
  pub kind: ProblemFormat,
  pub question: String,
  #[serde(default)]
  pub choices: Vec<String>,
  pub answer: String,
  #[serde(default)]
  pub explanation: String,
}

impl Problem {
  /// True when `choices` has the length the format calls for (always true for ordering/matching).
  pub fn choices_match_format(&self) -> bool {
    self
      .kind
      .expected_choice_count()
      .map_or(true, |n| self.choices.len() == n)
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Worksheet {
  pub title: String,
  #[serde(default)]
  pub problems: Vec<Problem>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TitleSuggestions {
  pub titles: Vec<String>,
}

impl TitleSuggestions {
  /// Single generic title used whenever suggestion fails.
  pub fn fallback(theme: &str) -> Self {
    Self { titles: vec![format!("{} ワークシート", theme)] }
  }
}
