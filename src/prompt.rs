//! Prompt rendering for the three intents: full worksheet, single-problem
//! regeneration, and title suggestion.
//!
//! All functions are pure: same templates + same request => same prompt.
//! Values are embedded verbatim; nothing is validated here.

use crate::config::Prompts;
use crate::protocol::{RegenerateIn, TitleIn, WorksheetIn};
use crate::util::fill_template;

/// Placeholder text for empty notes.
const NO_NOTES: &str = "なし";

fn notes_or_none(notes: &str) -> &str {
  if notes.is_empty() { NO_NOTES } else { notes }
}

pub fn worksheet_prompt(prompts: &Prompts, req: &WorksheetIn) -> String {
  let formats = req.formats.display();
  let count = req.count().to_string();
  fill_template(
    &prompts.worksheet_template,
    &[
      ("grade", req.grade.as_str()),
      ("subject", req.subject.as_str()),
      ("theme", req.theme.as_str()),
      ("notes", notes_or_none(&req.notes)),
      ("formats", formats.as_str()),
      ("difficulty", req.difficulty.as_str()),
      ("count", count.as_str()),
    ],
  )
}

pub fn regenerate_prompt(prompts: &Prompts, req: &RegenerateIn) -> String {
  let formats = req.formats.display();
  let problem_number = req.problem_number().to_string();
  fill_template(
    &prompts.regenerate_template,
    &[
      ("grade", req.grade.as_str()),
      ("subject", req.subject.as_str()),
      ("theme", req.theme.as_str()),
      ("notes", notes_or_none(&req.notes)),
      ("formats", formats.as_str()),
      ("difficulty", req.difficulty.as_str()),
      ("current_question", req.current_question.as_str()),
      ("problem_number", problem_number.as_str()),
    ],
  )
}

pub fn title_prompt(prompts: &Prompts, req: &TitleIn) -> String {
  fill_template(
    &prompts.title_template,
    &[("grade", req.grade.as_str()), ("subject", req.subject.as_str()), ("theme", req.theme.as_str())],
  )
}
